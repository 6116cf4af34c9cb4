//! # Catalog Repository
//!
//! Colors and sizes: simple named entries, scoped per user, referenced by
//! product variations.
//!
//! Renaming keeps every variation pointing at the same entry. Deleting is
//! refused while any variation (including one of a soft-deleted product)
//! still references the entry.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use ims_core::{new_id, Color, Size};

/// Repository for colors and sizes.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Creates a color. Names are unique per user.
    pub async fn create_color(&self, owner_id: &str, name: &str) -> DbResult<Color> {
        let color = Color {
            id: new_id(),
            name: name.trim().to_string(),
            user_id: owner_id.to_string(),
        };
        debug!(id = %color.id, name = %color.name, "Creating color");

        sqlx::query("INSERT INTO colors (id, name, user_id) VALUES (?1, ?2, ?3)")
            .bind(&color.id)
            .bind(&color.name)
            .bind(&color.user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| duplicate_name(e, "color", &color.name))?;

        Ok(color)
    }

    pub async fn list_colors(&self, owner_id: &str) -> DbResult<Vec<Color>> {
        let colors = sqlx::query_as::<_, Color>(
            "SELECT id, name, user_id FROM colors WHERE user_id = ?1 ORDER BY name",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(colors)
    }

    pub async fn get_color(&self, id: &str, owner_id: &str) -> DbResult<Option<Color>> {
        let color = sqlx::query_as::<_, Color>(
            "SELECT id, name, user_id FROM colors WHERE id = ?1 AND user_id = ?2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(color)
    }

    /// Renames a color.
    pub async fn update_color(&self, id: &str, owner_id: &str, name: &str) -> DbResult<Color> {
        let name = name.trim();
        self.rename("colors", "color", "Color", id, owner_id, name).await?;

        Ok(Color {
            id: id.to_string(),
            name: name.to_string(),
            user_id: owner_id.to_string(),
        })
    }

    pub async fn delete_color(&self, id: &str, owner_id: &str) -> DbResult<()> {
        self.delete("colors", "Color", id, owner_id).await
    }

    /// Creates a size. Names are unique per user.
    pub async fn create_size(&self, owner_id: &str, name: &str) -> DbResult<Size> {
        let size = Size {
            id: new_id(),
            name: name.trim().to_string(),
            user_id: owner_id.to_string(),
        };
        debug!(id = %size.id, name = %size.name, "Creating size");

        sqlx::query("INSERT INTO sizes (id, name, user_id) VALUES (?1, ?2, ?3)")
            .bind(&size.id)
            .bind(&size.name)
            .bind(&size.user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| duplicate_name(e, "size", &size.name))?;

        Ok(size)
    }

    /// Sizes in creation order (S, M, L reads better than alphabetical).
    pub async fn list_sizes(&self, owner_id: &str) -> DbResult<Vec<Size>> {
        let sizes = sqlx::query_as::<_, Size>(
            "SELECT id, name, user_id FROM sizes WHERE user_id = ?1 ORDER BY rowid",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sizes)
    }

    pub async fn get_size(&self, id: &str, owner_id: &str) -> DbResult<Option<Size>> {
        let size = sqlx::query_as::<_, Size>(
            "SELECT id, name, user_id FROM sizes WHERE id = ?1 AND user_id = ?2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(size)
    }

    /// Renames a size.
    pub async fn update_size(&self, id: &str, owner_id: &str, name: &str) -> DbResult<Size> {
        let name = name.trim();
        self.rename("sizes", "size", "Size", id, owner_id, name).await?;

        Ok(Size {
            id: id.to_string(),
            name: name.to_string(),
            user_id: owner_id.to_string(),
        })
    }

    pub async fn delete_size(&self, id: &str, owner_id: &str) -> DbResult<()> {
        self.delete("sizes", "Size", id, owner_id).await
    }

    // =========================================================================
    // Shared
    // =========================================================================

    async fn rename(
        &self,
        table: &str,
        field: &str,
        entity: &str,
        id: &str,
        owner_id: &str,
        name: &str,
    ) -> DbResult<()> {
        debug!(table = %table, id = %id, name = %name, "Renaming catalog entry");

        let sql = format!("UPDATE {table} SET name = ?3 WHERE id = ?1 AND user_id = ?2");
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(owner_id)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| duplicate_name(e, field, name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(entity, id));
        }

        Ok(())
    }

    async fn delete(&self, table: &str, entity: &str, id: &str, owner_id: &str) -> DbResult<()> {
        let sql = format!("DELETE FROM {table} WHERE id = ?1 AND user_id = ?2");
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::ForeignKeyViolation { .. } => DbError::in_use(entity, id),
                other => other,
            })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(entity, id));
        }

        info!(table = %table, id = %id, "Catalog entry deleted");
        Ok(())
    }
}

/// Fills in the offending name on unique violations.
fn duplicate_name(err: sqlx::Error, field: &str, name: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { .. } => DbError::duplicate(field, name),
        other => other,
    }
}
