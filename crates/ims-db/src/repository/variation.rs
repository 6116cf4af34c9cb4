//! # Variation Repository (Inventory Store)
//!
//! Authoritative stock count per product variation, scoped to the owning
//! user.
//!
//! ## Guarded Stock Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Stock never goes negative, even with another process writing:         │
//! │                                                                         │
//! │  UPDATE product_variations                                             │
//! │  SET quantity = quantity - 3                                           │
//! │  WHERE id = 'v-1' AND quantity >= 3      ← guard                       │
//! │  RETURNING quantity                                                    │
//! │       │                                                                 │
//! │       ├── row returned → new stock level                               │
//! │       └── no row       → stock changed underneath us, reject           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `*_in` functions take a connection so the ledger can run them inside
//! its transaction; the `&self` methods use the pool directly.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use ims_core::{ProductStockTotal, ProductVariation};

const VARIATION_COLUMNS: &str = "v.id, v.product_id, v.color_id, v.size_id, v.quantity, v.user_id";

/// Repository for product variation stock.
#[derive(Debug, Clone)]
pub struct VariationRepository {
    pool: SqlitePool,
}

impl VariationRepository {
    /// Creates a new VariationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VariationRepository { pool }
    }

    // =========================================================================
    // Pool Methods
    // =========================================================================

    /// Gets a variation owned by `owner_id`.
    ///
    /// ## Returns
    /// * `Ok(None)` - missing, owned by someone else, or product deleted
    pub async fn get_for_owner(
        &self,
        id: &str,
        owner_id: &str,
    ) -> DbResult<Option<ProductVariation>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_for_owner_in(&mut conn, id, owner_id).await
    }

    /// Lists the variations of one product.
    pub async fn list_for_product(
        &self,
        product_id: &str,
        owner_id: &str,
    ) -> DbResult<Vec<ProductVariation>> {
        let mut conn = self.pool.acquire().await?;
        Self::list_for_product_in(&mut conn, product_id, owner_id).await
    }

    /// Adds stock to a variation (catalog restock).
    ///
    /// ## Returns
    /// The variation with its new quantity, or `NotFound` if the caller
    /// doesn't own it.
    pub async fn restock(
        &self,
        id: &str,
        amount: i64,
        owner_id: &str,
    ) -> DbResult<ProductVariation> {
        debug!(id = %id, amount = amount, "Restocking variation");

        let variation = sqlx::query_as::<_, ProductVariation>(
            r#"
            UPDATE product_variations
            SET quantity = quantity + ?2
            WHERE id = ?1
              AND product_id IN (
                  SELECT id FROM products WHERE user_id = ?3 AND deleted = 0
              )
            RETURNING id, product_id, color_id, size_id, quantity, user_id
            "#,
        )
        .bind(id)
        .bind(amount)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        variation.ok_or_else(|| DbError::not_found("ProductVariation", id))
    }

    /// Total stock per product across all its variations.
    ///
    /// Products without variations report zero.
    pub async fn stock_totals_by_product(
        &self,
        owner_id: &str,
    ) -> DbResult<Vec<ProductStockTotal>> {
        let totals = sqlx::query_as::<_, ProductStockTotal>(
            r#"
            SELECT
                p.id AS product_id,
                COALESCE(SUM(v.quantity), 0) AS total_quantity
            FROM products p
            LEFT JOIN product_variations v ON v.product_id = p.id
            WHERE p.user_id = ?1 AND p.deleted = 0
            GROUP BY p.id
            ORDER BY p.name, p.id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(totals)
    }

    // =========================================================================
    // Connection Functions (usable inside a transaction)
    // =========================================================================

    /// Resolves a variation for its owner. Deleted products hide their
    /// variations.
    pub async fn find_for_owner_in(
        conn: &mut SqliteConnection,
        id: &str,
        owner_id: &str,
    ) -> DbResult<Option<ProductVariation>> {
        let sql = format!(
            r#"
            SELECT {VARIATION_COLUMNS}
            FROM product_variations v
            INNER JOIN products p ON p.id = v.product_id
            WHERE v.id = ?1 AND p.user_id = ?2 AND p.deleted = 0
            "#
        );

        let variation = sqlx::query_as::<_, ProductVariation>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(variation)
    }

    pub async fn list_for_product_in(
        conn: &mut SqliteConnection,
        product_id: &str,
        owner_id: &str,
    ) -> DbResult<Vec<ProductVariation>> {
        let sql = format!(
            r#"
            SELECT {VARIATION_COLUMNS}
            FROM product_variations v
            INNER JOIN products p ON p.id = v.product_id
            WHERE v.product_id = ?1 AND p.user_id = ?2
            ORDER BY v.rowid
            "#
        );

        let variations = sqlx::query_as::<_, ProductVariation>(&sql)
            .bind(product_id)
            .bind(owner_id)
            .fetch_all(&mut *conn)
            .await?;

        Ok(variations)
    }

    pub async fn insert_in(conn: &mut SqliteConnection, variation: &ProductVariation) -> DbResult<()> {
        debug!(id = %variation.id, product_id = %variation.product_id, "Inserting variation");

        sqlx::query(
            r#"
            INSERT INTO product_variations (id, product_id, color_id, size_id, quantity, user_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&variation.id)
        .bind(&variation.product_id)
        .bind(&variation.color_id)
        .bind(&variation.size_id)
        .bind(variation.quantity)
        .bind(&variation.user_id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Removes `amount` units if at least that many are on hand.
    ///
    /// ## Returns
    /// * `Ok(Some(quantity))` - new stock level
    /// * `Ok(None)` - guard failed (not enough stock, or no such variation)
    pub async fn decrement_stock_in(
        conn: &mut SqliteConnection,
        id: &str,
        amount: i64,
    ) -> DbResult<Option<i64>> {
        debug!(id = %id, amount = amount, "Decrementing stock");

        let quantity: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE product_variations
            SET quantity = quantity - ?2
            WHERE id = ?1 AND quantity >= ?2
            RETURNING quantity
            "#,
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(quantity)
    }

    /// Puts `amount` units back on hand.
    pub async fn increment_stock_in(
        conn: &mut SqliteConnection,
        id: &str,
        amount: i64,
    ) -> DbResult<i64> {
        debug!(id = %id, amount = amount, "Incrementing stock");

        let quantity: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE product_variations
            SET quantity = quantity + ?2
            WHERE id = ?1
            RETURNING quantity
            "#,
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(&mut *conn)
        .await?;

        quantity.ok_or_else(|| DbError::not_found("ProductVariation", id))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::repository::testing::{seed_catalog, test_db};

    #[tokio::test]
    async fn test_get_for_owner_is_scoped() {
        let db = test_db().await;
        let seeded = seed_catalog(&db, "alice", 10).await;

        let found = db
            .variations()
            .get_for_owner(&seeded.variation_id, "alice")
            .await
            .unwrap();
        assert_eq!(found.map(|v| v.quantity), Some(10));

        let foreign = db
            .variations()
            .get_for_owner(&seeded.variation_id, "mallory")
            .await
            .unwrap();
        assert!(foreign.is_none());
    }

    #[tokio::test]
    async fn test_decrement_is_guarded() {
        let db = test_db().await;
        let seeded = seed_catalog(&db, "alice", 5).await;
        let mut conn = db.pool().acquire().await.unwrap();

        let left = super::VariationRepository::decrement_stock_in(&mut conn, &seeded.variation_id, 5)
            .await
            .unwrap();
        assert_eq!(left, Some(0));

        let rejected =
            super::VariationRepository::decrement_stock_in(&mut conn, &seeded.variation_id, 1)
                .await
                .unwrap();
        assert_eq!(rejected, None);

        let restored =
            super::VariationRepository::increment_stock_in(&mut conn, &seeded.variation_id, 2)
                .await
                .unwrap();
        assert_eq!(restored, 2);
    }

    #[tokio::test]
    async fn test_restock_and_totals() {
        let db = test_db().await;
        let seeded = seed_catalog(&db, "alice", 4).await;

        let variation = db
            .variations()
            .restock(&seeded.variation_id, 6, "alice")
            .await
            .unwrap();
        assert_eq!(variation.quantity, 10);

        assert!(db
            .variations()
            .restock(&seeded.variation_id, 6, "mallory")
            .await
            .is_err());

        let totals = db.variations().stock_totals_by_product("alice").await.unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].product_id, seeded.product_id);
        assert_eq!(totals[0].total_quantity, 10);
    }
}
