//! # Product Repository
//!
//! Database operations for products and their variations.
//!
//! ## Key Operations
//! - Create a product together with its variations (one transaction)
//! - Owner-scoped reads
//! - Partial updates (name, description, prices, images)
//! - Soft delete
//!
//! ## Soft Delete
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DELETE /api/products/{id}                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  products.deleted = 1                                                  │
//! │       │                                                                 │
//! │       ├── product hidden from lists and lookups                        │
//! │       ├── its variations can no longer be sold or refunded             │
//! │       └── sales rows stay, so reports keep the product name            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::variation::VariationRepository;
use ims_core::{new_id, NewProduct, NewVariation, Product, ProductUpdate, ProductVariation};

const PRODUCT_COLUMNS: &str = r#"
    id, user_id, name, description,
    cost_price_cents, selling_price_cents, image_urls,
    deleted, created_at, updated_at
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let (product, variations) = db
///     .products()
///     .create_with_variations("user-1", &new_product, &new_variations)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product and all of its variations atomically.
    ///
    /// ## What This Does
    /// 1. Verifies every referenced color and size belongs to `owner_id`
    /// 2. Inserts the product
    /// 3. Inserts each variation with its starting stock
    ///
    /// Input validation happens in the caller (`ims_core::validation`).
    pub async fn create_with_variations(
        &self,
        owner_id: &str,
        input: &NewProduct,
        variations: &[NewVariation],
    ) -> DbResult<(Product, Vec<ProductVariation>)> {
        debug!(owner = %owner_id, name = %input.name, variations = variations.len(), "Creating product");

        let now = Utc::now();
        let product = Product {
            id: new_id(),
            user_id: owner_id.to_string(),
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            cost_price_cents: input.cost_price_cents,
            selling_price_cents: input.selling_price_cents,
            image_urls: input.image_urls.clone(),
            deleted: false,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, user_id, name, description,
                cost_price_cents, selling_price_cents, image_urls,
                deleted, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.user_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.cost_price_cents)
        .bind(product.selling_price_cents)
        .bind(&product.image_urls)
        .bind(product.deleted)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await?;

        let mut created = Vec::with_capacity(variations.len());
        for input in variations {
            ensure_owned(&mut tx, "colors", "Color", &input.color_id, owner_id).await?;
            ensure_owned(&mut tx, "sizes", "Size", &input.size_id, owner_id).await?;

            let variation = ProductVariation {
                id: new_id(),
                product_id: product.id.clone(),
                color_id: input.color_id.clone(),
                size_id: input.size_id.clone(),
                quantity: input.quantity,
                user_id: owner_id.to_string(),
            };
            VariationRepository::insert_in(&mut tx, &variation).await?;
            created.push(variation);
        }

        tx.commit().await?;

        Ok((product, created))
    }

    /// Gets an active product owned by `owner_id`.
    pub async fn get_for_owner(&self, id: &str, owner_id: &str) -> DbResult<Option<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1 AND user_id = ?2 AND deleted = 0"
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists active products, sorted by name.
    pub async fn list_for_owner(&self, owner_id: &str) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE user_id = ?1 AND deleted = 0 ORDER BY name, id"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by ID regardless of owner or deleted flag.
    ///
    /// Used by the ledger after the variation lookup has already checked
    /// ownership.
    pub async fn find_by_id_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(product)
    }

    /// Applies the fields present in `changes` to an active product.
    ///
    /// The ledger reads prices at sale time, so new prices only affect
    /// sales recorded after this returns.
    pub async fn update(
        &self,
        id: &str,
        owner_id: &str,
        changes: &ProductUpdate,
    ) -> DbResult<Product> {
        debug!(id = %id, owner = %owner_id, "Updating product");

        let sql = format!(
            r#"
            UPDATE products
            SET name = COALESCE(?3, name),
                description = COALESCE(?4, description),
                cost_price_cents = COALESCE(?5, cost_price_cents),
                selling_price_cents = COALESCE(?6, selling_price_cents),
                image_urls = COALESCE(?7, image_urls),
                updated_at = ?8
            WHERE id = ?1 AND user_id = ?2 AND deleted = 0
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(owner_id)
            .bind(changes.name.as_deref().map(str::trim))
            .bind(&changes.description)
            .bind(changes.cost_price_cents)
            .bind(changes.selling_price_cents)
            .bind(&changes.image_urls)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        product.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Soft-deletes a product by setting deleted = 1.
    ///
    /// Variations and sales history are kept.
    pub async fn soft_delete(&self, id: &str, owner_id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET deleted = 1, updated_at = ?3
            WHERE id = ?1 AND user_id = ?2 AND deleted = 0
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products for one owner.
    pub async fn count(&self, owner_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE user_id = ?1 AND deleted = 0")
                .bind(owner_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

/// Fails with `NotFound` unless `id` exists in `table` for `owner_id`.
async fn ensure_owned(
    conn: &mut SqliteConnection,
    table: &str,
    entity: &str,
    id: &str,
    owner_id: &str,
) -> DbResult<()> {
    let sql = format!("SELECT COUNT(*) FROM {table} WHERE id = ?1 AND user_id = ?2");
    let count: i64 = sqlx::query_scalar(&sql)
        .bind(id)
        .bind(owner_id)
        .fetch_one(&mut *conn)
        .await?;

    if count == 0 {
        return Err(DbError::not_found(entity, id));
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
