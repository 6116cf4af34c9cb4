//! # Sale Repository
//!
//! Database operations for the append-only sales ledger.
//!
//! ## Record Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Record Lifecycle                             │
//! │                                                                         │
//! │  1. SELL                                                               │
//! │     └── insert_in() → SaleRecord { sold: 3, refunded: 0 }              │
//! │                                                                         │
//! │  2. REFUND (any number of times)                                       │
//! │     └── add_refunded_in() → original { refunded: 0 → 2 }               │
//! │     └── insert_in()       → SaleRecord { sold: -2, is_refund }         │
//! │                                                                         │
//! │  3. REPORT                                                             │
//! │     └── list_for_user() / report_for_user() (newest first)             │
//! │                                                                         │
//! │  Rows are never rewritten except for quantity_refunded, and only       │
//! │  deleted by the explicit administrative delete.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ordering is `transaction_date DESC, rowid DESC`: records written in the
//! same instant come back newest insert first.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use ims_core::{primary_image_url, SaleRecord, SaleReportLine};

const SALE_COLUMNS: &str = r#"
    s.id, s.product_variation_id, s.quantity_sold, s.quantity_refunded,
    s.total_revenue_cents, s.total_cost_cents, s.total_profit_cents,
    s.transaction_date, s.user_id, s.is_refund
"#;

/// A sale joined to its product, before the image list is parsed.
#[derive(Debug, sqlx::FromRow)]
struct ReportRow {
    #[sqlx(flatten)]
    record: SaleRecord,
    product_id: String,
    product_name: String,
    image_urls: Option<String>,
}

impl From<ReportRow> for SaleReportLine {
    fn from(row: ReportRow) -> Self {
        SaleReportLine {
            record: row.record,
            product_id: row.product_id,
            product_name: row.product_name,
            product_image_url: row.image_urls.as_deref().and_then(primary_image_url),
        }
    }
}

/// Repository for sale record operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    /// All of a user's ledger entries, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<SaleRecord>> {
        let sql = format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales s
            WHERE s.user_id = ?1
            ORDER BY s.transaction_date DESC, s.rowid DESC
            "#
        );

        let records = sqlx::query_as::<_, SaleRecord>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(user = %user_id, count = records.len(), "Listed sales");
        Ok(records)
    }

    /// A user's ledger entries enriched with product name and image.
    pub async fn report_for_user(&self, user_id: &str) -> DbResult<Vec<SaleReportLine>> {
        let sql = format!(
            r#"
            SELECT {SALE_COLUMNS},
                p.id AS product_id,
                p.name AS product_name,
                p.image_urls AS image_urls
            FROM sales s
            INNER JOIN product_variations v ON v.id = s.product_variation_id
            INNER JOIN products p ON p.id = v.product_id
            WHERE s.user_id = ?1
            ORDER BY s.transaction_date DESC, s.rowid DESC
            "#
        );

        let rows = sqlx::query_as::<_, ReportRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(SaleReportLine::from).collect())
    }

    /// Gets one ledger entry owned by `user_id`.
    pub async fn get_for_user(&self, id: &str, user_id: &str) -> DbResult<Option<SaleRecord>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales s WHERE s.id = ?1 AND s.user_id = ?2");

        let record = sqlx::query_as::<_, SaleRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Administrative delete of one ledger entry.
    ///
    /// Stock is not adjusted.
    pub async fn delete_for_user(&self, id: &str, user_id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting sale record");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }

    // =========================================================================
    // Ledger Writes (inside the ledger transaction)
    // =========================================================================

    /// Sale history for one variation and user, newest first.
    pub async fn list_for_variation_in(
        conn: &mut SqliteConnection,
        variation_id: &str,
        user_id: &str,
    ) -> DbResult<Vec<SaleRecord>> {
        let sql = format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales s
            WHERE s.product_variation_id = ?1 AND s.user_id = ?2
            ORDER BY s.transaction_date DESC, s.rowid DESC
            "#
        );

        let records = sqlx::query_as::<_, SaleRecord>(&sql)
            .bind(variation_id)
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await?;

        Ok(records)
    }

    pub async fn insert_in(conn: &mut SqliteConnection, record: &SaleRecord) -> DbResult<()> {
        debug!(
            id = %record.id,
            variation_id = %record.product_variation_id,
            quantity = record.quantity_sold,
            is_refund = record.is_refund,
            "Inserting sale record"
        );

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, product_variation_id, quantity_sold, quantity_refunded,
                total_revenue_cents, total_cost_cents, total_profit_cents,
                transaction_date, user_id, is_refund
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&record.id)
        .bind(&record.product_variation_id)
        .bind(record.quantity_sold)
        .bind(record.quantity_refunded)
        .bind(record.total_revenue_cents)
        .bind(record.total_cost_cents)
        .bind(record.total_profit_cents)
        .bind(record.transaction_date)
        .bind(&record.user_id)
        .bind(record.is_refund)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Adds `amount` to an original sale's refunded count.
    ///
    /// ## Returns
    /// `false` when the guard rejects the update: the record is a refund
    /// adjustment, or `quantity_refunded` would exceed `quantity_sold`.
    pub async fn add_refunded_in(
        conn: &mut SqliteConnection,
        sale_id: &str,
        amount: i64,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE sales
            SET quantity_refunded = quantity_refunded + ?2
            WHERE id = ?1
              AND is_refund = 0
              AND quantity_refunded + ?2 <= quantity_sold
            "#,
        )
        .bind(sale_id)
        .bind(amount)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// Tests
// =============================================================================
