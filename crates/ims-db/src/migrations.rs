//! # Database Migrations
//!
//! Embedded SQL migrations for the IMS schema.
//!
//! ## Schema
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  001_initial_schema.sql                                                 │
//! │                                                                         │
//! │  products ◄──── product_variations ────► colors, sizes                  │
//! │  (deleted flag)   quantity CHECK >= 0     UNIQUE (user_id, name)        │
//! │                          ▲                                              │
//! │                          │                                              │
//! │                        sales                                            │
//! │        originals: quantity_refunded <= quantity_sold                    │
//! │        refunds:   negative quantity and money, is_refund = 1            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The CHECK constraints back up the ledger's own guards: a bug that tries
//! to oversell or over-refund fails the statement and rolls back the
//! transaction. Colors and sizes referenced by a variation cannot be
//! deleted (foreign keys are on for every pooled connection).
//!
//! Applied migrations are recorded in `_sqlx_migrations`; `GET /health`
//! reports the applied count against the embedded count.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Migrations under `migrations/sqlite`, embedded at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Brings the schema up to date. Already-applied migrations are skipped.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// `(embedded, applied)` migration counts, as reported by `GET /health`.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    // Before the first run the bookkeeping table doesn't exist yet
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, usize::try_from(applied).unwrap_or(0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_status_after_startup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let (total, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
        assert!(total >= 1);

        // Running again is a no-op
        run_migrations(db.pool()).await.unwrap();
        assert_eq!(migration_status(db.pool()).await.unwrap(), (total, applied));
    }

    #[tokio::test]
    async fn test_schema_rejects_negative_stock() {
        let db = crate::repository::testing::test_db().await;
        let seeded = crate::repository::testing::seed_catalog(&db, "alice", 1).await;

        let err = sqlx::query("UPDATE product_variations SET quantity = -1 WHERE id = ?1")
            .bind(&seeded.variation_id)
            .execute(db.pool())
            .await
            .unwrap_err();
        assert!(matches!(
            crate::error::DbError::from(err),
            crate::error::DbError::CheckViolation { .. }
        ));
    }
}
