//! # Ledger Service
//!
//! Records sales and refunds. Each operation plans with `ims_core::ledger`
//! and applies the plan inside one SQLite transaction.
//!
//! ## Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(variation, qty, user)                                      │
//! │       │                                                                 │
//! │       ├── lock variation (in-process)                                   │
//! │       ├── BEGIN IMMEDIATE                                               │
//! │       ├── resolve variation for user        → Unauthorized              │
//! │       ├── validate qty                      → InvalidQuantity           │
//! │       ├── plan_sale()                       → InsufficientStock / ...   │
//! │       ├── guarded decrement                                             │
//! │       ├── INSERT sale record                                            │
//! │       └── COMMIT                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Refund
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_refund(variation, qty, user)                                    │
//! │       │                                                                 │
//! │       ├── lock, BEGIN IMMEDIATE, resolve variation, validate qty        │
//! │       ├── load history newest first                                     │
//! │       ├── plan_refund()                     → ExcessiveRefund           │
//! │       ├── for each allocation:                                          │
//! │       │     guarded quantity_refunded += n                              │
//! │       │     INSERT negative refund record                               │
//! │       │     stock += n                                                  │
//! │       └── COMMIT (all allocations or none)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! The in-process lock serializes work on one variation. The transaction
//! itself starts with `BEGIN IMMEDIATE`, so it holds SQLite's write lock
//! before its first read; concurrent ledger writes on other variations wait
//! on `busy_timeout` instead of failing a read-to-write upgrade.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::error::{DbError, LedgerError, LedgerResult};
use crate::locks::VariationLocks;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::variation::VariationRepository;
use ims_core::validation::validate_quantity;
use ims_core::{
    plan_refund, plan_sale, CoreError, RefundAllocation, SaleRecord, SaleReportLine,
    SalesSummary, StockPolicy, UserId,
};

// =============================================================================
// Outcomes
// =============================================================================

/// What a committed refund did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundOutcome {
    pub variation_id: String,
    pub quantity: i64,
    /// Allocations against original sales, newest sale first.
    pub allocations: Vec<RefundAllocation>,
    /// The appended refund adjustments, one per allocation.
    pub refund_records: Vec<SaleRecord>,
    /// Stock on hand after the refund.
    pub new_stock: i64,
}

/// Enriched ledger entries plus their totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub lines: Vec<SaleReportLine>,
    pub summary: SalesSummary,
}

// =============================================================================
// Ledger
// =============================================================================

/// Sale and refund recording for one stock policy.
///
/// ## Usage
/// ```rust,ignore
/// let ledger = db.ledger(StockPolicy::default());
/// let sale = ledger.record_sale(&variation_id, 3, &user).await?;
/// let refund = ledger.record_refund(&variation_id, 2, &user).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Ledger {
    pool: SqlitePool,
    locks: Arc<VariationLocks>,
    policy: StockPolicy,
}

impl Ledger {
    pub fn new(pool: SqlitePool, locks: Arc<VariationLocks>, policy: StockPolicy) -> Self {
        Ledger {
            pool,
            locks,
            policy,
        }
    }

    pub fn policy(&self) -> StockPolicy {
        self.policy
    }

    /// Sells `quantity` units of a variation owned by `user`.
    ///
    /// Not idempotent: calling twice sells twice.
    pub async fn record_sale(
        &self,
        variation_id: &str,
        quantity: i64,
        user: &UserId,
    ) -> LedgerResult<SaleRecord> {
        let result = self.apply_sale(variation_id, quantity, user).await;

        match &result {
            Ok(record) => info!(
                sale_id = %record.id,
                variation_id = %variation_id,
                user = %user,
                quantity = quantity,
                revenue = %record.total_revenue(),
                "Sale recorded"
            ),
            Err(err) => log_rejection("sale", variation_id, quantity, user, err),
        }

        result
    }

    async fn apply_sale(
        &self,
        variation_id: &str,
        quantity: i64,
        user: &UserId,
    ) -> LedgerResult<SaleRecord> {
        let _guard = self.locks.acquire(variation_id).await;
        let mut tx = self.pool.begin_with(BEGIN_IMMEDIATE).await?;

        let variation =
            VariationRepository::find_for_owner_in(&mut tx, variation_id, user.as_str())
                .await?
                .ok_or_else(|| unauthorized(variation_id))?;
        check_quantity(quantity)?;
        let product = ProductRepository::find_by_id_in(&mut tx, &variation.product_id)
            .await?
            .ok_or_else(|| unauthorized(variation_id))?;

        let plan = plan_sale(&variation, &product, quantity, self.policy)?;

        // Another process may have sold in between the read and the write
        let remaining = VariationRepository::decrement_stock_in(&mut tx, variation_id, quantity)
            .await?
            .ok_or_else(|| CoreError::InsufficientStock {
                variation_id: variation_id.to_string(),
                available: variation.quantity,
                requested: quantity,
            })?;
        if remaining != plan.remaining_stock {
            return Err(CoreError::InternalInconsistency(format!(
                "variation {variation_id} stock is {remaining} after sale, expected {}",
                plan.remaining_stock
            ))
            .into());
        }

        let record = plan.to_record(user, Utc::now());
        SaleRepository::insert_in(&mut tx, &record).await?;

        tx.commit().await?;
        Ok(record)
    }

    /// Refunds `quantity` units against `user`'s prior sales of a variation,
    /// most recent sale first.
    ///
    /// All allocations commit together or not at all.
    pub async fn record_refund(
        &self,
        variation_id: &str,
        quantity: i64,
        user: &UserId,
    ) -> LedgerResult<RefundOutcome> {
        let result = self.apply_refund(variation_id, quantity, user).await;

        match &result {
            Ok(outcome) => info!(
                variation_id = %variation_id,
                user = %user,
                quantity = quantity,
                allocations = outcome.allocations.len(),
                new_stock = outcome.new_stock,
                "Refund recorded"
            ),
            Err(err) => log_rejection("refund", variation_id, quantity, user, err),
        }

        result
    }

    async fn apply_refund(
        &self,
        variation_id: &str,
        quantity: i64,
        user: &UserId,
    ) -> LedgerResult<RefundOutcome> {
        let _guard = self.locks.acquire(variation_id).await;
        let mut tx = self.pool.begin_with(BEGIN_IMMEDIATE).await?;

        let variation =
            VariationRepository::find_for_owner_in(&mut tx, variation_id, user.as_str())
                .await?
                .ok_or_else(|| unauthorized(variation_id))?;
        check_quantity(quantity)?;

        let history =
            SaleRepository::list_for_variation_in(&mut tx, variation_id, user.as_str()).await?;
        let plan = plan_refund(variation_id, &history, quantity)?;

        let now = Utc::now();
        let mut new_stock = variation.quantity;
        let mut refund_records = Vec::with_capacity(plan.allocations.len());

        for allocation in &plan.allocations {
            let applied =
                SaleRepository::add_refunded_in(&mut tx, &allocation.sale_id, allocation.quantity)
                    .await?;
            if !applied {
                return Err(CoreError::InternalInconsistency(format!(
                    "sale {} could not absorb {} refunded units",
                    allocation.sale_id, allocation.quantity
                ))
                .into());
            }

            let refund = allocation.to_refund_record(variation_id, user, now);
            SaleRepository::insert_in(&mut tx, &refund).await?;

            new_stock =
                VariationRepository::increment_stock_in(&mut tx, variation_id, allocation.quantity)
                    .await?;
            refund_records.push(refund);
        }

        tx.commit().await?;

        Ok(RefundOutcome {
            variation_id: plan.variation_id,
            quantity: plan.quantity,
            allocations: plan.allocations,
            refund_records,
            new_stock,
        })
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    /// All of a user's ledger entries, newest first.
    pub async fn list_sales_for_user(&self, user: &UserId) -> LedgerResult<Vec<SaleRecord>> {
        Ok(SaleRepository::new(self.pool.clone())
            .list_for_user(user.as_str())
            .await?)
    }

    /// Enriched entries and totals for the sales report page.
    pub async fn sales_report(&self, user: &UserId) -> LedgerResult<SalesReport> {
        let lines = SaleRepository::new(self.pool.clone())
            .report_for_user(user.as_str())
            .await?;
        let summary = SalesSummary::from_records(lines.iter().map(|line| &line.record));

        Ok(SalesReport { lines, summary })
    }

    /// One ledger entry owned by `user`.
    pub async fn get_sale(&self, id: &str, user: &UserId) -> LedgerResult<SaleRecord> {
        SaleRepository::new(self.pool.clone())
            .get_for_user(id, user.as_str())
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()).into())
    }

    /// Administrative delete of one ledger entry. Stock is not adjusted.
    pub async fn delete_sale(&self, id: &str, user: &UserId) -> LedgerResult<()> {
        match SaleRepository::new(self.pool.clone())
            .delete_for_user(id, user.as_str())
            .await
        {
            Ok(()) => {
                warn!(sale_id = %id, user = %user, "Sale record deleted");
                Ok(())
            }
            Err(DbError::NotFound { .. }) => Err(CoreError::SaleNotFound(id.to_string()).into()),
            Err(err) => Err(err.into()),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

const BEGIN_IMMEDIATE: &str = "BEGIN IMMEDIATE";

fn check_quantity(quantity: i64) -> Result<(), CoreError> {
    validate_quantity(quantity).map_err(|e| CoreError::invalid_quantity(quantity, e.to_string()))
}

fn unauthorized(variation_id: &str) -> CoreError {
    CoreError::Unauthorized {
        variation_id: variation_id.to_string(),
    }
}

fn log_rejection(op: &str, variation_id: &str, quantity: i64, user: &UserId, err: &LedgerError) {
    match err {
        LedgerError::Core(CoreError::InternalInconsistency(detail)) => error!(
            op = op,
            variation_id = %variation_id,
            user = %user,
            quantity = quantity,
            detail = %detail,
            "Ledger inconsistency, transaction rolled back"
        ),
        LedgerError::Core(rule) => warn!(
            op = op,
            variation_id = %variation_id,
            user = %user,
            quantity = quantity,
            reason = %rule,
            "Ledger operation rejected"
        ),
        LedgerError::Db(db) => error!(
            op = op,
            variation_id = %variation_id,
            user = %user,
            error = %db,
            "Ledger operation failed"
        ),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{seed_catalog, seed_product, test_db};
    use crate::Database;
    use ims_core::RefundState;

    fn alice() -> UserId {
        UserId::from("alice")
    }

    async fn stock(db: &Database, variation_id: &str) -> i64 {
        db.variations()
            .get_for_owner(variation_id, "alice")
            .await
            .unwrap()
            .unwrap()
            .quantity
    }

    #[tokio::test]
    async fn test_sell_refund_scenarios() {
        let db = test_db().await;
        let seeded = seed_catalog(&db, "alice", 10).await;
        let ledger = db.ledger(StockPolicy::default());
        let v = seeded.variation_id.as_str();

        // A: sell 3
        let sale = ledger.record_sale(v, 3, &alice()).await.unwrap();
        assert_eq!(stock(&db, v).await, 7);
        assert_eq!(sale.total_revenue_cents, 6000);
        assert_eq!(sale.total_cost_cents, 3000);
        assert_eq!(sale.total_profit_cents, 3000);
        assert_eq!(sale.quantity_refunded, 0);
        assert!(!sale.is_refund);

        // B: sell 10 with only 7 on hand
        let err = ledger.record_sale(v, 10, &alice()).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::InsufficientStock {
                available: 7,
                requested: 10,
                ..
            })
        ));
        assert_eq!(stock(&db, v).await, 7);

        // C: refund 2
        let outcome = ledger.record_refund(v, 2, &alice()).await.unwrap();
        assert_eq!(outcome.new_stock, 9);
        assert_eq!(outcome.refund_records.len(), 1);
        let refund = &outcome.refund_records[0];
        assert_eq!(refund.quantity_sold, -2);
        assert_eq!(refund.total_revenue_cents, -4000);
        assert_eq!(refund.total_cost_cents, -2000);
        assert_eq!(refund.total_profit_cents, -2000);
        assert!(refund.is_refund);

        let original = ledger.get_sale(&sale.id, &alice()).await.unwrap();
        assert_eq!(original.quantity_refunded, 2);
        assert_eq!(original.refund_state(), Some(RefundState::PartiallyRefunded));

        // D: refund 2 with 1 outstanding
        let err = ledger.record_refund(v, 2, &alice()).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::ExcessiveRefund {
                requested: 2,
                outstanding: 1
            })
        ));
        assert_eq!(stock(&db, v).await, 9);
        assert_eq!(ledger.list_sales_for_user(&alice()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_refund_spans_sales_newest_first() {
        // E
        let db = test_db().await;
        let seeded = seed_catalog(&db, "alice", 20).await;
        let ledger = db.ledger(StockPolicy::default());
        let v = seeded.variation_id.as_str();

        let older = ledger.record_sale(v, 4, &alice()).await.unwrap();
        let newer = ledger.record_sale(v, 6, &alice()).await.unwrap();

        let outcome = ledger.record_refund(v, 8, &alice()).await.unwrap();
        assert_eq!(outcome.allocations.len(), 2);
        assert_eq!(outcome.allocations[0].sale_id, newer.id);
        assert_eq!(outcome.allocations[0].quantity, 6);
        assert_eq!(outcome.allocations[1].sale_id, older.id);
        assert_eq!(outcome.allocations[1].quantity, 2);
        assert_eq!(outcome.new_stock, 18);

        let newer = ledger.get_sale(&newer.id, &alice()).await.unwrap();
        let older = ledger.get_sale(&older.id, &alice()).await.unwrap();
        assert_eq!(newer.refund_state(), Some(RefundState::FullyRefunded));
        assert_eq!(older.quantity_refunded, 2);
    }

    #[tokio::test]
    async fn test_round_trip_restores_stock() {
        let db = test_db().await;
        let seeded = seed_catalog(&db, "alice", 5).await;
        let ledger = db.ledger(StockPolicy::default());
        let v = seeded.variation_id.as_str();

        let sale = ledger.record_sale(v, 5, &alice()).await.unwrap();
        assert_eq!(stock(&db, v).await, 0);

        ledger.record_refund(v, 5, &alice()).await.unwrap();
        assert_eq!(stock(&db, v).await, 5);

        let sale = ledger.get_sale(&sale.id, &alice()).await.unwrap();
        assert_eq!(sale.quantity_refunded, 5);

        let records = ledger.list_sales_for_user(&alice()).await.unwrap();
        let net_units: i64 = records.iter().map(|r| r.quantity_sold).sum();
        assert_eq!(net_units, 0);
    }

    #[tokio::test]
    async fn test_strict_policy_keeps_last_unit() {
        let db = test_db().await;
        let seeded = seed_catalog(&db, "alice", 3).await;
        let ledger = db.ledger(StockPolicy {
            allow_sell_last_unit: false,
        });

        let err = ledger
            .record_sale(&seeded.variation_id, 3, &alice())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::InvalidQuantity { .. })
        ));
        assert_eq!(stock(&db, &seeded.variation_id).await, 3);
    }

    #[tokio::test]
    async fn test_foreign_variation_is_unauthorized() {
        let db = test_db().await;
        let seeded = seed_catalog(&db, "alice", 10).await;
        let ledger = db.ledger(StockPolicy::default());
        let mallory = UserId::from("mallory");

        let err = ledger
            .record_sale(&seeded.variation_id, 1, &mallory)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::Unauthorized { .. })
        ));

        let err = ledger
            .record_refund(&seeded.variation_id, 1, &mallory)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::Unauthorized { .. })
        ));

        let err = ledger.record_sale("no-such-id", 1, &alice()).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_ownership_is_checked_before_quantity() {
        let db = test_db().await;
        let seeded = seed_catalog(&db, "alice", 10).await;
        let ledger = db.ledger(StockPolicy::default());
        let mallory = UserId::from("mallory");

        let err = ledger
            .record_sale(&seeded.variation_id, 0, &mallory)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::Unauthorized { .. })
        ));

        let err = ledger
            .record_refund(&seeded.variation_id, -1, &mallory)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_quantities_are_rejected() {
        let db = test_db().await;
        let seeded = seed_catalog(&db, "alice", 10).await;
        let ledger = db.ledger(StockPolicy::default());

        for qty in [0, -3] {
            let err = ledger
                .record_sale(&seeded.variation_id, qty, &alice())
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                LedgerError::Core(CoreError::InvalidQuantity { .. })
            ));

            let err = ledger
                .record_refund(&seeded.variation_id, qty, &alice())
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                LedgerError::Core(CoreError::InvalidQuantity { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_refund_without_sales_is_excessive() {
        let db = test_db().await;
        let seeded = seed_catalog(&db, "alice", 10).await;
        let ledger = db.ledger(StockPolicy::default());

        // Nothing sold yet
        let err = ledger
            .record_refund(&seeded.variation_id, 1, &alice())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::ExcessiveRefund { outstanding: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_refund_proration_is_exact_over_thirds() {
        let db = test_db().await;
        // 3 units at 3.34 → revenue 10.02, cost 3 × 1.00
        let seeded = seed_product(&db, "alice", "Socks", 334, 100, 10).await;
        let ledger = db.ledger(StockPolicy::default());
        let v = seeded.variation_id.as_str();

        let sale = ledger.record_sale(v, 3, &alice()).await.unwrap();
        assert_eq!(sale.total_revenue_cents, 1002);

        let first = ledger.record_refund(v, 1, &alice()).await.unwrap();
        let rest = ledger.record_refund(v, 2, &alice()).await.unwrap();

        let refunded = -(first.refund_records[0].total_revenue_cents
            + rest.refund_records[0].total_revenue_cents);
        assert_eq!(first.allocations[0].revenue.cents(), 334);
        assert_eq!(rest.allocations[0].revenue.cents(), 668);
        assert_eq!(refunded, 1002);
    }

    #[tokio::test]
    async fn test_price_changes_apply_to_later_sales_only() {
        let db = test_db().await;
        let seeded = seed_catalog(&db, "alice", 10).await;
        let ledger = db.ledger(StockPolicy::default());
        let v = seeded.variation_id.as_str();

        let before = ledger.record_sale(v, 2, &alice()).await.unwrap();

        let changes = ims_core::ProductUpdate {
            selling_price_cents: Some(2500),
            cost_price_cents: Some(1200),
            ..Default::default()
        };
        db.products()
            .update(&seeded.product_id, "alice", &changes)
            .await
            .unwrap();

        let after = ledger.record_sale(v, 2, &alice()).await.unwrap();
        assert_eq!(after.total_revenue_cents, 5000);
        assert_eq!(after.total_cost_cents, 2400);
        assert_eq!(after.total_profit_cents, 2600);

        // Refunds prorate each sale's own totals, newest first
        let outcome = ledger.record_refund(v, 3, &alice()).await.unwrap();
        assert_eq!(outcome.refund_records[0].total_revenue_cents, -5000);
        assert_eq!(outcome.refund_records[1].total_revenue_cents, -2000);

        let before = ledger.get_sale(&before.id, &alice()).await.unwrap();
        assert_eq!(before.total_revenue_cents, 4000);
        assert_eq!(before.quantity_refunded, 1);
    }

    #[tokio::test]
    async fn test_sales_report_enriches_and_summarizes() {
        let db = test_db().await;
        let seeded = seed_catalog(&db, "alice", 10).await;
        let ledger = db.ledger(StockPolicy::default());
        let v = seeded.variation_id.as_str();

        ledger.record_sale(v, 3, &alice()).await.unwrap();
        ledger.record_refund(v, 1, &alice()).await.unwrap();

        let report = ledger.sales_report(&alice()).await.unwrap();
        assert_eq!(report.lines.len(), 2);
        // Newest first: the refund
        assert!(report.lines[0].record.is_refund);
        assert_eq!(report.lines[0].product_name, "Linen Shirt");
        assert_eq!(
            report.lines[0].product_image_url.as_deref(),
            Some("img/linen-white.png")
        );

        assert_eq!(report.summary.net_units, 2);
        assert_eq!(report.summary.net_revenue.cents(), 4000);

        // Soft-deleting the product keeps its history in the report
        db.products()
            .soft_delete(&seeded.product_id, "alice")
            .await
            .unwrap();
        assert_eq!(ledger.sales_report(&alice()).await.unwrap().lines.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_sale_is_scoped() {
        let db = test_db().await;
        let seeded = seed_catalog(&db, "alice", 10).await;
        let ledger = db.ledger(StockPolicy::default());

        let sale = ledger
            .record_sale(&seeded.variation_id, 1, &alice())
            .await
            .unwrap();

        let err = ledger
            .delete_sale(&sale.id, &UserId::from("bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Core(CoreError::SaleNotFound(_))));

        ledger.delete_sale(&sale.id, &alice()).await.unwrap();
        assert!(matches!(
            ledger.get_sale(&sale.id, &alice()).await,
            Err(LedgerError::Core(CoreError::SaleNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_sales_never_oversell() {
        let db = Database::new(
            crate::DbConfig::new(std::env::temp_dir().join(format!("ims-{}.db", ims_core::new_id())))
                .max_connections(4),
        )
        .await
        .unwrap();
        let seeded = seed_catalog(&db, "alice", 5).await;
        let ledger = db.ledger(StockPolicy::default());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let ledger = ledger.clone();
            let v = seeded.variation_id.clone();
            handles.push(tokio::spawn(async move {
                ledger.record_sale(&v, 1, &UserId::from("alice")).await.is_ok()
            }));
        }

        let mut sold = 0;
        for handle in handles {
            if handle.await.unwrap() {
                sold += 1;
            }
        }

        assert_eq!(sold, 5);
        assert_eq!(stock(&db, &seeded.variation_id).await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_sales_across_variations_all_commit() {
        let db = Database::new(
            crate::DbConfig::new(std::env::temp_dir().join(format!("ims-{}.db", ims_core::new_id())))
                .max_connections(8),
        )
        .await
        .unwrap();
        let ledger = db.ledger(StockPolicy::default());

        let mut variations = Vec::new();
        for i in 0..8 {
            let seeded = seed_product(&db, "alice", &format!("Tee {i}"), 2000, 1000, 100).await;
            variations.push(seeded.variation_id);
        }

        let mut handles = Vec::new();
        for _ in 0..5 {
            for v in &variations {
                let ledger = ledger.clone();
                let v = v.clone();
                handles.push(tokio::spawn(async move {
                    ledger.record_sale(&v, 1, &UserId::from("alice")).await
                }));
            }
        }

        let mut failures = Vec::new();
        for handle in handles {
            if let Err(err) = handle.await.unwrap() {
                failures.push(err.to_string());
            }
        }
        assert!(failures.is_empty(), "failed sales: {failures:?}");

        for v in &variations {
            assert_eq!(stock(&db, v).await, 95);
        }
        assert_eq!(ledger.list_sales_for_user(&alice()).await.unwrap().len(), 40);
    }
}
