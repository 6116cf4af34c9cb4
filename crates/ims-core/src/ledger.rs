//! # Ledger Planning
//!
//! Pure decision logic for sales and refunds. Given a snapshot of stock and
//! sale history, these functions decide *what* should change. Applying the
//! plan (inside one database transaction) is the job of `ims-db`.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  plan_sale(variation, product, qty, policy)                             │
//! │       │                                                                 │
//! │       ├── qty <= 0?                  → InvalidQuantity                  │
//! │       ├── stock < qty?               → InsufficientStock                │
//! │       ├── stock - qty == 0 && !allow → InvalidQuantity                  │
//! │       │                                                                 │
//! │       └── SalePlan { remaining_stock, revenue, cost, profit }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Refund Allocation (most recent first)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  History (newest → oldest)       Refund 8 units                         │
//! │                                                                         │
//! │  Sale B  sold 6  refunded 0  ──► take 6  (B becomes FullyRefunded)      │
//! │  Sale A  sold 4  refunded 0  ──► take 2  (A becomes PartiallyRefunded)  │
//! │                                                                         │
//! │  Each allocation prorates B's / A's totals by units / quantity_sold     │
//! │  and becomes one negative refund record.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, ProductVariation, SaleRecord, UserId};
use crate::validation::validate_quantity;

// =============================================================================
// Stock Policy
// =============================================================================

/// Configurable stock rules applied when planning a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPolicy {
    /// Whether a sale may bring a variation's stock to exactly zero.
    pub allow_sell_last_unit: bool,
}

impl Default for StockPolicy {
    fn default() -> Self {
        StockPolicy {
            allow_sell_last_unit: true,
        }
    }
}

// =============================================================================
// Sale Planning
// =============================================================================

/// The outcome of a successful sale check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalePlan {
    pub variation_id: String,
    pub quantity: i64,
    /// Stock on hand once the sale is applied.
    pub remaining_stock: i64,
    pub total_revenue: Money,
    pub total_cost: Money,
    pub total_profit: Money,
}

impl SalePlan {
    /// Builds the ledger entry for this sale.
    pub fn to_record(&self, user: &UserId, at: DateTime<Utc>) -> SaleRecord {
        SaleRecord {
            id: crate::new_id(),
            product_variation_id: self.variation_id.clone(),
            quantity_sold: self.quantity,
            quantity_refunded: 0,
            total_revenue_cents: self.total_revenue.cents(),
            total_cost_cents: self.total_cost.cents(),
            total_profit_cents: self.total_profit.cents(),
            transaction_date: at,
            user_id: user.as_str().to_string(),
            is_refund: false,
        }
    }
}

/// Checks a sale against current stock and computes its monetary totals.
///
/// ## Arguments
/// * `variation` - The variation being sold, already resolved for the acting user
/// * `product` - Its owning product (source of prices)
/// * `quantity` - Units requested
/// * `policy` - Whether the last unit may be sold
///
/// ## Example
/// ```rust,ignore
/// let plan = plan_sale(&variation, &product, 3, StockPolicy::default())?;
/// assert_eq!(plan.remaining_stock, 7);
/// ```
pub fn plan_sale(
    variation: &ProductVariation,
    product: &Product,
    quantity: i64,
    policy: StockPolicy,
) -> CoreResult<SalePlan> {
    validate_quantity(quantity).map_err(|e| CoreError::invalid_quantity(quantity, e.to_string()))?;

    if variation.quantity < quantity {
        return Err(CoreError::InsufficientStock {
            variation_id: variation.id.clone(),
            available: variation.quantity,
            requested: quantity,
        });
    }

    let remaining_stock = variation.quantity - quantity;
    if remaining_stock < 0 {
        return Err(CoreError::invalid_quantity(
            quantity,
            "sale would leave negative stock",
        ));
    }
    if remaining_stock == 0 && !policy.allow_sell_last_unit {
        return Err(CoreError::invalid_quantity(
            quantity,
            "selling the last unit in stock is not allowed",
        ));
    }

    let overflow = || CoreError::invalid_quantity(quantity, "sale total is too large");
    let total_revenue = product
        .selling_price()
        .checked_multiply_quantity(quantity)
        .ok_or_else(overflow)?;
    let total_cost = product
        .cost_price()
        .checked_multiply_quantity(quantity)
        .ok_or_else(overflow)?;

    Ok(SalePlan {
        variation_id: variation.id.clone(),
        quantity,
        remaining_stock,
        total_revenue,
        total_cost,
        total_profit: total_revenue - total_cost,
    })
}

// =============================================================================
// Refund Planning
// =============================================================================

/// Units taken back from one original sale record.
///
/// Amounts are positive; the refund ledger entry carries their negation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RefundAllocation {
    /// The original sale being refunded against.
    pub sale_id: String,
    pub quantity: i64,
    /// The original's `quantity_refunded` before this allocation.
    pub previously_refunded: i64,
    pub revenue: Money,
    pub cost: Money,
    pub profit: Money,
}

impl RefundAllocation {
    /// The original's `quantity_refunded` after this allocation.
    #[inline]
    pub fn refunded_after(&self) -> i64 {
        self.previously_refunded + self.quantity
    }

    /// Builds the negative ledger entry for this allocation.
    pub fn to_refund_record(
        &self,
        variation_id: &str,
        user: &UserId,
        at: DateTime<Utc>,
    ) -> SaleRecord {
        SaleRecord {
            id: crate::new_id(),
            product_variation_id: variation_id.to_string(),
            quantity_sold: -self.quantity,
            quantity_refunded: 0,
            total_revenue_cents: (-self.revenue).cents(),
            total_cost_cents: (-self.cost).cents(),
            total_profit_cents: (-self.profit).cents(),
            transaction_date: at,
            user_id: user.as_str().to_string(),
            is_refund: true,
        }
    }
}

/// A complete refund allocation across prior sales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundPlan {
    pub variation_id: String,
    pub quantity: i64,
    /// In allocation order: newest sale first.
    pub allocations: Vec<RefundAllocation>,
}

/// Allocates a refund across prior sales, most recent first.
///
/// `records` is the sale history for one variation and user. Refund
/// adjustments in it are ignored. Records are ordered by `transaction_date`
/// descending; records sharing a timestamp keep the order they were passed
/// in, so callers pass ties newest first.
///
/// ## Errors
/// - `InvalidQuantity` if `quantity` is not positive
/// - `ExcessiveRefund` if `quantity` exceeds the outstanding sold units
/// - `InternalInconsistency` if the walk cannot place every unit
pub fn plan_refund(
    variation_id: &str,
    records: &[SaleRecord],
    quantity: i64,
) -> CoreResult<RefundPlan> {
    validate_quantity(quantity).map_err(|e| CoreError::invalid_quantity(quantity, e.to_string()))?;

    let mut originals: Vec<&SaleRecord> = records.iter().filter(|r| !r.is_refund).collect();

    let total_sold: i64 = originals.iter().map(|r| r.quantity_sold).sum();
    let total_refunded: i64 = originals.iter().map(|r| r.quantity_refunded).sum();
    let outstanding = total_sold - total_refunded;

    if outstanding - quantity < 0 {
        return Err(CoreError::ExcessiveRefund {
            requested: quantity,
            outstanding,
        });
    }

    // Stable: equal timestamps keep caller order
    originals.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));

    let mut remaining = quantity;
    let mut allocations = Vec::new();

    for record in originals {
        if remaining == 0 {
            break;
        }

        let available = record.quantity_sold - record.quantity_refunded;
        let amount = available.min(remaining);
        if amount <= 0 {
            continue;
        }

        allocations.push(RefundAllocation {
            sale_id: record.id.clone(),
            quantity: amount,
            previously_refunded: record.quantity_refunded,
            revenue: record.total_revenue().prorate(amount, record.quantity_sold),
            cost: record.total_cost().prorate(amount, record.quantity_sold),
            profit: record.total_profit().prorate(amount, record.quantity_sold),
        });

        remaining -= amount;
    }

    if remaining > 0 {
        return Err(CoreError::InternalInconsistency(format!(
            "{remaining} of {quantity} refunded units for variation {variation_id} could not be allocated"
        )));
    }

    Ok(RefundPlan {
        variation_id: variation_id.to_string(),
        quantity,
        allocations,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
