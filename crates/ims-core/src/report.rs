//! # Sales Summaries
//!
//! Aggregates ledger entries into the totals shown on the sales report.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  originals (is_refund = false) ──► gross_*                 │
//! │  refunds   (is_refund = true)  ──► refunded_* (positive)   │
//! │                                                            │
//! │  net_* = gross_* - refunded_*                              │
//! └────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::SaleRecord;

/// Totals over a set of sale records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesSummary {
    pub sale_count: i64,
    pub refund_count: i64,
    pub units_sold: i64,
    pub units_refunded: i64,
    pub net_units: i64,
    pub gross_revenue: Money,
    pub gross_cost: Money,
    pub gross_profit: Money,
    pub refunded_revenue: Money,
    pub refunded_cost: Money,
    pub refunded_profit: Money,
    pub net_revenue: Money,
    pub net_cost: Money,
    pub net_profit: Money,
}

impl SalesSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SaleRecord>,
    {
        let mut summary = SalesSummary::default();

        for record in records {
            if record.is_refund {
                summary.refund_count += 1;
                summary.units_refunded += -record.quantity_sold;
                summary.refunded_revenue -= record.total_revenue();
                summary.refunded_cost -= record.total_cost();
                summary.refunded_profit -= record.total_profit();
            } else {
                summary.sale_count += 1;
                summary.units_sold += record.quantity_sold;
                summary.gross_revenue += record.total_revenue();
                summary.gross_cost += record.total_cost();
                summary.gross_profit += record.total_profit();
            }
        }

        summary.net_units = summary.units_sold - summary.units_refunded;
        summary.net_revenue = summary.gross_revenue - summary.refunded_revenue;
        summary.net_cost = summary.gross_cost - summary.refunded_cost;
        summary.net_profit = summary.gross_profit - summary.refunded_profit;
        summary
    }
}
