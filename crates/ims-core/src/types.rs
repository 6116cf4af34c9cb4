//! # Domain Types
//!
//! Core domain types used throughout the IMS dashboard.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │    Product      │◄──│ ProductVariation │──►│  Color / Size   │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  id (UUID)      │   │  id (UUID)       │   │  id (UUID)      │      │
//! │  │  name           │   │  product_id      │   │  name           │      │
//! │  │  cost_price     │   │  color_id        │   └─────────────────┘      │
//! │  │  selling_price  │   │  size_id         │                            │
//! │  │  image_urls     │   │  quantity (≥ 0)  │                            │
//! │  └─────────────────┘   └────────▲─────────┘                            │
//! │                                 │                                       │
//! │                        ┌────────┴─────────┐   ┌─────────────────┐      │
//! │                        │   SaleRecord     │   │  RefundState    │      │
//! │                        │  ──────────────  │   │  ─────────────  │      │
//! │                        │  quantity_sold   │   │  Active         │      │
//! │                        │  quantity_refund │──►│  Partially      │      │
//! │                        │  totals (cents)  │   │  Fully          │      │
//! │                        │  is_refund       │   └─────────────────┘      │
//! │                        └──────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! Every persisted entity carries a `user_id`. Lookups are always scoped by
//! the acting user; an entity owned by somebody else behaves as if it did
//! not exist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// User Identity
// =============================================================================

/// The acting user, passed explicitly into every ledger operation.
///
/// The value is opaque to the core; the HTTP layer takes it from the
/// authenticated token subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        UserId(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        UserId(id.to_string())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog item. Prices are read-only inputs to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owner of this product.
    pub user_id: String,

    /// Display name shown in the dashboard and on reports.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Cost price in cents.
    pub cost_price_cents: i64,

    /// Selling price in cents.
    pub selling_price_cents: i64,

    /// Raw image URL list as stored, e.g. `[/img/a.png, /img/b.png]`.
    pub image_urls: Option<String>,

    /// Soft delete flag. Deleted products keep their sales history.
    pub deleted: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the cost price as a Money type.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// Returns the selling price as a Money type.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }

    /// Returns the first image URL from the stored list, if any.
    pub fn primary_image_url(&self) -> Option<String> {
        self.image_urls.as_deref().and_then(primary_image_url)
    }
}

/// Extracts the primary image URL from a raw stored list.
///
/// ## Format
/// ```text
/// "[/uploads/shirt-red.png, /uploads/shirt-blue.png]"
///        │
///        ▼  strip brackets, split on ',', take first, trim, drop one leading '/'
/// "uploads/shirt-red.png"
/// ```
///
/// Returns `None` when the list is empty.
pub fn primary_image_url(raw: &str) -> Option<String> {
    let cleaned = raw.replace(&['[', ']'][..], "");
    let first = cleaned.split(',').next()?.trim();
    let first = first.strip_prefix('/').unwrap_or(first);

    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

// =============================================================================
// Catalog Entries
// =============================================================================

/// A named color referenced by variations.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Color {
    pub id: String,
    pub name: String,
    pub user_id: String,
}

/// A named size referenced by variations.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Size {
    pub id: String,
    pub name: String,
    pub user_id: String,
}

// =============================================================================
// Product Variation
// =============================================================================

/// One purchasable SKU: product × color × size, with its stock on hand.
///
/// `quantity` never goes negative. It changes only through sales,
/// refunds, and explicit restocks.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductVariation {
    pub id: String,
    pub product_id: String,
    pub color_id: String,
    pub size_id: String,
    pub quantity: i64,
    pub user_id: String,
}

/// Stock summed across all variations of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductStockTotal {
    pub product_id: String,
    pub total_quantity: i64,
}

// =============================================================================
// Sale Record
// =============================================================================

/// An append-only ledger entry.
///
/// ## Two Shapes
/// ```text
/// Original sale                     Refund adjustment
/// ─────────────                     ─────────────────
/// quantity_sold      = +3           quantity_sold      = -2
/// quantity_refunded  = 0 → 2        quantity_refunded  = 0
/// total_revenue      = +6000        total_revenue      = -4000
/// is_refund          = false        is_refund          = true
/// ```
///
/// Summing `quantity_sold` over both shapes gives the net units that left
/// the shop.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleRecord {
    pub id: String,
    pub product_variation_id: String,
    pub quantity_sold: i64,
    pub quantity_refunded: i64,
    pub total_revenue_cents: i64,
    pub total_cost_cents: i64,
    pub total_profit_cents: i64,
    #[ts(as = "String")]
    pub transaction_date: DateTime<Utc>,
    pub user_id: String,
    pub is_refund: bool,
}

impl SaleRecord {
    #[inline]
    pub fn total_revenue(&self) -> Money {
        Money::from_cents(self.total_revenue_cents)
    }

    #[inline]
    pub fn total_cost(&self) -> Money {
        Money::from_cents(self.total_cost_cents)
    }

    #[inline]
    pub fn total_profit(&self) -> Money {
        Money::from_cents(self.total_profit_cents)
    }

    /// Units of an original sale that can still be refunded.
    ///
    /// Always zero for refund adjustments.
    pub fn outstanding(&self) -> i64 {
        if self.is_refund {
            0
        } else {
            (self.quantity_sold - self.quantity_refunded).max(0)
        }
    }

    /// Where an original sale sits in its refund lifecycle.
    ///
    /// Returns `None` for refund adjustments, which have no lifecycle.
    pub fn refund_state(&self) -> Option<RefundState> {
        if self.is_refund {
            return None;
        }

        Some(if self.quantity_refunded <= 0 {
            RefundState::ActiveUnrefunded
        } else if self.quantity_refunded < self.quantity_sold {
            RefundState::PartiallyRefunded
        } else {
            RefundState::FullyRefunded
        })
    }
}

// =============================================================================
// Refund State
// =============================================================================

/// Lifecycle of an original sale record.
///
/// ```text
/// ActiveUnrefunded ──► PartiallyRefunded ──► FullyRefunded
///        │                                        ▲
///        └────────────────────────────────────────┘
/// ```
///
/// Transitions are monotonic; `FullyRefunded` is terminal and skipped by
/// refund allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RefundState {
    ActiveUnrefunded,
    PartiallyRefunded,
    FullyRefunded,
}

// =============================================================================
// Report Line
// =============================================================================

/// A sale record enriched for display: product name and primary image.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleReportLine {
    #[serde(flatten)]
    pub record: SaleRecord,
    pub product_id: String,
    pub product_name: String,
    pub product_image_url: Option<String>,
}

// =============================================================================
// Input Types
// =============================================================================

/// Fields needed to create a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub cost_price_cents: i64,
    pub selling_price_cents: i64,
    #[serde(default)]
    pub image_urls: Option<String>,
}

/// A partial product edit. `None` leaves the stored value as it is.
///
/// Price changes apply to sales recorded afterwards; existing sale records
/// keep the totals computed when they were written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cost_price_cents: Option<i64>,
    #[serde(default)]
    pub selling_price_cents: Option<i64>,
    #[serde(default)]
    pub image_urls: Option<String>,
}

impl ProductUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.cost_price_cents.is_none()
            && self.selling_price_cents.is_none()
            && self.image_urls.is_none()
    }
}

/// One variation to create alongside a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewVariation {
    pub color_id: String,
    pub size_id: String,
    pub quantity: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
