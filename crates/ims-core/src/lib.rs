//! # ims-core: Pure Business Logic for the IMS Dashboard
//!
//! This crate holds the domain model and the sale/refund bookkeeping rules
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        IMS Dashboard Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard Frontend                           │   │
//! │  │    Catalog ──► Sell / Refund ──► Sales Report                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (apps/ims-api)                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ims-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ SalePlan  │  │   rules   │  │   │
//! │  │   │ Variation │  │  prorate  │  │RefundPlan │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    ims-db (Database Layer)                      │   │
//! │  │       SQLite queries, migrations, repositories, Ledger          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, ProductVariation, SaleRecord, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ledger`] - Sale and refund planning (stock checks, FIFO-style allocation)
//! - [`report`] - Sales summaries for reporting collaborators
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use ims_core::money::Money;
//!
//! // Revenue for 3 units at $20.00
//! let revenue = Money::from_cents(2000).multiply_quantity(3);
//! assert_eq!(revenue.cents(), 6000);
//!
//! // Refunding 2 of those 3 units prorates the total
//! assert_eq!(revenue.prorate(2, 3).cents(), 4000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{plan_refund, plan_sale, RefundAllocation, RefundPlan, SalePlan, StockPolicy};
pub use money::Money;
pub use report::SalesSummary;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Upper bound on units in a single sale or refund request.
///
/// Keeps `price × quantity` far away from `i64` overflow for any realistic
/// price while never getting in the way of a real shop.
pub const MAX_TRANSACTION_QUANTITY: i64 = 1_000_000;

/// Generates a new entity ID (UUID v4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
