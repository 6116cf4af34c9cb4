//! # Repository Module
//!
//! Database repository implementations for the IMS dashboard.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler / Ledger                                                 │
//! │       │                                                                 │
//! │       │  db.variations().get_for_owner(id, user)                       │
//! │       ▼                                                                 │
//! │  VariationRepository                                                   │
//! │  ├── get_for_owner(&self, ...)       ← pool, standalone reads          │
//! │  ├── restock(&self, ...)                                               │
//! │  └── decrement_stock_in(conn, ...)   ← connection, inside a tx         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Functions ending in `_in` take a `&mut SqliteConnection` so the ledger can
//! compose them into a single transaction.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Products, soft delete
//! - [`VariationRepository`](variation::VariationRepository) - Stock levels
//! - [`SaleRepository`](sale::SaleRepository) - Sales ledger and reports
//! - [`CatalogRepository`](catalog::CatalogRepository) - Colors and sizes

pub mod catalog;
pub mod product;
pub mod sale;
pub mod variation;

#[cfg(test)]
pub(crate) mod testing;
