//! # ims-db: Database Layer for the IMS Dashboard
//!
//! SQLite storage for products, variations, colors, sizes and the sales
//! ledger, accessed asynchronously through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         IMS Data Flow                                   │
//! │                                                                         │
//! │  HTTP handler (POST /api/sell-product-variation)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      ims-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ VariationRepo │    │ 001_initial_ │  │   │
//! │  │   │ VariationLocks│    │ SaleRepo      │    │   schema.sql │  │   │
//! │  │   └───────┬───────┘    │ CatalogRepo   │    └──────────────┘  │   │
//! │  │           │            └───────────────┘                      │   │
//! │  │           ▼                                                   │   │
//! │  │   ┌───────────────┐                                           │   │
//! │  │   │    Ledger     │  sale / refund transactions               │   │
//! │  │   └───────────────┘                                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (ims.db)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and ledger error types
//! - [`repository`] - Repository implementations (product, variation, sale, catalog)
//! - [`ledger`] - Transactional sale and refund recording
//! - [`locks`] - Per-variation in-process locks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ims_core::{StockPolicy, UserId};
//! use ims_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./ims.db")).await?;
//!
//! let ledger = db.ledger(StockPolicy::default());
//! let sale = ledger.record_sale(&variation_id, 2, &UserId::new("user-1")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod locks;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, LedgerError, LedgerResult};
pub use ledger::{Ledger, RefundOutcome, SalesReport};
pub use locks::VariationLocks;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::variation::VariationRepository;
