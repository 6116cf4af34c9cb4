//! # Error Types
//!
//! Domain-specific error types for ims-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ims-core errors (this file)                                           │
//! │  ├── CoreError        - Ledger and catalog rule violations             │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  ims-db errors (separate crate)                                        │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── LedgerError      - CoreError | DbError from the Ledger service    │
//! │                                                                         │
//! │  HTTP errors (apps/ims-api)                                            │
//! │  └── ApiError         - What the dashboard sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LedgerError → ApiError → Client   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent ledger rule violations. Every variant carries enough
/// context to build a human-readable rejection message.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The variation does not exist or belongs to another user.
    ///
    /// ## When This Occurs
    /// - Variation ID doesn't exist
    /// - Variation is owned by a different user (authorization boundary)
    /// - Owning product was soft-deleted
    ///
    /// The two cases are deliberately indistinguishable to the caller.
    #[error("Product variation {variation_id} is not available to this user")]
    Unauthorized { variation_id: String },

    /// Sale quantity exceeds stock on hand.
    ///
    /// ## User Workflow
    /// ```text
    /// Sell (qty: 10)
    ///      │
    ///      ▼
    /// Check stock: available=7
    ///      │
    ///      ▼
    /// InsufficientStock { available: 7, requested: 10 }
    ///      │
    ///      ▼
    /// UI shows: "Only 7 in stock"
    /// ```
    #[error("Insufficient stock for variation {variation_id}: available {available}, requested {requested}")]
    InsufficientStock {
        variation_id: String,
        available: i64,
        requested: i64,
    },

    /// Quantity is non-positive, too large, or would leave an invalid residual stock.
    #[error("Invalid quantity {requested}: {reason}")]
    InvalidQuantity { requested: i64, reason: String },

    /// Refund exceeds the net outstanding sold quantity.
    #[error("Refund of {requested} exceeds outstanding sold quantity {outstanding}")]
    ExcessiveRefund { requested: i64, outstanding: i64 },

    /// A ledger post-condition was violated.
    ///
    /// Cannot happen while `0 <= quantity_refunded <= quantity_sold` holds
    /// for every record. Surfaced as a fatal error, never swallowed.
    #[error("Ledger inconsistency: {0}")]
    InternalInconsistency(String),

    /// Product cannot be found for this user.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Sale record cannot be found for this user.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidQuantity error.
    pub fn invalid_quantity(requested: i64, reason: impl Into<String>) -> Self {
        CoreError::InvalidQuantity {
            requested,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
