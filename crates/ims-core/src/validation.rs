//! # Validation Module
//!
//! Input validation utilities for the IMS dashboard.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard (TypeScript)                                       │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler + Ledger (Rust)                                 │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0)                                             │
//! │  ├── CHECK (quantity_refunded <= quantity_sold)                        │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ims_core::validation::{validate_product_name, validate_quantity};
//!
//! assert!(validate_product_name("Linen Shirt").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::{NewProduct, ProductUpdate};
use crate::MAX_TRANSACTION_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ## Example
/// ```rust
/// use ims_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Oversized Hoodie").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name, 200)
}

/// Validates a color or size name.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters ("Navy", "XL", "EU 42")
pub fn validate_catalog_name(field: &str, name: &str) -> ValidationResult<()> {
    validate_name(field, name, 50)
}

fn validate_name(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale or refund quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_TRANSACTION_QUANTITY
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Dashboard: Sell Variation                                              │
/// │                                                                         │
/// │  User enters quantity: 3                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(3) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → InvalidQuantity                                  │
/// │       │                                                                 │
/// │       ├── qty > max? → InvalidQuantity                                 │
/// │       │                                                                 │
/// │       └── OK → Ledger checks stock                                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_TRANSACTION_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_TRANSACTION_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an initial or restocked stock level (zero allowed).
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if !(0..=MAX_TRANSACTION_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_TRANSACTION_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (giveaways)
///
/// ## Example
/// ```rust
/// use ims_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("sellingPrice", 2000).is_ok());
/// assert!(validate_price_cents("sellingPrice", 0).is_ok());
/// assert!(validate_price_cents("costPrice", -100).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a new product's name and prices.
pub fn validate_new_product(input: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&input.name)?;
    validate_price_cents("costPriceCents", input.cost_price_cents)?;
    validate_price_cents("sellingPriceCents", input.selling_price_cents)?;
    Ok(())
}

/// Validates the fields present in a product edit.
///
/// An edit that changes nothing is rejected.
pub fn validate_product_update(changes: &ProductUpdate) -> ValidationResult<()> {
    if changes.is_empty() {
        return Err(ValidationError::Required {
            field: "at least one product field".to_string(),
        });
    }
    if let Some(name) = &changes.name {
        validate_product_name(name)?;
    }
    if let Some(cents) = changes.cost_price_cents {
        validate_price_cents("costPriceCents", cents)?;
    }
    if let Some(cents) = changes.selling_price_cents {
        validate_price_cents("sellingPriceCents", cents)?;
    }
    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use ims_core::validation::validate_uuid;
///
/// assert!(validate_uuid("productVariationId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("productVariationId", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
