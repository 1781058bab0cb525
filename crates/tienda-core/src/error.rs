//! # Error Types
//!
//! Domain-specific error types for tienda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tienda-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Malformed / out-of-range input                  │
//! │                                                                         │
//! │  tienda-db errors (separate crate)                                      │
//! │  └── DbError          - Storage failures                                │
//! │                                                                         │
//! │  tienda-service boundary                                                │
//! │  └── ServiceError     - Uniform envelope + HTTP status mapping          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derives, never manual Display impls
//! 2. Every variant carries the context the caller needs to react
//!    (product name, available stock, user id)
//! 3. Errors are enum variants, never bare Strings

use thiserror::Error;

/// Core business logic errors.
///
/// These represent business rule violations. They are deliberately
/// fine-grained so the boundary layer can map each one to the right
/// response status without string matching.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id does not exist, or the product was soft-deleted.
    #[error("product {0} not found")]
    ProductNotFound(String),

    /// Sale id does not exist.
    #[error("sale {0} not found")]
    SaleNotFound(String),

    /// Requested quantity exceeds what the shelf holds.
    ///
    /// Carries the product *name* (not id) because this message goes
    /// straight to the cashier's screen.
    #[error("insufficient stock for '{name}': {available} available, {requested} requested")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// A second open attempt while the user already has an open till.
    #[error("a till is already open for user {user_id}")]
    TillAlreadyOpen { user_id: String },

    /// Selling requires an open till; the operation is invalid in the
    /// user's current state.
    #[error("no open till for user {user_id}")]
    NoOpenTill { user_id: String },

    /// Close requested but there is no open till to close.
    #[error("no open till to close for user {user_id}")]
    OpenTillNotFound { user_id: String },

    /// Payment cannot settle (cash tendered below total past tolerance).
    #[error("invalid payment: {reason}")]
    InvalidPayment { reason: String },

    /// Too many line items in a single sale.
    #[error("a sale cannot have more than {max} line items")]
    TooManyLines { max: usize },

    /// Line quantity exceeds the per-line cap.
    #[error("quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Input validation failure (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Input validation errors.
///
/// Raised before any business logic runs, for input that is malformed
/// regardless of current system state.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Amount fields (opening float, closing count, tender) must be >= 0.
    #[error("{field} cannot be negative")]
    MustBeNonNegative { field: String },

    /// Quantities must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

/// Convenience alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message_names_product_and_stock() {
        let err = CoreError::InsufficientStock {
            name: "Leche Entera 1L".to_string(),
            available: 5,
            requested: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("Leche Entera 1L"));
        assert!(msg.contains("5 available"));
        assert!(msg.contains("10 requested"));
    }

    #[test]
    fn test_no_open_till_message() {
        let err = CoreError::NoOpenTill {
            user_id: "u-1".to_string(),
        };
        assert_eq!(err.to_string(), "no open till for user u-1");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let err: CoreError = ValidationError::MustBeNonNegative {
            field: "opening_amount".to_string(),
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "validation error: opening_amount cannot be negative"
        );
    }
}
