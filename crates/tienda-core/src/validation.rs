//! # Validation Module
//!
//! Input validation that runs before any business logic or storage access.
//! Database constraints (NOT NULL, unique indexes, foreign keys) are the
//! last line of defense; these checks exist to fail early with messages
//! a caller can act on.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::LineRequest;
use crate::{MAX_LINE_QUANTITY, MAX_SALE_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a monetary amount field that must be >= 0
/// (opening float, closing count, tendered amount).
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a line quantity: strictly positive.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a non-empty identifier field.
pub fn validate_id(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates the full line-request set for a sale: at least one line,
/// bounded line count, every quantity positive and capped.
pub fn validate_line_requests(items: &[LineRequest]) -> CoreResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        }
        .into());
    }

    if items.len() > MAX_SALE_LINES {
        return Err(CoreError::TooManyLines {
            max: MAX_SALE_LINES,
        });
    }

    for item in items {
        validate_id("product_id", &item.product_id)?;
        validate_quantity(item.quantity)?;
        if item.quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: item.quantity,
                max: MAX_LINE_QUANTITY,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: &str, quantity: i64) -> LineRequest {
        LineRequest {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_amount_rejects_negative() {
        assert!(validate_amount_cents("opening_amount", -1).is_err());
        assert!(validate_amount_cents("opening_amount", 0).is_ok());
        assert!(validate_amount_cents("opening_amount", 10000).is_ok());
    }

    #[test]
    fn test_quantity_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_empty_line_set_rejected() {
        assert!(validate_line_requests(&[]).is_err());
    }

    #[test]
    fn test_zero_quantity_line_rejected() {
        let err = validate_line_requests(&[line("p-1", 0)]).unwrap_err();
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn test_quantity_cap() {
        assert!(validate_line_requests(&[line("p-1", MAX_LINE_QUANTITY)]).is_ok());
        let err = validate_line_requests(&[line("p-1", MAX_LINE_QUANTITY + 1)]).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
    }

    #[test]
    fn test_line_count_cap() {
        let items: Vec<LineRequest> = (0..=MAX_SALE_LINES)
            .map(|i| line(&format!("p-{i}"), 1))
            .collect();
        let err = validate_line_requests(&items).unwrap_err();
        assert!(matches!(err, CoreError::TooManyLines { .. }));
    }

    #[test]
    fn test_valid_line_set() {
        assert!(validate_line_requests(&[line("p-1", 2), line("p-2", 5)]).is_ok());
    }
}
