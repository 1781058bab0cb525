//! # Payment Settlement
//!
//! Pure settlement logic, one rule set per payment method.
//!
//! ## Settlement Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cash      tendered must cover the total, minus a one-cent tolerance    │
//! │            that forgives rounding noise from upstream float input.      │
//! │            change = max(tendered - total, 0); reference discarded,      │
//! │            cash has no external transaction to point at.                │
//! │                                                                         │
//! │  Card      tendered is forced to the total, change = 0; the reference   │
//! │  Transfer  (auth code / transfer id) is carried through untouched.      │
//! │            No gateway validation happens here.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tolerance applies only to underpayment. Overpaying cash is always
//! accepted; the surplus comes back as change.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::PaymentMethod;

/// How far below the total a cash tender may fall and still settle.
/// One cent, to absorb rounding error from callers that price in floats.
pub const CASH_TOLERANCE_CENTS: i64 = 1;

/// The outcome of settling a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Amount recorded as tendered.
    pub tendered: Money,
    /// Change due back to the customer.
    pub change: Money,
    /// Opaque external reference, carried through for Card/Transfer.
    pub reference: Option<String>,
}

/// Settles a payment against a computed sale total.
///
/// This is the only place payment-method branching happens; everywhere
/// else treats the result uniformly.
pub fn settle(
    method: PaymentMethod,
    total: Money,
    tendered: Money,
    reference: Option<String>,
) -> CoreResult<Settlement> {
    match method {
        PaymentMethod::Cash => {
            if tendered.cents() + CASH_TOLERANCE_CENTS < total.cents() {
                return Err(CoreError::InvalidPayment {
                    reason: format!(
                        "amount tendered is less than total ({} < {})",
                        tendered, total
                    ),
                });
            }
            // A tolerated one-cent shortfall must not produce negative change.
            let change = (tendered - total).max(Money::zero());
            Ok(Settlement {
                tendered,
                change,
                // Only Card/Transfer carry an external reference.
                reference: None,
            })
        }
        PaymentMethod::Card | PaymentMethod::Transfer => Ok(Settlement {
            tendered: total,
            change: Money::zero(),
            reference,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cash_exact_amount() {
        let s = settle(PaymentMethod::Cash, Money::from_cents(750), Money::from_cents(750), None)
            .unwrap();
        assert_eq!(s.tendered.cents(), 750);
        assert_eq!(s.change, Money::zero());
    }

    #[test]
    fn test_cash_overpayment_returns_change() {
        let s = settle(
            PaymentMethod::Cash,
            Money::from_cents(750),
            Money::from_cents(1000),
            None,
        )
        .unwrap();
        assert_eq!(s.change.cents(), 250);
    }

    #[test]
    fn test_cash_discards_any_reference() {
        let s = settle(
            PaymentMethod::Cash,
            Money::from_cents(750),
            Money::from_cents(800),
            Some("AUTH-123".to_string()),
        )
        .unwrap();
        assert_eq!(s.reference, None);
    }

    #[test]
    fn test_cash_one_cent_short_is_tolerated() {
        let s = settle(PaymentMethod::Cash, Money::from_cents(750), Money::from_cents(749), None)
            .unwrap();
        assert_eq!(s.tendered.cents(), 749);
        assert_eq!(s.change, Money::zero());
    }

    #[test]
    fn test_cash_beyond_tolerance_is_rejected() {
        let err = settle(PaymentMethod::Cash, Money::from_cents(750), Money::from_cents(650), None)
            .unwrap_err();
        assert!(err.to_string().contains("amount tendered is less than total"));
    }

    #[test]
    fn test_card_forces_tendered_to_total() {
        let s = settle(
            PaymentMethod::Card,
            Money::from_cents(750),
            Money::from_cents(9999),
            Some("AUTH-123".to_string()),
        )
        .unwrap();
        assert_eq!(s.tendered.cents(), 750);
        assert_eq!(s.change, Money::zero());
        assert_eq!(s.reference.as_deref(), Some("AUTH-123"));
    }

    #[test]
    fn test_transfer_forces_tendered_to_total() {
        let s = settle(
            PaymentMethod::Transfer,
            Money::from_cents(750),
            Money::zero(),
            Some("TRX-9".to_string()),
        )
        .unwrap();
        assert_eq!(s.tendered.cents(), 750);
        assert_eq!(s.change, Money::zero());
    }
}
