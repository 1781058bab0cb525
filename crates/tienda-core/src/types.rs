//! # Domain Types
//!
//! Core domain types for the POS back end.
//!
//! ## Ownership Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog  ──owns──►  Product   (price, stock, minimum, active flag)     │
//! │  Registry ──owns──►  Till      (one Open till per user, max)            │
//! │  Ledger   ──owns──►  Sale ──┬─► SaleLine (price captured at sale time)  │
//! │                             └─► never mutated after creation            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All monetary fields are integer cents (`*_cents: i64`) with [`Money`]
//! accessors; the database, calculations and API all stay in cents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// Deletion is soft: `active` flips to false and every read query filters
/// on it. Stock must never be negative after a committed sale; the debit
/// path enforces that, not this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the cashier.
    pub name: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Current stock level.
    pub stock: i64,

    /// Threshold at or below which the product appears in low-stock alerts.
    pub stock_minimum: i64,

    /// Optional supplier reference.
    pub supplier_id: Option<String>,

    /// Optional barcode (EAN-13, UPC-A, ...).
    pub barcode: Option<String>,

    /// Soft-delete flag.
    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether the shelf holds enough for the requested quantity.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }

    /// Whether this product should show up in low-stock alerts.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.stock_minimum
    }
}

// =============================================================================
// Till (cash session)
// =============================================================================

/// The lifecycle state of a till.
///
/// A till is created Open and transitions to Closed exactly once.
/// Closed tills are history: never reopened, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum TillState {
    Open,
    Closed,
}

/// A cash-drawer session bounded by open/close events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Till {
    pub id: String,

    /// The user this session belongs to. At most one Open till per user.
    pub user_id: String,

    pub opened_at: DateTime<Utc>,

    /// Null while the till is Open.
    pub closed_at: Option<DateTime<Utc>>,

    /// Opening float counted into the drawer.
    pub opening_cents: i64,

    /// Null while the till is Open.
    pub closing_cents: Option<i64>,

    pub state: TillState,
}

impl Till {
    #[inline]
    pub fn opening(&self) -> Money {
        Money::from_cents(self.opening_cents)
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == TillState::Open
    }
}

/// Outcome of closing a till. Variance may be negative; it is reported,
/// never rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TillCloseReport {
    pub till_id: String,
    pub opening_cents: i64,
    pub closing_cents: i64,
    pub variance_cents: i64,
}

impl TillCloseReport {
    #[inline]
    pub fn variance(&self) -> Money {
        Money::from_cents(self.variance_cents)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
///
/// Adding a method here forces every settlement match to handle it,
/// which is the point of using an enum over free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash; change is computed.
    Cash,
    /// Card on an external terminal; amount is forced to the total.
    Card,
    /// Bank transfer; amount is forced to the total.
    Transfer,
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale transaction. Append-only: created atomically with its
/// line items and never edited afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,

    /// The till that was open when the sale was recorded.
    pub till_id: String,

    /// Cashier who recorded the sale.
    pub user_id: String,

    /// Optional registered client; None means a walk-in customer.
    pub client_id: Option<String>,

    /// Sum of line subtotals.
    pub total_cents: i64,

    pub payment_method: PaymentMethod,

    /// Amount accepted from the customer. Equals total for Card/Transfer.
    pub tendered_cents: i64,

    /// tendered - total for Cash; zero for Card/Transfer.
    pub change_cents: i64,

    /// Opaque external reference (card auth code, transfer id).
    pub reference: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn change(&self) -> Money {
        Money::from_cents(self.change_cents)
    }
}

/// One product-quantity entry within a sale.
///
/// The unit price is a snapshot captured at sale time. Later catalog
/// price changes must not rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// quantity × unit_price_cents.
    pub subtotal_cents: i64,
}

impl SaleLine {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

/// A sale line with the product name resolved for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLineDetail {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

/// A sale header together with its resolved lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDetail {
    pub sale: Sale,
    pub lines: Vec<SaleLineDetail>,
}

/// Row in the sales history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub total_cents: i64,
    /// Client display name, or "walk-in" when no client was attached.
    pub client_name: String,
    /// Username of the cashier who recorded the sale.
    pub cashier: String,
}

// =============================================================================
// Requests
// =============================================================================

/// One requested line of a sale: which product, how many.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// Everything the sale processor needs to record one sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRequest {
    pub items: Vec<LineRequest>,
    pub client_id: Option<String>,
    pub user_id: String,
    pub payment_method: PaymentMethod,
    pub tendered_cents: i64,
    pub reference: Option<String>,
}

// =============================================================================
// Stock alerts
// =============================================================================

/// Products at or below their minimum threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAlerts {
    pub items: Vec<Product>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, minimum: i64) -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Test".to_string(),
            price_cents: 100,
            stock,
            stock_minimum: minimum,
            supplier_id: None,
            barcode: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_can_sell() {
        assert!(product(5, 0).can_sell(5));
        assert!(!product(5, 0).can_sell(6));
    }

    #[test]
    fn test_low_stock_is_at_or_below_minimum() {
        assert!(product(5, 5).is_low_stock());
        assert!(product(3, 5).is_low_stock());
        assert!(!product(6, 5).is_low_stock());
    }

    #[test]
    fn test_till_is_open() {
        let till = Till {
            id: "t-1".to_string(),
            user_id: "u-1".to_string(),
            opened_at: Utc::now(),
            closed_at: None,
            opening_cents: 10000,
            closing_cents: None,
            state: TillState::Open,
        };
        assert!(till.is_open());
        assert_eq!(till.opening().cents(), 10000);
    }
}
