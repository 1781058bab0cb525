//! # tienda-core: Pure Business Logic for the Tienda POS back end
//!
//! The heart of the system: money arithmetic, payment settlement, input
//! validation and the domain types they operate on, all as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP layer (out of scope for this workspace)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tienda-service   TillManager, SaleProcessor, LowStockMonitor           │
//! │       │                                                                 │
//! │       ├──────────────► tienda-core (THIS CRATE)                         │
//! │       │                money · settlement · validation · types          │
//! │       │                NO I/O · NO DATABASE · PURE FUNCTIONS            │
//! │       ▼                                                                 │
//! │  tienda-db        SQLite pool, migrations, repositories                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. **Pure functions**: same input, same output; timestamps are passed in
//! 2. **Integer money**: every monetary value is i64 cents, never floats
//! 3. **Explicit errors**: typed enums via `thiserror`, never panics

pub mod error;
pub mod money;
pub mod settlement;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use settlement::{settle, Settlement, CASH_TOLERANCE_CENTS};
pub use types::*;

/// Maximum line items allowed in a single sale.
///
/// Keeps a runaway request from locking half the catalog inside one
/// transaction.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum quantity for a single line item.
///
/// Catches fat-finger entry (1000 typed instead of 10) before it reaches
/// the stock check.
pub const MAX_LINE_QUANTITY: i64 = 999;
