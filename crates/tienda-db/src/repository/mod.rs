//! # Repository Implementations
//!
//! One repository per aggregate:
//!
//! - [`product`] - catalog reads, restocks and the guarded stock debit
//! - [`till`] - cash-session lifecycle rows
//! - [`sale`] - append-only sales ledger
//! - [`lookup`] - user/client name tables used by history projections
//!
//! Operations that must be atomic with other writes take a
//! `&mut SqliteConnection` so the caller can supply a transaction;
//! plain reads go through the pool.

pub mod lookup;
pub mod product;
pub mod sale;
pub mod till;

use uuid::Uuid;

/// Generates a fresh row id. UUID v4: globally unique without any
/// coordination with the database.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
