//! # tienda-db: SQLite Persistence for the Tienda POS back end
//!
//! Connection pool, embedded migrations and repositories over a single
//! SQLite file.
//!
//! ## Module Organization
//!
//! - [`pool`] - `DbConfig` + `Database` handle (WAL mode, foreign keys)
//! - [`migrations`] - embedded migrations from `migrations/sqlite/`
//! - [`error`] - `DbError` with sqlx error categorization
//! - [`repository`] - product, till, sale and lookup repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tienda_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./data/tienda.db")).await?;
//! let low = db.products().find_low_stock().await?;
//! ```
//!
//! Writes that must be atomic with each other (the sale processor's
//! validate-debit-persist sequence, the till open check-then-insert)
//! run on a transaction from [`Database::begin`]; the corresponding
//! repository functions take `&mut SqliteConnection`.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::lookup::LookupRepository;
pub use repository::new_id;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::till::TillRepository;
