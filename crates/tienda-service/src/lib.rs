//! # tienda-service: Application Services for the Tienda POS back end
//!
//! The orchestration layer between a transport (HTTP, IPC, CLI) and the
//! pure logic / persistence crates underneath:
//!
//! - [`SaleProcessor`] - the atomic sell sequence, sales history, receipts
//! - [`TillManager`] - open/close cash sessions, one open till per user
//! - [`CatalogService`] - product listing and goods reception
//! - [`LowStockMonitor`] - products at or below their reorder point
//! - [`ApiResponse`] - the uniform `{ success, message, data }` envelope
//!   every operation is reported through
//! - [`ServiceError`] / [`ErrorKind`] - error taxonomy and status mapping
//!
//! Services hold a cloned [`tienda_db::Database`] handle (an `Arc`'d pool
//! underneath), so a transport can construct one of each at startup and
//! share them across request handlers.

pub mod catalog;
pub mod error;
pub mod response;
pub mod sale;
pub mod stock;
pub mod till;

pub use catalog::CatalogService;
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use response::ApiResponse;
pub use sale::SaleProcessor;
pub use stock::LowStockMonitor;
pub use till::TillManager;
