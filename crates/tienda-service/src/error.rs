//! # Service Error Type
//!
//! One error type for the whole service surface, wrapping domain and
//! storage errors, plus the kind classification the transport layer
//! uses to pick a status code.

use thiserror::Error;
use tienda_core::{CoreError, ValidationError};
use tienda_db::DbError;

/// Any failure a service operation can produce.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Validation errors skip straight through to the Core wrapper so `?`
/// works on validator calls.
impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

/// Coarse classification for transport mapping. The absence of a
/// resource on a plain read (`get_sale`, `current`) is NOT an error
/// kind: those operations return `Ok(None)` and the transport maps
/// that to 404 itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// Business-rule conflict (till already open).
    Conflict,
    /// Operation invalid in the current state (selling with no open till).
    State,
    /// Requested quantity exceeds available stock.
    InsufficientStock,
    /// Storage-layer failure; the caller may retry the whole call.
    Storage,
}

impl ErrorKind {
    /// HTTP status a transport adapter should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::Validation
            | ErrorKind::NotFound
            | ErrorKind::Conflict
            | ErrorKind::State
            | ErrorKind::InsufficientStock => 400,
            ErrorKind::Storage => 500,
        }
    }
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Core(err) => match err {
                CoreError::ProductNotFound(_)
                | CoreError::SaleNotFound(_)
                | CoreError::OpenTillNotFound { .. } => ErrorKind::NotFound,
                CoreError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
                CoreError::TillAlreadyOpen { .. } => ErrorKind::Conflict,
                CoreError::NoOpenTill { .. } => ErrorKind::State,
                CoreError::InvalidPayment { .. }
                | CoreError::TooManyLines { .. }
                | CoreError::QuantityTooLarge { .. }
                | CoreError::Validation(_) => ErrorKind::Validation,
            },
            ServiceError::Db(err) => match err {
                DbError::NotFound { .. } => ErrorKind::NotFound,
                DbError::UniqueViolation { .. } => ErrorKind::Conflict,
                _ => ErrorKind::Storage,
            },
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
