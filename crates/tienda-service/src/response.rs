//! # Boundary Response Envelope
//!
//! Uniform `{ success, message, ... }` result the transport layer
//! serializes as-is. No error type ever crosses into the transport:
//! every failure becomes `success = false` plus a human-readable
//! message and the kind needed to pick a status code.

use serde::Serialize;

use crate::error::{ErrorKind, ServiceError};

/// The envelope every boundary operation answers with.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    /// Human-readable outcome, suitable for the cashier's screen.
    pub message: String,

    /// Payload on success, absent on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Error classification on failure, absent on success. Serialized
    /// for clients that branch on it; transports use [`ErrorKind::http_status`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response with a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
            error_kind: None,
        }
    }

    /// Failed response carrying the error's message and kind.
    pub fn err(err: &ServiceError) -> Self {
        ApiResponse {
            success: false,
            message: err.to_string(),
            data: None,
            error_kind: Some(kind_label(err.kind()).to_string()),
        }
    }

    /// Collapses a service result into the envelope.
    pub fn from_result(result: Result<T, ServiceError>, success_message: &str) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(success_message, data),
            Err(err) => ApiResponse::err(&err),
        }
    }
}

fn kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Validation => "validation",
        ErrorKind::NotFound => "not_found",
        ErrorKind::Conflict => "conflict",
        ErrorKind::State => "state",
        ErrorKind::InsufficientStock => "insufficient_stock",
        ErrorKind::Storage => "storage",
    }
}
