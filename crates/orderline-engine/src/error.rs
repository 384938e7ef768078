//! # Service Error Type
//!
//! Unified error type for every [`OrderService`](crate::OrderService) operation.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Order Engine                       │
//! │                                                                         │
//! │  OrderService::change_order_status(id, CONFIRMED)                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Lost the compare-and-set? ── re-read, consult the table again          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Rule violation? ──── CoreError::InvalidTransition ───┐                 │
//! │         │                                             │                 │
//! │         ▼                                             ▼                 │
//! │  Storage failure? ─── DbError::QueryFailed("...") ── ServiceError       │
//! │         │                                             │                 │
//! │         ▼                                             ▼                 │
//! │  Still moving after every re-read? ─ ConcurrentModification             │
//! │                                                       │                 │
//! │                                                       ▼                 │
//! │                                              code() / payload()         │
//! │                                                       │                 │
//! │                                                       ▼                 │
//! │                           { "code": "INVALID_TRANSITION",               │
//! │                             "message": "Invalid status transition…" }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage details never reach the payload: they are logged at `error` and
//! the caller sees a generic `INTERNAL` message.

use serde::Serialize;
use thiserror::Error;

use orderline_core::CoreError;
use orderline_db::DbError;

/// Errors returned by the order engine.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A domain rule rejected the request.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store failed.
    #[error(transparent)]
    Db(#[from] DbError),

    /// The order kept changing under concurrent callers on every re-read.
    #[error("Order {order_id} was modified concurrently")]
    ConcurrentModification { order_id: String },
}

/// Result type for engine operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Machine-readable error codes.
///
/// ## Usage in the request layer
/// ```text
/// NOT_FOUND           → 404
/// VALIDATION_ERROR    → 400
/// INSUFFICIENT_STOCK  → 400
/// INVALID_TRANSITION  → 400
/// CONFLICT            → 409  (safe to retry)
/// INTERNAL            → 500
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    InsufficientStock,
    InvalidTransition,
    Conflict,
    Internal,
}

impl ErrorCode {
    /// HTTP status the request layer answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCode::NotFound => 404,
            ErrorCode::ValidationError
            | ErrorCode::InsufficientStock
            | ErrorCode::InvalidTransition => 400,
            ErrorCode::Conflict => 409,
            ErrorCode::Internal => 500,
        }
    }
}

impl ServiceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::Core(err) => match err {
                CoreError::ProductNotFound(_) | CoreError::OrderNotFound(_) => ErrorCode::NotFound,
                CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
                CoreError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
                CoreError::Validation(_) => ErrorCode::ValidationError,
            },
            ServiceError::Db(DbError::NotFound { .. }) => ErrorCode::NotFound,
            ServiceError::Db(_) => ErrorCode::Internal,
            ServiceError::ConcurrentModification { .. } => ErrorCode::Conflict,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.code().status_code()
    }

    /// Whether the same call may succeed if repeated later.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Core(err) => err.is_retryable(),
            ServiceError::Db(DbError::PoolExhausted) => true,
            ServiceError::Db(_) => false,
            ServiceError::ConcurrentModification { .. } => true,
        }
    }

    /// Converts the error into what the request layer sends back.
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload::from(self)
    }
}

/// Error body handed to the request layer.
///
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for product p-1: available 2, requested 3"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&ServiceError> for ErrorPayload {
    fn from(err: &ServiceError) -> Self {
        let code = err.code();
        let message = match err {
            ServiceError::Db(DbError::NotFound { .. }) => err.to_string(),
            ServiceError::Db(db_err) => {
                // Log the actual error but return a generic message
                tracing::error!(error = %db_err, "Storage operation failed");
                "Internal error".to_string()
            }
            other => other.to_string(),
        };

        ErrorPayload { code, message }
    }
}

impl From<ServiceError> for ErrorPayload {
    fn from(err: ServiceError) -> Self {
        ErrorPayload::from(&err)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use orderline_core::{OrderStatus, ValidationError};

    #[test]
    fn test_codes_and_statuses() {
        let cases: Vec<(ServiceError, ErrorCode, u16)> = vec![
            (
                CoreError::OrderNotFound("o-1".into()).into(),
                ErrorCode::NotFound,
                404,
            ),
            (
                CoreError::ProductNotFound("p-1".into()).into(),
                ErrorCode::NotFound,
                404,
            ),
            (
                CoreError::Validation(ValidationError::Empty {
                    field: "items".into(),
                })
                .into(),
                ErrorCode::ValidationError,
                400,
            ),
            (
                CoreError::InsufficientStock {
                    product_id: "p-1".into(),
                    available: 2,
                    requested: 3,
                }
                .into(),
                ErrorCode::InsufficientStock,
                400,
            ),
            (
                CoreError::InvalidTransition {
                    from: OrderStatus::Delivered,
                    to: OrderStatus::Cancelled,
                }
                .into(),
                ErrorCode::InvalidTransition,
                400,
            ),
            (
                ServiceError::ConcurrentModification {
                    order_id: "o-1".into(),
                },
                ErrorCode::Conflict,
                409,
            ),
            (
                DbError::QueryFailed("disk I/O error".into()).into(),
                ErrorCode::Internal,
                500,
            ),
        ];

        for (err, code, status) in cases {
            assert_eq!(err.code(), code, "{}", err);
            assert_eq!(err.status_code(), status, "{}", err);
        }
    }

    #[test]
    fn test_payload_hides_storage_details() {
        let err: ServiceError = DbError::QueryFailed("no such table: orders".into()).into();
        let payload = err.to_payload();
        assert_eq!(payload.code, ErrorCode::Internal);
        assert!(!payload.message.contains("orders"));
    }

    #[test]
    fn test_payload_serialization() {
        let err: ServiceError = CoreError::InvalidTransition {
            from: OrderStatus::Shipped,
            to: OrderStatus::Cancelled,
        }
        .into();

        let json = serde_json::to_value(err.to_payload()).unwrap();
        assert_eq!(json["code"], "INVALID_TRANSITION");
        assert_eq!(
            json["message"],
            "Invalid status transition from SHIPPED to CANCELLED"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(ServiceError::ConcurrentModification {
            order_id: "o".into()
        }
        .is_retryable());
        assert!(!ServiceError::from(CoreError::OrderNotFound("o".into())).is_retryable());
    }
}
