//! # Engine Error Type
//!
//! What `create_order` returns on failure, and how adapters render it.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Orderly POS                            │
//! │                                                                         │
//! │  OrderService::create_order                                            │
//! │         │                                                               │
//! │         ├── ValidationError / OrderError ─► EngineError::Order         │
//! │         │        (client can fix the request)                           │
//! │         │                                                               │
//! │         └── DbError (gateway, allocator, store) ─► EngineError::Internal│
//! │                  (opaque: logged, never shown)                          │
//! │                                                                         │
//! │  ErrorResponse::from(EngineError)                                       │
//! │  {                                                                      │
//! │    "code": "VARIANT_MISMATCH",                                          │
//! │    "message": "item[1]: variant mismatch",                              │
//! │    "index": 1                                                           │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use orderly_core::{OrderError, ValidationError};
use orderly_db::DbError;

/// Failure of an engine operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request was rejected; nothing was allocated or written.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// A collaborator failed.
    #[error("internal error: {0}")]
    Internal(#[from] DbError),
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Order(err.into())
    }
}

impl EngineError {
    /// The domain error, if the request itself was at fault.
    pub fn as_order_error(&self) -> Option<&OrderError> {
        match self {
            EngineError::Order(err) => Some(err),
            EngineError::Internal(_) => None,
        }
    }
}

/// Convenience type alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Client Response
// =============================================================================

/// Stable, machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request shape failed (400)
    ValidationError,

    /// Unknown order type (400)
    InvalidOrderType,

    /// Catering order without date (400)
    CateringDateRequired,

    /// Product missing, inactive or foreign (404)
    ProductNotFound,

    /// Variant not part of product (400)
    VariantMismatch,

    /// Modifier missing, inactive or foreign (404)
    ModifierNotFound,

    /// Internal server error (500)
    Internal,
}

/// Transport-neutral error payload for adapters.
///
/// ```json
/// { "code": "VALIDATION_ERROR", "message": "items[0]: quantity must be > 0", "index": 0 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Offending item index, for item-level errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl ErrorResponse {
    /// Creates a new error response.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ErrorResponse {
            code,
            message: message.into(),
            index: None,
        }
    }

    /// Creates an internal error with the generic message.
    pub fn internal() -> Self {
        ErrorResponse::new(ErrorCode::Internal, "Internal error, please retry")
    }
}

impl From<&OrderError> for ErrorResponse {
    fn from(err: &OrderError) -> Self {
        let code = match err {
            OrderError::Validation(_) => ErrorCode::ValidationError,
            OrderError::InvalidOrderType(_) => ErrorCode::InvalidOrderType,
            OrderError::CateringDateRequired => ErrorCode::CateringDateRequired,
            OrderError::ProductNotFound { .. } => ErrorCode::ProductNotFound,
            OrderError::VariantMismatch { .. } => ErrorCode::VariantMismatch,
            OrderError::ModifierNotFound { .. } => ErrorCode::ModifierNotFound,
        };

        ErrorResponse {
            code,
            message: err.to_string(),
            index: err.item_index(),
        }
    }
}

/// Converts engine errors to client responses.
///
/// Internal errors are logged here with their detail and replaced by a
/// generic message.
impl From<EngineError> for ErrorResponse {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Order(err) => ErrorResponse::from(&err),
            EngineError::Internal(err) => {
                tracing::error!(error = %err, "Order engine internal failure");
                ErrorResponse::internal()
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use orderly_core::ItemFieldError;

    #[test]
    fn test_validation_maps_to_validation_code_with_index() {
        let err: EngineError = ValidationError::Item {
            index: 2,
            error: ItemFieldError::QuantityNotPositive,
        }
        .into();

        let resp = ErrorResponse::from(err);
        assert_eq!(resp.code, ErrorCode::ValidationError);
        assert_eq!(resp.message, "items[2]: quantity must be > 0");
        assert_eq!(resp.index, Some(2));
    }

    #[test]
    fn test_domain_codes() {
        let resp = ErrorResponse::from(EngineError::from(OrderError::VariantMismatch {
            index: 1,
            product_id: "p".into(),
            variant_id: "v".into(),
        }));
        assert_eq!(resp.code, ErrorCode::VariantMismatch);
        assert_eq!(resp.message, "item[1]: variant mismatch");

        let resp = ErrorResponse::from(EngineError::from(OrderError::CateringDateRequired));
        assert_eq!(resp.code, ErrorCode::CateringDateRequired);
        assert_eq!(resp.index, None);
    }

    #[test]
    fn test_internal_is_opaque() {
        let err = EngineError::from(DbError::QueryFailed("disk I/O error at page 7".into()));
        assert!(err.as_order_error().is_none());

        let resp = ErrorResponse::from(err);
        assert_eq!(resp.code, ErrorCode::Internal);
        assert!(!resp.message.contains("disk"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ErrorResponse::from(&OrderError::InvalidOrderType(
            "BRUNCH".into(),
        )))
        .unwrap();
        assert_eq!(json["code"], "INVALID_ORDER_TYPE");
        assert_eq!(json["message"], "invalid order type: BRUNCH");
        assert!(json.get("index").is_none());
    }
}
