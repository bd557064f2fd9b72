//! # Error Types
//!
//! Domain-specific error types for orderly-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  orderly-core errors (this file)                                        │
//! │  ├── ValidationError  - Request shape failures (missing, <= 0, ...)     │
//! │  └── OrderError       - Domain failures (type, catering, master data)   │
//! │                                                                         │
//! │  orderly-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  orderly-engine errors                                                  │
//! │  └── EngineError      - OrderError (client-fixable) | DbError (opaque)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Positional context is a field (`index`), never string concatenation
//! 3. Errors are enum variants, never String
//! 4. Display strings are stable: clients and tests match on them

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Request shape errors.
///
/// These are detected before any lookup or write and are always fixable by
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required top-level field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// The order has no lines.
    #[error("items are required")]
    ItemsRequired,

    /// A line-level field is invalid.
    #[error("items[{index}]: {error}")]
    Item { index: usize, error: ItemFieldError },

    /// The order-level discount is malformed.
    #[error("{0}")]
    Discount(DiscountError),

    /// Catering deposit is negative or out of range.
    #[error("catering_deposit must be a non-negative amount")]
    CateringDeposit,

    /// The order totals do not fit the money range.
    #[error("order total is out of range")]
    TotalOutOfRange,
}

/// What is wrong with a single order line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemFieldError {
    #[error("product_id is required")]
    ProductIdRequired,

    #[error("quantity must be > 0")]
    QuantityNotPositive,

    /// Line amount (quantities times prices) does not fit the money range.
    #[error("quantity is out of range")]
    QuantityOutOfRange,

    #[error("modifiers[{index}]: modifier_id is required")]
    ModifierIdRequired { index: usize },

    #[error("modifiers[{index}]: quantity must be > 0")]
    ModifierQuantityNotPositive { index: usize },

    #[error("{0}")]
    Discount(DiscountError),
}

/// Malformed discount specification (order- or item-level).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscountError {
    #[error("discount_type must be one of: PERCENTAGE, FIXED_AMOUNT (got {0})")]
    UnknownType(String),

    #[error("discount_value is required when discount_type is set")]
    ValueRequired,
}

// =============================================================================
// Order Error
// =============================================================================

/// Everything that can make an order creation request fail for reasons the
/// client can fix. Storage faults are never represented here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Request shape error.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `order_type` is not one of the accepted values.
    #[error("invalid order type: {0}")]
    InvalidOrderType(String),

    /// CATERING order without a (parseable) catering date.
    #[error("catering_date is required for catering orders")]
    CateringDateRequired,

    /// Product missing, inactive, or owned by another outlet.
    #[error("item[{index}]: product not found: {product_id}")]
    ProductNotFound { index: usize, product_id: String },

    /// Variant does not belong to the item's product.
    #[error("item[{index}]: variant mismatch")]
    VariantMismatch {
        index: usize,
        product_id: String,
        variant_id: String,
    },

    /// Modifier missing, inactive, or owned by another outlet.
    #[error("item[{index}]: modifier not found: {modifier_id}")]
    ModifierNotFound { index: usize, modifier_id: String },
}

impl OrderError {
    /// Index of the offending order line, for item-level errors.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            OrderError::Validation(ValidationError::Item { index, .. }) => Some(*index),
            OrderError::ProductNotFound { index, .. }
            | OrderError::VariantMismatch { index, .. }
            | OrderError::ModifierNotFound { index, .. } => Some(*index),
            _ => None,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with OrderError.
pub type CoreResult<T> = Result<T, OrderError>;

// =============================================================================
// Unit Tests
// =============================================================================
