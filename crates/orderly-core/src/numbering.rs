//! Human-readable order numbers.
//!
//! The sequence value itself comes from storage (see `orderly-db`); this
//! module only renders it.

use serde::{Deserialize, Serialize};

/// Default prefix for order numbers.
pub const DEFAULT_ORDER_NUMBER_PREFIX: &str = "ORD-";

/// Default zero-padding width for order numbers.
pub const DEFAULT_ORDER_NUMBER_WIDTH: usize = 6;

/// Largest accepted width (an i64 has 19 digits; keep one spare).
pub const MAX_ORDER_NUMBER_WIDTH: usize = 18;

/// Renders sequence values as `PREFIX` + zero-padded number.
///
/// ```rust
/// use orderly_core::numbering::OrderNumberFormat;
///
/// let fmt = OrderNumberFormat::default();
/// assert_eq!(fmt.format(42), "ORD-000042");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderNumberFormat {
    pub prefix: String,
    pub width: usize,
}

impl OrderNumberFormat {
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        OrderNumberFormat {
            prefix: prefix.into(),
            width,
        }
    }

    /// Formats a sequence value. Values wider than `width` are not truncated.
    pub fn format(&self, seq: i64) -> String {
        format!("{}{:0width$}", self.prefix, seq, width = self.width)
    }
}

impl Default for OrderNumberFormat {
    fn default() -> Self {
        OrderNumberFormat::new(DEFAULT_ORDER_NUMBER_PREFIX, DEFAULT_ORDER_NUMBER_WIDTH)
    }
}
