//! # Validation Module
//!
//! Shape validation for order creation requests.
//!
//! ## Validation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Order Request Validation (first failure wins)           │
//! │                                                                         │
//! │  1. order_type present            → "order_type is required"           │
//! │  2. order_type in closed set      → InvalidOrderType                   │
//! │  3. items non-empty               → "items are required"               │
//! │  4. per item, in index order:                                          │
//! │     product_id present            → "items[i]: product_id is required" │
//! │     quantity > 0                  → "items[i]: quantity must be > 0"   │
//! │     modifiers / item discount well formed                              │
//! │  5. order discount well formed                                         │
//! │  6. CATERING needs catering_date  → CateringDateRequired               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  ValidatedOrder (typed, price-ready)                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  7. master-data existence (orderly-engine, needs the gateway)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The order is a contract: field-shape errors come before existence errors,
//! and lower item indices before higher ones.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::error::{CoreResult, DiscountError, ItemFieldError, OrderError, ValidationError};
use crate::money::Money;
use crate::types::{
    CreateOrderItem, CreateOrderModifier, CreateOrderRequest, Discount, DiscountType, OrderType,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Validated Request
// =============================================================================

/// A request that passed every shape rule. Enums are parsed, optional
/// strings are trimmed, and empty strings are treated as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrder {
    pub order_type: OrderType,
    pub discount: Option<Discount>,
    pub customer_id: Option<String>,
    pub table_number: Option<String>,
    pub notes: Option<String>,
    pub delivery_platform: Option<String>,
    pub delivery_address: Option<String>,
    pub catering_date: Option<DateTime<Utc>>,
    pub catering_deposit: Option<Money>,
    pub items: Vec<ValidatedItem>,
}

/// A validated order line, not yet priced.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedItem {
    pub product_id: String,
    pub variant_id: Option<String>,
    pub quantity: i64,
    pub notes: Option<String>,
    pub discount: Option<Discount>,
    pub modifiers: Vec<ValidatedModifier>,
}

/// A validated modifier selection, not yet priced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedModifier {
    pub modifier_id: String,
    pub quantity: i64,
}

// =============================================================================
// Pipeline
// =============================================================================

/// Runs the pure part of the validation pipeline.
///
/// ## Example
/// ```rust
/// use orderly_core::types::CreateOrderRequest;
/// use orderly_core::validation::validate_order_request;
///
/// let err = validate_order_request(CreateOrderRequest::default()).unwrap_err();
/// assert_eq!(err.to_string(), "order_type is required");
/// ```
pub fn validate_order_request(request: CreateOrderRequest) -> CoreResult<ValidatedOrder> {
    let order_type = match non_empty(request.order_type) {
        None => {
            return Err(ValidationError::Required {
                field: "order_type",
            }
            .into())
        }
        Some(raw) => raw
            .parse::<OrderType>()
            .map_err(|_| OrderError::InvalidOrderType(raw))?,
    };

    if request.items.is_empty() {
        return Err(ValidationError::ItemsRequired.into());
    }

    let items = request
        .items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            validate_item(item).map_err(|error| ValidationError::Item { index, error })
        })
        .collect::<ValidationResult<Vec<_>>>()?;

    let discount = parse_discount(request.discount_type, request.discount_value)
        .map_err(ValidationError::Discount)?;

    let (catering_date, catering_deposit) = if order_type == OrderType::Catering {
        let date = non_empty(request.catering_date)
            .and_then(|raw| parse_catering_date(&raw))
            .ok_or(OrderError::CateringDateRequired)?;
        let deposit = request
            .catering_deposit
            .map(parse_deposit)
            .transpose()?;
        (Some(date), deposit)
    } else {
        (None, None)
    };

    Ok(ValidatedOrder {
        order_type,
        discount,
        customer_id: non_empty(request.customer_id),
        table_number: non_empty(request.table_number),
        notes: non_empty(request.notes),
        delivery_platform: non_empty(request.delivery_platform),
        delivery_address: non_empty(request.delivery_address),
        catering_date,
        catering_deposit,
        items,
    })
}

/// Validates one order line. Rules are checked in a fixed order so the
/// reported error is deterministic.
fn validate_item(item: CreateOrderItem) -> Result<ValidatedItem, ItemFieldError> {
    let product_id = non_empty(item.product_id).ok_or(ItemFieldError::ProductIdRequired)?;

    if item.quantity <= 0 {
        return Err(ItemFieldError::QuantityNotPositive);
    }

    let modifiers = item
        .modifiers
        .into_iter()
        .enumerate()
        .map(|(index, modifier)| validate_modifier(index, modifier))
        .collect::<Result<Vec<_>, _>>()?;

    let discount =
        parse_discount(item.discount_type, item.discount_value).map_err(ItemFieldError::Discount)?;

    Ok(ValidatedItem {
        product_id,
        variant_id: non_empty(item.variant_id),
        quantity: item.quantity,
        notes: non_empty(item.notes),
        discount,
        modifiers,
    })
}

fn validate_modifier(
    index: usize,
    modifier: CreateOrderModifier,
) -> Result<ValidatedModifier, ItemFieldError> {
    let modifier_id =
        non_empty(modifier.modifier_id).ok_or(ItemFieldError::ModifierIdRequired { index })?;

    let quantity = modifier.quantity.unwrap_or(1);
    if quantity <= 0 {
        return Err(ItemFieldError::ModifierQuantityNotPositive { index });
    }

    Ok(ValidatedModifier {
        modifier_id,
        quantity,
    })
}

// =============================================================================
// Field Parsers
// =============================================================================

/// Parses a discount pair. A discount exists iff a type is given; a value
/// without a type is ignored.
///
/// Only the shape is checked here. Out-of-range values are accepted and
/// clamped when the discount is applied (see [`Discount::amount_on`]).
///
/// ## Example
/// ```rust
/// use orderly_core::types::DiscountType;
/// use orderly_core::validation::parse_discount;
/// use rust_decimal::Decimal;
///
/// let d = parse_discount(Some("PERCENTAGE".into()), Some(Decimal::from(10)))
///     .unwrap()
///     .unwrap();
/// assert_eq!(d.kind, DiscountType::Percentage);
///
/// assert!(parse_discount(None, Some(Decimal::from(10))).unwrap().is_none());
/// ```
pub fn parse_discount(
    kind: Option<String>,
    value: Option<Decimal>,
) -> Result<Option<Discount>, DiscountError> {
    let Some(raw) = non_empty(kind) else {
        return Ok(None);
    };

    let kind = raw
        .parse::<DiscountType>()
        .map_err(|_| DiscountError::UnknownType(raw))?;
    let value = value.ok_or(DiscountError::ValueRequired)?;

    Ok(Some(Discount { kind, value }))
}

/// Parses a catering date: a full RFC 3339 timestamp, or a calendar date
/// (`YYYY-MM-DD`) taken as midnight UTC.
pub fn parse_catering_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_deposit(value: Decimal) -> ValidationResult<Money> {
    match Money::from_decimal(value) {
        Some(m) if !m.is_negative() => Ok(m),
        _ => Err(ValidationError::CateringDeposit),
    }
}

/// Trims a string and maps empty to `None`.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================
