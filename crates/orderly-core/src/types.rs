//! # Domain Types
//!
//! Core domain types used throughout Orderly POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Master data (read-only here)      Order graph (written once)           │
//! │  ┌─────────────────┐               ┌─────────────────┐                  │
//! │  │    Product      │               │      Order      │                  │
//! │  │  outlet_id      │               │  order_number   │                  │
//! │  │  price          │               │  totals         │                  │
//! │  │  station        │               └────────┬────────┘                  │
//! │  └────────┬────────┘                        │ 1..*                      │
//! │           │ 1..*                   ┌────────▼────────┐                  │
//! │  ┌────────▼────────┐               │    OrderItem    │                  │
//! │  │    Variant      │               │  unit_price ◄── snapshot           │
//! │  └─────────────────┘               └────────┬────────┘                  │
//! │  ┌─────────────────┐                        │ 0..*                      │
//! │  │    Modifier     │               ┌────────▼────────┐                  │
//! │  └─────────────────┘               │ OrderItemModifier│                 │
//! │                                    └─────────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Unit prices and kitchen stations are copied from master data onto the
//! order at creation time and never re-read afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 825 bps = 8.25%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

// =============================================================================
// Enumerations
// =============================================================================

/// Error returned when a wire string is not a member of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// How the order is fulfilled. Determines which optional fields are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    DineIn,
    Takeaway,
    Delivery,
    Catering,
}

impl OrderType {
    /// All accepted order types, in wire form.
    pub const ALL: [OrderType; 4] = [
        OrderType::DineIn,
        OrderType::Takeaway,
        OrderType::Delivery,
        OrderType::Catering,
    ];

    /// Wire name (`"DINE_IN"`, ...).
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "DINE_IN",
            OrderType::Takeaway => "TAKEAWAY",
            OrderType::Delivery => "DELIVERY",
            OrderType::Catering => "CATERING",
        }
    }
}

impl FromStr for OrderType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "order_type",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle tag of an order. Creation always produces `New`; the other
/// states are written by later collaborators (kitchen, cashier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    New,
    Completed,
    Cancelled,
}

/// Kitchen status of a single order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
    Cancelled,
}

/// Booking status of a catering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CateringStatus {
    Booked,
    Confirmed,
    Completed,
    Cancelled,
}

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// `value` percent of the base amount.
    Percentage,
    /// `value` currency units, capped at the base amount.
    FixedAmount,
}

impl DiscountType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "PERCENTAGE",
            DiscountType::FixedAmount => "FIXED_AMOUNT",
        }
    }
}

impl FromStr for DiscountType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PERCENTAGE" => Ok(DiscountType::Percentage),
            "FIXED_AMOUNT" => Ok(DiscountType::FixedAmount),
            other => Err(UnknownVariant {
                kind: "discount_type",
                value: other.to_string(),
            }),
        }
    }
}

/// A validated discount: a closed type plus an exact, non-negative value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discount {
    pub kind: DiscountType,
    pub value: Decimal,
}

// =============================================================================
// Identity
// =============================================================================

/// Verified caller identity, supplied by the auth layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub outlet_id: String,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, outlet_id: impl Into<String>) -> Self {
        Actor {
            user_id: user_id.into(),
            outlet_id: outlet_id.into(),
        }
    }
}

// =============================================================================
// Master Data
// =============================================================================

/// A product on an outlet's menu.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: String,
    /// Outlet that owns this product.
    pub outlet_id: String,
    pub name: String,
    #[ts(type = "string")]
    pub price: Money,
    /// Kitchen station that prepares this product (copied onto order items).
    pub station: Option<String>,
    /// Soft-delete flag. Inactive products cannot be ordered.
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A named set of variants on a product (e.g. "Size").
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VariantGroup {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub is_required: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for creating a variant group.
///
/// `is_required` is tri-state on input: absent means "use the default"
/// (required), while an explicit `false` is kept as optional.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewVariantGroup {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub is_required: Option<bool>,
}

impl NewVariantGroup {
    /// Resolves the group, defaulting `is_required` to true only when absent.
    pub fn resolve(self, id: String, now: DateTime<Utc>) -> VariantGroup {
        VariantGroup {
            id,
            product_id: self.product_id,
            name: self.name,
            is_required: self.is_required.unwrap_or(true),
            created_at: now,
        }
    }
}

/// A product variation (size, temperature, ...) with its own price.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Variant {
    pub id: String,
    pub product_id: String,
    pub group_id: Option<String>,
    pub name: String,
    #[ts(type = "string")]
    pub price: Money,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// An add-on selectable per order item, priced independently.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Modifier {
    pub id: String,
    pub outlet_id: String,
    pub name: String,
    #[ts(type = "string")]
    pub price: Money,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Result of resolving the price of one order line against master data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemPricing {
    /// Product (and variant, if any) is orderable at this price.
    Found {
        unit_price: Money,
        station: Option<String>,
    },
    /// Product missing, inactive, or owned by another outlet.
    ProductNotFound,
    /// Variant missing, inactive, or attached to a different product.
    VariantMismatch,
}

// =============================================================================
// Order Creation Request
// =============================================================================

/// Raw order creation request as decoded from a client.
///
/// Every field a client may omit is an `Option` here; required-ness and
/// enum membership are checked by [`crate::validation`], which turns this
/// into a [`crate::validation::ValidatedOrder`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub items: Vec<CreateOrderItem>,
    #[serde(default)]
    pub discount_type: Option<String>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub discount_value: Option<Decimal>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub delivery_platform: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[serde(default)]
    pub catering_date: Option<String>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub catering_deposit: Option<Decimal>,
}

/// One requested order line.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateOrderItem {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub variant_id: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub discount_type: Option<String>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub discount_value: Option<Decimal>,
    #[serde(default)]
    pub modifiers: Vec<CreateOrderModifier>,
}

/// One requested modifier selection. Quantity defaults to 1 when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateOrderModifier {
    #[serde(default)]
    pub modifier_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

// =============================================================================
// Order Graph
// =============================================================================

/// A created order with its lines. Items and modifiers are owned by the
/// order and written in the same transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub outlet_id: String,
    pub order_number: String,
    pub order_type: OrderType,
    pub status: OrderStatus,
    #[ts(type = "string")]
    pub subtotal: Money,
    pub discount_type: Option<DiscountType>,
    #[ts(type = "string | null")]
    pub discount_value: Option<Decimal>,
    #[ts(type = "string")]
    pub discount_amount: Money,
    #[ts(type = "string")]
    pub tax_amount: Money,
    #[ts(type = "string")]
    pub total_amount: Money,
    pub customer_id: Option<String>,
    pub table_number: Option<String>,
    pub notes: Option<String>,
    pub delivery_platform: Option<String>,
    pub delivery_address: Option<String>,
    #[ts(as = "Option<String>")]
    pub catering_date: Option<DateTime<Utc>>,
    pub catering_status: Option<CateringStatus>,
    #[ts(type = "string | null")]
    pub catering_deposit: Option<Money>,
    pub created_by: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// A line within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub quantity: i64,
    /// Price snapshot taken at creation time.
    #[ts(type = "string")]
    pub unit_price: Money,
    pub discount_type: Option<DiscountType>,
    #[ts(type = "string | null")]
    pub discount_value: Option<Decimal>,
    #[ts(type = "string")]
    pub discount_amount: Money,
    #[ts(type = "string")]
    pub subtotal: Money,
    pub status: ItemStatus,
    /// Kitchen station snapshot taken from the product.
    pub station: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// Never absent; empty when no modifiers were selected.
    #[serde(default)]
    pub modifiers: Vec<OrderItemModifier>,
}

/// A modifier selection attached to an order item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItemModifier {
    pub id: String,
    pub order_item_id: String,
    pub modifier_id: String,
    pub quantity: i64,
    #[ts(type = "string")]
    pub unit_price: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
