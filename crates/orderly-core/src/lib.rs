//! # orderly-core: Pure Order Logic for Orderly POS
//!
//! This crate holds every rule of order creation that can be decided without
//! touching storage: request shape validation, money arithmetic, discount and
//! total calculation, order number rendering, and the domain error taxonomy.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Orderly POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          orderly-engine (OrderService, adapters, CLI)           │   │
//! │  │    validate ──► resolve prices ──► number ──► persist           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ orderly-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │   Order   │  │   Money   │  │ TaxPolicy │  │  ordered  │  │   │
//! │  │   │  Request  │  │  rounding │  │  totals   │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 orderly-db (Database Layer)                     │   │
//! │  │        SQLite pool, migrations, sequences, repositories         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Order, Product, request objects, enums)
//! - [`money`] - Fixed-point money in minor units
//! - [`error`] - Validation and domain error types
//! - [`validation`] - Ordered request shape rules
//! - [`pricing`] - Line and order totals, tax policy
//! - [`numbering`] - Order number rendering
//!
//! ## Example Usage
//!
//! ```rust
//! use orderly_core::money::Money;
//! use orderly_core::pricing::{price_item, PricingCalculator};
//!
//! let line = price_item(Money::from_major(12_500), 2, &[], None).unwrap();
//! let totals = PricingCalculator::new()
//!     .order_totals([line.subtotal], None)
//!     .unwrap();
//! assert_eq!(totals.total_amount.to_string(), "25000.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod numbering;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreResult, DiscountError, ItemFieldError, OrderError, ValidationError};
pub use money::Money;
pub use numbering::OrderNumberFormat;
pub use pricing::{FlatRateTax, PricingCalculator, TaxPolicy, ZeroTax};
pub use types::*;
pub use validation::{validate_order_request, ValidatedItem, ValidatedModifier, ValidatedOrder};
