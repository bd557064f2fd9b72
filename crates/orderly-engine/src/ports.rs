//! # Collaborator Ports
//!
//! The three things `OrderService` needs from the outside world, as async
//! traits, plus their SQLite implementations.
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐   ┌──────────────────┐
//! │  MasterDataGateway   │   │ OrderNumberAllocator │   │    OrderStore    │
//! │  (read-only prices)  │   │ (per-outlet numbers) │   │ (atomic graph)   │
//! └──────────┬───────────┘   └──────────┬───────────┘   └────────┬─────────┘
//!            │                          │                        │
//!   ProductRepository          SequenceAllocator          OrderRepository
//!                              (sequence + format)
//! ```
//!
//! All methods report storage faults as `DbError`; "not found" conditions
//! are values, not errors.

use async_trait::async_trait;

use orderly_core::{ItemPricing, Money, Order, OrderNumberFormat};
use orderly_db::{DbResult, OrderRepository, OrderSequenceRepository, ProductRepository};

// =============================================================================
// Traits
// =============================================================================

/// Read-only master data lookups, scoped to an outlet.
#[async_trait]
pub trait MasterDataGateway: Send + Sync {
    /// Current unit price and station for a product (and optional variant).
    async fn resolve_item_pricing(
        &self,
        outlet_id: &str,
        product_id: &str,
        variant_id: Option<&str>,
    ) -> DbResult<ItemPricing>;

    /// Current unit price of a modifier; `None` if not orderable.
    async fn resolve_modifier_pricing(
        &self,
        outlet_id: &str,
        modifier_id: &str,
    ) -> DbResult<Option<Money>>;
}

/// Hands out unique human-readable order numbers.
///
/// Numbers are never reused; gaps are allowed.
#[async_trait]
pub trait OrderNumberAllocator: Send + Sync {
    async fn next_order_number(&self, outlet_id: &str) -> DbResult<String>;
}

/// Durable order storage.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Writes the whole order graph or nothing.
    async fn insert_order(&self, order: &Order) -> DbResult<()>;

    /// Reads an order graph, scoped to the outlet.
    async fn get_order(&self, outlet_id: &str, order_id: &str) -> DbResult<Option<Order>>;
}

// =============================================================================
// SQLite Implementations
// =============================================================================

#[async_trait]
impl MasterDataGateway for ProductRepository {
    async fn resolve_item_pricing(
        &self,
        outlet_id: &str,
        product_id: &str,
        variant_id: Option<&str>,
    ) -> DbResult<ItemPricing> {
        ProductRepository::resolve_item_pricing(self, outlet_id, product_id, variant_id).await
    }

    async fn resolve_modifier_pricing(
        &self,
        outlet_id: &str,
        modifier_id: &str,
    ) -> DbResult<Option<Money>> {
        ProductRepository::resolve_modifier_pricing(self, outlet_id, modifier_id).await
    }
}

/// Storage-backed allocator: atomic per-outlet sequence, rendered with a
/// fixed prefix and padding.
#[derive(Debug, Clone)]
pub struct SequenceAllocator {
    sequences: OrderSequenceRepository,
    format: OrderNumberFormat,
}

impl SequenceAllocator {
    pub fn new(sequences: OrderSequenceRepository, format: OrderNumberFormat) -> Self {
        SequenceAllocator { sequences, format }
    }
}

#[async_trait]
impl OrderNumberAllocator for SequenceAllocator {
    async fn next_order_number(&self, outlet_id: &str) -> DbResult<String> {
        let value = self.sequences.next_value(outlet_id).await?;
        Ok(self.format.format(value))
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn insert_order(&self, order: &Order) -> DbResult<()> {
        self.insert(order).await
    }

    async fn get_order(&self, outlet_id: &str, order_id: &str) -> DbResult<Option<Order>> {
        self.get_by_id(outlet_id, order_id).await
    }
}
