//! # Order Service
//!
//! Order creation orchestrator.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Received ──► Validated ──► Priced ──► Numbered ──► Persisted ──► Done  │
//! │      │            │            │           │             │              │
//! │      │ shape      │ master     │ allocator │ store       │              │
//! │      ▼ error      ▼ data miss  ▼ failure   ▼ failure     │              │
//! │   Order(..)    Order(..)    Internal    Internal          │              │
//! │                                          (number burned,  │              │
//! │   ◄── no side effects ──►                 gap allowed)    │              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Unit prices and kitchen stations are read once from master data and
//! copied onto the order. Later price changes never touch existing orders.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use orderly_core::pricing::{price_item, ItemTotals, ModifierCharge};
use orderly_core::{
    validate_order_request, Actor, CateringStatus, CreateOrderRequest, ItemFieldError,
    ItemPricing, ItemStatus, Money, Order, OrderError, OrderItem, OrderItemModifier,
    OrderNumberFormat, OrderStatus, OrderType, PricingCalculator, TaxPolicy, ValidatedItem,
    ValidationError, ZeroTax,
};
use orderly_db::Database;

use crate::error::{EngineError, EngineResult};
use crate::ports::{MasterDataGateway, OrderNumberAllocator, OrderStore, SequenceAllocator};

/// A validated line with its resolved prices.
#[derive(Debug)]
struct PricedLine {
    item: ValidatedItem,
    unit_price: Money,
    station: Option<String>,
    modifier_prices: Vec<Money>,
    totals: ItemTotals,
}

/// Creates and reads orders.
///
/// Holds no mutable state: one instance can serve any number of concurrent
/// callers.
///
/// ## Usage
/// ```rust,ignore
/// let service = OrderService::from_database(&db, OrderNumberFormat::default());
/// let order = service.create_order(&actor, request).await?;
/// ```
#[derive(Clone)]
pub struct OrderService<T: TaxPolicy = ZeroTax> {
    gateway: Arc<dyn MasterDataGateway>,
    allocator: Arc<dyn OrderNumberAllocator>,
    store: Arc<dyn OrderStore>,
    pricing: PricingCalculator<T>,
}

impl OrderService<ZeroTax> {
    /// Creates a service over explicit collaborators, with no tax.
    pub fn new(
        gateway: Arc<dyn MasterDataGateway>,
        allocator: Arc<dyn OrderNumberAllocator>,
        store: Arc<dyn OrderStore>,
    ) -> Self {
        OrderService {
            gateway,
            allocator,
            store,
            pricing: PricingCalculator::new(),
        }
    }

    /// Creates a service backed by the SQLite repositories.
    pub fn from_database(db: &Database, format: OrderNumberFormat) -> Self {
        OrderService::new(
            Arc::new(db.products()),
            Arc::new(SequenceAllocator::new(db.sequences(), format)),
            Arc::new(db.orders()),
        )
    }
}

impl<T: TaxPolicy> OrderService<T> {
    /// Replaces the tax policy.
    pub fn with_tax_policy<U: TaxPolicy>(self, tax: U) -> OrderService<U> {
        OrderService {
            gateway: self.gateway,
            allocator: self.allocator,
            store: self.store,
            pricing: PricingCalculator::with_tax_policy(tax),
        }
    }

    /// Validates, prices, numbers and persists a new order.
    ///
    /// ## Side Effects
    /// - Success: one allocator call, one store write
    /// - `EngineError::Order`: none
    /// - `EngineError::Internal`: at most one allocator call, no order rows
    ///
    /// If the returned future is dropped before the store commits, the order
    /// transaction rolls back; an already allocated number is simply skipped.
    pub async fn create_order(
        &self,
        actor: &Actor,
        request: CreateOrderRequest,
    ) -> EngineResult<Order> {
        let outlet_id = actor.outlet_id.as_str();

        let validated = validate_order_request(request).map_err(|err| reject(actor, err))?;

        debug!(
            outlet_id = %outlet_id,
            order_type = %validated.order_type,
            items = validated.items.len(),
            "Order request validated"
        );

        let mut lines = Vec::with_capacity(validated.items.len());
        for (index, item) in validated.items.into_iter().enumerate() {
            let line = self
                .price_line(outlet_id, index, item)
                .await
                .map_err(|err| match err {
                    EngineError::Order(err) => reject(actor, err),
                    internal => internal,
                })?;
            lines.push(line);
        }

        let totals = self
            .pricing
            .order_totals(
                lines.iter().map(|line| line.totals.subtotal),
                validated.discount.as_ref(),
            )
            .ok_or_else(|| reject(actor, ValidationError::TotalOutOfRange.into()))?;

        let order_number = self.allocator.next_order_number(outlet_id).await?;

        let now = Utc::now();
        let order_id = Uuid::new_v4().to_string();

        let items = lines
            .into_iter()
            .map(|line| {
                let item_id = Uuid::new_v4().to_string();
                let modifiers = line
                    .item
                    .modifiers
                    .into_iter()
                    .zip(line.modifier_prices)
                    .map(|(modifier, unit_price)| OrderItemModifier {
                        id: Uuid::new_v4().to_string(),
                        order_item_id: item_id.clone(),
                        modifier_id: modifier.modifier_id,
                        quantity: modifier.quantity,
                        unit_price,
                    })
                    .collect();

                OrderItem {
                    id: item_id,
                    order_id: order_id.clone(),
                    product_id: line.item.product_id,
                    variant_id: line.item.variant_id,
                    quantity: line.item.quantity,
                    unit_price: line.unit_price,
                    discount_type: line.item.discount.map(|d| d.kind),
                    discount_value: line.item.discount.map(|d| d.value),
                    discount_amount: line.totals.discount_amount,
                    subtotal: line.totals.subtotal,
                    status: ItemStatus::Pending,
                    station: line.station,
                    notes: line.item.notes,
                    created_at: now,
                    modifiers,
                }
            })
            .collect();

        let is_catering = validated.order_type == OrderType::Catering;

        let order = Order {
            id: order_id,
            outlet_id: actor.outlet_id.clone(),
            order_number,
            order_type: validated.order_type,
            status: OrderStatus::New,
            subtotal: totals.subtotal,
            discount_type: validated.discount.map(|d| d.kind),
            discount_value: validated.discount.map(|d| d.value),
            discount_amount: totals.discount_amount,
            tax_amount: totals.tax_amount,
            total_amount: totals.total_amount,
            customer_id: validated.customer_id,
            table_number: validated.table_number,
            notes: validated.notes,
            delivery_platform: validated.delivery_platform,
            delivery_address: validated.delivery_address,
            catering_date: validated.catering_date,
            catering_status: is_catering.then_some(CateringStatus::Booked),
            catering_deposit: validated.catering_deposit,
            created_by: actor.user_id.clone(),
            created_at: now,
            updated_at: now,
            items,
        };

        if let Err(err) = self.store.insert_order(&order).await {
            error!(
                outlet_id = %outlet_id,
                order_number = %order.order_number,
                error = %err,
                "Order write failed, number left unused"
            );
            return Err(err.into());
        }

        info!(
            order_id = %order.id,
            outlet_id = %outlet_id,
            order_number = %order.order_number,
            total = %order.total_amount,
            "Order created"
        );

        Ok(order)
    }

    /// Reads a persisted order, scoped to the outlet.
    pub async fn get_order(&self, outlet_id: &str, order_id: &str) -> EngineResult<Option<Order>> {
        Ok(self.store.get_order(outlet_id, order_id).await?)
    }

    /// Resolves master data for one line and prices it.
    async fn price_line(
        &self,
        outlet_id: &str,
        index: usize,
        item: ValidatedItem,
    ) -> EngineResult<PricedLine> {
        let pricing = self
            .gateway
            .resolve_item_pricing(outlet_id, &item.product_id, item.variant_id.as_deref())
            .await?;

        let (unit_price, station) = match pricing {
            ItemPricing::Found {
                unit_price,
                station,
            } => (unit_price, station),
            ItemPricing::ProductNotFound => {
                return Err(OrderError::ProductNotFound {
                    index,
                    product_id: item.product_id,
                }
                .into())
            }
            ItemPricing::VariantMismatch => {
                return Err(OrderError::VariantMismatch {
                    index,
                    product_id: item.product_id,
                    variant_id: item.variant_id.unwrap_or_default(),
                }
                .into())
            }
        };

        let mut modifier_prices = Vec::with_capacity(item.modifiers.len());
        for modifier in &item.modifiers {
            let price = self
                .gateway
                .resolve_modifier_pricing(outlet_id, &modifier.modifier_id)
                .await?
                .ok_or_else(|| OrderError::ModifierNotFound {
                    index,
                    modifier_id: modifier.modifier_id.clone(),
                })?;
            modifier_prices.push(price);
        }

        let charges: Vec<ModifierCharge> = item
            .modifiers
            .iter()
            .zip(&modifier_prices)
            .map(|(modifier, &unit_price)| ModifierCharge {
                unit_price,
                quantity: modifier.quantity,
            })
            .collect();

        let totals = price_item(unit_price, item.quantity, &charges, item.discount.as_ref())
            .ok_or(ValidationError::Item {
                index,
                error: ItemFieldError::QuantityOutOfRange,
            })?;

        Ok(PricedLine {
            item,
            unit_price,
            station,
            modifier_prices,
            totals,
        })
    }
}

/// Logs a rejected request and wraps the domain error.
fn reject(actor: &Actor, err: OrderError) -> EngineError {
    warn!(
        outlet_id = %actor.outlet_id,
        user_id = %actor.user_id,
        index = ?err.item_index(),
        error = %err,
        "Order request rejected"
    );
    EngineError::Order(err)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use orderly_core::{FlatRateTax, Modifier, Product, TaxRate, ValidationError, Variant};
    use orderly_db::{DbConfig, DbError, DbResult};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::sync::Mutex;

    const OUTLET: &str = "outlet-1";

    fn actor() -> Actor {
        Actor::new("cashier-1", OUTLET)
    }

    fn request(value: serde_json::Value) -> CreateOrderRequest {
        serde_json::from_value(value).unwrap()
    }

    // -------------------------------------------------------------------------
    // Mock collaborators
    // -------------------------------------------------------------------------

    #[derive(Default)]
    struct StaticGateway {
        products: HashMap<&'static str, (Money, Option<String>)>,
        variants: HashMap<&'static str, (&'static str, Money)>,
        modifiers: HashMap<&'static str, Money>,
        fail: bool,
    }

    #[async_trait]
    impl MasterDataGateway for StaticGateway {
        async fn resolve_item_pricing(
            &self,
            _outlet_id: &str,
            product_id: &str,
            variant_id: Option<&str>,
        ) -> DbResult<ItemPricing> {
            if self.fail {
                return Err(DbError::QueryFailed("database is locked".into()));
            }
            let Some((price, station)) = self.products.get(product_id) else {
                return Ok(ItemPricing::ProductNotFound);
            };
            let unit_price = match variant_id {
                None => *price,
                Some(v) => match self.variants.get(v) {
                    Some((owner, price)) if *owner == product_id => *price,
                    _ => return Ok(ItemPricing::VariantMismatch),
                },
            };
            Ok(ItemPricing::Found {
                unit_price,
                station: station.clone(),
            })
        }

        async fn resolve_modifier_pricing(
            &self,
            _outlet_id: &str,
            modifier_id: &str,
        ) -> DbResult<Option<Money>> {
            Ok(self.modifiers.get(modifier_id).copied())
        }
    }

    #[derive(Default)]
    struct CountingAllocator {
        calls: AtomicUsize,
        next: AtomicI64,
    }

    #[async_trait]
    impl OrderNumberAllocator for CountingAllocator {
        async fn next_order_number(&self, _outlet_id: &str) -> DbResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let value = self.next.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(OrderNumberFormat::default().format(value))
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        inserts: AtomicUsize,
        orders: Mutex<Vec<Order>>,
        fail: bool,
    }

    #[async_trait]
    impl OrderStore for MemoryStore {
        async fn insert_order(&self, order: &Order) -> DbResult<()> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DbError::TransactionFailed("disk full".into()));
            }
            self.orders.lock().unwrap().push(order.clone());
            Ok(())
        }

        async fn get_order(&self, outlet_id: &str, order_id: &str) -> DbResult<Option<Order>> {
            Ok(self
                .orders
                .lock()
                .unwrap()
                .iter()
                .find(|o| o.outlet_id == outlet_id && o.id == order_id)
                .cloned())
        }
    }

    fn menu() -> StaticGateway {
        let mut gateway = StaticGateway::default();
        gateway
            .products
            .insert("nasi", (Money::from_major(12_500), Some("WOK".into())));
        gateway
            .products
            .insert("tea", (Money::from_major(8_000), Some("BAR".into())));
        gateway
            .variants
            .insert("tea-large", ("tea", Money::from_major(13_000)));
        gateway.modifiers.insert("egg", Money::from_major(5_000));
        gateway
    }

    struct Harness {
        service: OrderService,
        allocator: Arc<CountingAllocator>,
        store: Arc<MemoryStore>,
    }

    fn harness(gateway: StaticGateway, store: MemoryStore) -> Harness {
        let allocator = Arc::new(CountingAllocator::default());
        let store = Arc::new(store);
        let service = OrderService::new(Arc::new(gateway), allocator.clone(), store.clone());
        Harness {
            service,
            allocator,
            store,
        }
    }

    impl Harness {
        fn side_effects(&self) -> (usize, usize) {
            (
                self.allocator.calls.load(Ordering::SeqCst),
                self.store.inserts.load(Ordering::SeqCst),
            )
        }
    }

    // -------------------------------------------------------------------------
    // Orchestration with mocks
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_creates_priced_order_with_one_allocation_and_one_write() {
        let h = harness(menu(), MemoryStore::default());

        let order = h
            .service
            .create_order(
                &actor(),
                request(json!({
                    "order_type": "DINE_IN",
                    "table_number": "12",
                    "items": [
                        { "product_id": "nasi", "quantity": 2,
                          "modifiers": [{ "modifier_id": "egg" }] },
                        { "product_id": "tea", "variant_id": "tea-large", "quantity": 1 }
                    ]
                })),
            )
            .await
            .unwrap();

        assert_eq!(h.side_effects(), (1, 1));
        assert_eq!(order.order_number, "ORD-000001");
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.created_by, "cashier-1");
        assert_eq!(order.items[0].station.as_deref(), Some("WOK"));
        assert_eq!(order.items[0].subtotal.to_string(), "30000.00");
        assert_eq!(order.items[0].modifiers[0].quantity, 1);
        assert_eq!(order.items[1].unit_price.to_string(), "13000.00");
        assert_eq!(order.subtotal.to_string(), "43000.00");
        assert_eq!(order.total_amount.to_string(), "43000.00");
        assert!(order.catering_status.is_none());
        assert!(order
            .items
            .iter()
            .flat_map(|i| &i.modifiers)
            .all(|m| m.order_item_id == order.items[0].id));
    }

    #[tokio::test]
    async fn test_shape_errors_have_no_side_effects() {
        let h = harness(menu(), MemoryStore::default());

        let err = h
            .service
            .create_order(&actor(), request(json!({ "items": [] })))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "order_type is required");

        let err = h
            .service
            .create_order(
                &actor(),
                request(json!({ "order_type": "TAKEAWAY", "items": [{ "product_id": "nasi" }] })),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Order(OrderError::Validation(ValidationError::Item { index: 0, .. }))
        ));

        assert_eq!(h.side_effects(), (0, 0));
    }

    #[tokio::test]
    async fn test_master_data_errors_are_indexed_and_have_no_side_effects() {
        let h = harness(menu(), MemoryStore::default());
        let items = |second: serde_json::Value| {
            request(json!({
                "order_type": "TAKEAWAY",
                "items": [{ "product_id": "nasi", "quantity": 1 }, second]
            }))
        };

        let err = h
            .service
            .create_order(&actor(), items(json!({ "product_id": "ghost", "quantity": 1 })))
            .await
            .unwrap_err();
        assert_eq!(
            err.as_order_error(),
            Some(&OrderError::ProductNotFound {
                index: 1,
                product_id: "ghost".into()
            })
        );

        let err = h
            .service
            .create_order(
                &actor(),
                items(json!({ "product_id": "nasi", "variant_id": "tea-large", "quantity": 1 })),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "item[1]: variant mismatch");

        let err = h
            .service
            .create_order(
                &actor(),
                items(json!({ "product_id": "nasi", "quantity": 1,
                              "modifiers": [{ "modifier_id": "truffle" }] })),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_order_error(),
            Some(OrderError::ModifierNotFound { index: 1, .. })
        ));

        assert_eq!(h.side_effects(), (0, 0));
    }

    #[tokio::test]
    async fn test_line_amount_overflow_is_rejected_without_side_effects() {
        let h = harness(menu(), MemoryStore::default());

        let err = h
            .service
            .create_order(
                &actor(),
                request(json!({
                    "order_type": "DINE_IN",
                    "items": [
                        { "product_id": "nasi", "quantity": 1 },
                        { "product_id": "nasi", "quantity": 10_000_000_000_000_i64 }
                    ]
                })),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.as_order_error(),
            Some(&OrderError::Validation(ValidationError::Item {
                index: 1,
                error: ItemFieldError::QuantityOutOfRange,
            }))
        );
        assert_eq!(err.to_string(), "items[1]: quantity is out of range");
        assert_eq!(h.side_effects(), (0, 0));
    }

    #[tokio::test]
    async fn test_order_total_overflow_is_rejected_without_side_effects() {
        let h = harness(menu(), MemoryStore::default());
        // each line fits on its own, the sum does not
        let line = json!({ "product_id": "nasi", "quantity": 4_000_000_000_000_i64 });

        let err = h
            .service
            .create_order(
                &actor(),
                request(json!({ "order_type": "TAKEAWAY", "items": [line.clone(), line] })),
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "order total is out of range");
        assert_eq!(h.side_effects(), (0, 0));
    }

    #[tokio::test]
    async fn test_gateway_failure_is_internal_and_skips_allocation() {
        let gateway = StaticGateway {
            fail: true,
            ..menu()
        };
        let h = harness(gateway, MemoryStore::default());

        let err = h
            .service
            .create_order(
                &actor(),
                request(json!({ "order_type": "DINE_IN",
                                 "items": [{ "product_id": "nasi", "quantity": 1 }] })),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Internal(_)));
        assert_eq!(h.side_effects(), (0, 0));
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_after_one_allocation() {
        let store = MemoryStore {
            fail: true,
            ..MemoryStore::default()
        };
        let h = harness(menu(), store);

        let err = h
            .service
            .create_order(
                &actor(),
                request(json!({ "order_type": "DINE_IN",
                                 "items": [{ "product_id": "nasi", "quantity": 1 }] })),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Internal(DbError::TransactionFailed(_))));
        assert_eq!(h.side_effects(), (1, 1));
    }

    #[tokio::test]
    async fn test_tax_policy_applies_to_discounted_subtotal() {
        let h = harness(menu(), MemoryStore::default());
        let service = h
            .service
            .with_tax_policy(FlatRateTax(TaxRate::from_bps(1000)));

        let order = service
            .create_order(
                &actor(),
                request(json!({
                    "order_type": "TAKEAWAY",
                    "discount_type": "FIXED_AMOUNT",
                    "discount_value": "5000",
                    "items": [{ "product_id": "nasi", "quantity": 2 }]
                })),
            )
            .await
            .unwrap();

        assert_eq!(order.subtotal.to_string(), "25000.00");
        assert_eq!(order.discount_amount.to_string(), "5000.00");
        assert_eq!(order.tax_amount.to_string(), "2000.00");
        assert_eq!(order.total_amount.to_string(), "22000.00");
    }

    // -------------------------------------------------------------------------
    // End to end over SQLite
    // -------------------------------------------------------------------------

    async fn seed_menu(db: &Database) {
        let now = Utc::now();
        let products = db.products();
        let product = |id: &str, outlet: &str, price: i64, station: &str| Product {
            id: id.into(),
            outlet_id: outlet.into(),
            name: id.into(),
            price: Money::from_major(price),
            station: Some(station.into()),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        for p in [
            product("nasi", OUTLET, 12_500, "WOK"),
            product("steak", OUTLET, 25_000, "GRILL"),
            product("platter", OUTLET, 50_000, "KITCHEN"),
            product("tea", OUTLET, 8_000, "BAR"),
            product("elsewhere", "outlet-2", 1_000, "WOK"),
        ] {
            products.insert_product(&p).await.unwrap();
        }

        products
            .insert_variant(&Variant {
                id: "tea-large".into(),
                product_id: "tea".into(),
                group_id: None,
                name: "Large".into(),
                price: Money::from_major(13_000),
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        products
            .insert_modifier(&Modifier {
                id: "cheese".into(),
                outlet_id: OUTLET.into(),
                name: "Cheese".into(),
                price: Money::from_major(5_000),
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    async fn sqlite_service() -> (Database, OrderService) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_menu(&db).await;
        let service = OrderService::from_database(&db, OrderNumberFormat::default());
        (db, service)
    }

    #[tokio::test]
    async fn test_dine_in_scenario() {
        let (_db, service) = sqlite_service().await;

        let order = service
            .create_order(
                &actor(),
                request(json!({
                    "order_type": "DINE_IN",
                    "items": [{ "product_id": "nasi", "quantity": 2 }]
                })),
            )
            .await
            .unwrap();

        assert_eq!(order.order_number, "ORD-000001");
        assert_eq!(order.subtotal.to_string(), "25000.00");
        assert_eq!(order.total_amount.to_string(), "25000.00");
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.items[0].status, ItemStatus::Pending);

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["subtotal"], "25000.00");
        assert_eq!(json["items"][0]["modifiers"], json!([]));

        let loaded = service.get_order(OUTLET, &order.id).await.unwrap().unwrap();
        assert_eq!(loaded.order_number, order.order_number);
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].unit_price, order.items[0].unit_price);
        assert!(service.get_order("outlet-2", &order.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_order_percentage_discount_scenario() {
        let (_db, service) = sqlite_service().await;

        let order = service
            .create_order(
                &actor(),
                request(json!({
                    "order_type": "TAKEAWAY",
                    "discount_type": "PERCENTAGE",
                    "discount_value": 10,
                    "items": [{ "product_id": "platter", "quantity": 1 }]
                })),
            )
            .await
            .unwrap();

        assert_eq!(order.subtotal.to_string(), "50000.00");
        assert_eq!(order.discount_amount.to_string(), "5000.00");
        assert_eq!(order.total_amount.to_string(), "45000.00");
    }

    #[tokio::test]
    async fn test_out_of_range_order_discounts_are_clamped() {
        let (db, service) = sqlite_service().await;
        let body = |value: &str| {
            request(json!({
                "order_type": "DINE_IN",
                "discount_type": "PERCENTAGE",
                "discount_value": value,
                "items": [{ "product_id": "nasi", "quantity": 1 }]
            }))
        };

        let order = service.create_order(&actor(), body("150")).await.unwrap();
        assert_eq!(order.discount_amount.to_string(), "12500.00");
        assert_eq!(order.discount_amount, order.subtotal);
        assert_eq!(order.total_amount.to_string(), "0.00");

        let order = service.create_order(&actor(), body("-10")).await.unwrap();
        assert_eq!(order.discount_amount, Money::zero());
        assert_eq!(order.total_amount.to_string(), "12500.00");

        let loaded = db.orders().get_by_id(OUTLET, &order.id).await.unwrap().unwrap();
        assert_eq!(loaded.discount_value, Some("-10".parse().unwrap()));
    }

    #[tokio::test]
    async fn test_modifier_scenario() {
        let (db, service) = sqlite_service().await;

        let order = service
            .create_order(
                &actor(),
                request(json!({
                    "order_type": "DINE_IN",
                    "items": [{ "product_id": "steak", "quantity": 1,
                                "modifiers": [{ "modifier_id": "cheese", "quantity": 1 }] }]
                })),
            )
            .await
            .unwrap();

        assert_eq!(order.items[0].subtotal.to_string(), "30000.00");

        let loaded = db.orders().get_by_id(OUTLET, &order.id).await.unwrap().unwrap();
        assert_eq!(loaded.items[0].modifiers.len(), 1);
        assert_eq!(loaded.items[0].modifiers[0].unit_price.to_string(), "5000.00");
    }

    #[tokio::test]
    async fn test_catering_without_date_persists_nothing() {
        let (db, service) = sqlite_service().await;

        let err = service
            .create_order(
                &actor(),
                request(json!({
                    "order_type": "CATERING",
                    "items": [{ "product_id": "platter", "quantity": 3 }]
                })),
            )
            .await
            .unwrap_err();

        assert_eq!(err.as_order_error(), Some(&OrderError::CateringDateRequired));
        assert_eq!(db.orders().count_by_outlet(OUTLET).await.unwrap(), 0);
        assert_eq!(db.sequences().current_value(OUTLET).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_catering_order_is_booked() {
        let (db, service) = sqlite_service().await;

        let order = service
            .create_order(
                &actor(),
                request(json!({
                    "order_type": "CATERING",
                    "catering_date": "2026-11-02",
                    "catering_deposit": "100000",
                    "customer_id": "cust-9",
                    "items": [{ "product_id": "platter", "quantity": 3 }]
                })),
            )
            .await
            .unwrap();

        let loaded = db.orders().get_by_id(OUTLET, &order.id).await.unwrap().unwrap();
        assert_eq!(loaded.catering_status, Some(CateringStatus::Booked));
        assert_eq!(loaded.catering_deposit, Some(Money::from_major(100_000)));
        assert_eq!(loaded.catering_date, order.catering_date);
        assert_eq!(loaded.customer_id.as_deref(), Some("cust-9"));
    }

    #[tokio::test]
    async fn test_variant_mismatch_persists_nothing() {
        let (db, service) = sqlite_service().await;

        let err = service
            .create_order(
                &actor(),
                request(json!({
                    "order_type": "DINE_IN",
                    "items": [
                        { "product_id": "tea", "variant_id": "tea-large", "quantity": 1 },
                        { "product_id": "steak", "variant_id": "tea-large", "quantity": 1 }
                    ]
                })),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_order_error(),
            Some(OrderError::VariantMismatch { index: 1, .. })
        ));
        assert_eq!(db.orders().count_by_outlet(OUTLET).await.unwrap(), 0);
        assert_eq!(db.sequences().current_value(OUTLET).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_foreign_outlet_product_is_not_found() {
        let (_db, service) = sqlite_service().await;

        let err = service
            .create_order(
                &actor(),
                request(json!({
                    "order_type": "DELIVERY",
                    "delivery_platform": "GoFood",
                    "items": [{ "product_id": "elsewhere", "quantity": 1 }]
                })),
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "item[0]: product not found: elsewhere");
    }

    #[tokio::test]
    async fn test_numbers_are_per_outlet() {
        let (_db, service) = sqlite_service().await;
        let body = || {
            request(json!({
                "order_type": "TAKEAWAY",
                "items": [{ "product_id": "nasi", "quantity": 1 }]
            }))
        };

        let first = service.create_order(&actor(), body()).await.unwrap();
        let second = service.create_order(&actor(), body()).await.unwrap();
        assert_eq!(first.order_number, "ORD-000001");
        assert_eq!(second.order_number, "ORD-000002");

        let other = service
            .create_order(
                &Actor::new("cashier-2", "outlet-2"),
                request(json!({
                    "order_type": "TAKEAWAY",
                    "items": [{ "product_id": "elsewhere", "quantity": 1 }]
                })),
            )
            .await
            .unwrap();
        assert_eq!(other.order_number, "ORD-000001");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creations_get_distinct_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("orders.db")).max_connections(4))
            .await
            .unwrap();
        seed_menu(&db).await;
        let service = OrderService::from_database(&db, OrderNumberFormat::default());

        const N: usize = 24;
        let handles: Vec<_> = (0..N)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .create_order(
                            &Actor::new(format!("cashier-{i}"), OUTLET),
                            request(json!({
                                "order_type": "TAKEAWAY",
                                "items": [{ "product_id": "nasi", "quantity": 1 }]
                            })),
                        )
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut numbers = Vec::with_capacity(N);
        for handle in handles {
            numbers.push(handle.await.unwrap().order_number);
        }
        numbers.sort();
        numbers.dedup();

        assert_eq!(numbers.len(), N);
        assert_eq!(db.orders().count_by_outlet(OUTLET).await.unwrap(), N as i64);
    }
}
