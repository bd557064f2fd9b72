//! # Order Repository
//!
//! Persistence of the order graph: header, items, item modifiers.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       insert(order)                                     │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── INSERT orders                  (first statement is a write, so    │
//! │   │                                   the lock is taken up front)       │
//! │   ├── INSERT order_items  × N        line_no = request index            │
//! │   │    └── INSERT order_item_modifiers × M                              │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any error, or the future being dropped before COMMIT, rolls back:     │
//! │  readers never observe a header without its items.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use orderly_core::{
    CateringStatus, DiscountType, ItemStatus, Money, Order, OrderItem, OrderItemModifier,
    OrderStatus, OrderType,
};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    outlet_id: String,
    order_number: String,
    order_type: OrderType,
    status: OrderStatus,
    subtotal: i64,
    discount_type: Option<DiscountType>,
    discount_value: Option<String>,
    discount_amount: i64,
    tax_amount: i64,
    total_amount: i64,
    customer_id: Option<String>,
    table_number: Option<String>,
    notes: Option<String>,
    delivery_platform: Option<String>,
    delivery_address: Option<String>,
    catering_date: Option<DateTime<Utc>>,
    catering_status: Option<CateringStatus>,
    catering_deposit: Option<i64>,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> DbResult<Order> {
        Ok(Order {
            id: self.id,
            outlet_id: self.outlet_id,
            order_number: self.order_number,
            order_type: self.order_type,
            status: self.status,
            subtotal: Money::from_minor(self.subtotal),
            discount_type: self.discount_type,
            discount_value: parse_decimal("orders.discount_value", self.discount_value)?,
            discount_amount: Money::from_minor(self.discount_amount),
            tax_amount: Money::from_minor(self.tax_amount),
            total_amount: Money::from_minor(self.total_amount),
            customer_id: self.customer_id,
            table_number: self.table_number,
            notes: self.notes,
            delivery_platform: self.delivery_platform,
            delivery_address: self.delivery_address,
            catering_date: self.catering_date,
            catering_status: self.catering_status,
            catering_deposit: self.catering_deposit.map(Money::from_minor),
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
            items,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: String,
    order_id: String,
    product_id: String,
    variant_id: Option<String>,
    quantity: i64,
    unit_price: i64,
    discount_type: Option<DiscountType>,
    discount_value: Option<String>,
    discount_amount: i64,
    subtotal: i64,
    status: ItemStatus,
    station: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl OrderItemRow {
    fn into_item(self, modifiers: Vec<OrderItemModifier>) -> DbResult<OrderItem> {
        Ok(OrderItem {
            id: self.id,
            order_id: self.order_id,
            product_id: self.product_id,
            variant_id: self.variant_id,
            quantity: self.quantity,
            unit_price: Money::from_minor(self.unit_price),
            discount_type: self.discount_type,
            discount_value: parse_decimal("order_items.discount_value", self.discount_value)?,
            discount_amount: Money::from_minor(self.discount_amount),
            subtotal: Money::from_minor(self.subtotal),
            status: self.status,
            station: self.station,
            notes: self.notes,
            created_at: self.created_at,
            modifiers,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemModifierRow {
    id: String,
    order_item_id: String,
    modifier_id: String,
    quantity: i64,
    unit_price: i64,
}

impl From<OrderItemModifierRow> for OrderItemModifier {
    fn from(row: OrderItemModifierRow) -> Self {
        OrderItemModifier {
            id: row.id,
            order_item_id: row.order_item_id,
            modifier_id: row.modifier_id,
            quantity: row.quantity,
            unit_price: Money::from_minor(row.unit_price),
        }
    }
}

/// Discount values are stored as exact decimal text.
fn parse_decimal(column: &'static str, value: Option<String>) -> DbResult<Option<Decimal>> {
    value
        .map(|raw| Decimal::from_str(&raw).map_err(|_| DbError::decode(column, raw)))
        .transpose()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for orders and their lines.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Writes an order with all its items and modifiers in one transaction.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - order number already used by the outlet
    /// * `Err(DbError::CheckViolation)` - totals break a stored invariant
    pub async fn insert(&self, order: &Order) -> DbResult<()> {
        debug!(
            id = %order.id,
            outlet_id = %order.outlet_id,
            order_number = %order.order_number,
            items = order.items.len(),
            "Inserting order"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, outlet_id, order_number, order_type, status,
                subtotal, discount_type, discount_value, discount_amount,
                tax_amount, total_amount,
                customer_id, table_number, notes, delivery_platform, delivery_address,
                catering_date, catering_status, catering_deposit,
                created_by, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                ?10, ?11,
                ?12, ?13, ?14, ?15, ?16,
                ?17, ?18, ?19,
                ?20, ?21, ?22
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.outlet_id)
        .bind(&order.order_number)
        .bind(order.order_type)
        .bind(order.status)
        .bind(order.subtotal.minor())
        .bind(order.discount_type)
        .bind(order.discount_value.map(|v| v.to_string()))
        .bind(order.discount_amount.minor())
        .bind(order.tax_amount.minor())
        .bind(order.total_amount.minor())
        .bind(&order.customer_id)
        .bind(&order.table_number)
        .bind(&order.notes)
        .bind(&order.delivery_platform)
        .bind(&order.delivery_address)
        .bind(order.catering_date)
        .bind(order.catering_status)
        .bind(order.catering_deposit.map(|m| m.minor()))
        .bind(&order.created_by)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for (line_no, item) in order.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, line_no, product_id, variant_id,
                    quantity, unit_price, discount_type, discount_value,
                    discount_amount, subtotal, status, station, notes, created_at
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5,
                    ?6, ?7, ?8, ?9,
                    ?10, ?11, ?12, ?13, ?14, ?15
                )
                "#,
            )
            .bind(&item.id)
            .bind(&order.id)
            .bind(line_no as i64)
            .bind(&item.product_id)
            .bind(&item.variant_id)
            .bind(item.quantity)
            .bind(item.unit_price.minor())
            .bind(item.discount_type)
            .bind(item.discount_value.map(|v| v.to_string()))
            .bind(item.discount_amount.minor())
            .bind(item.subtotal.minor())
            .bind(item.status)
            .bind(&item.station)
            .bind(&item.notes)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;

            for (modifier_no, modifier) in item.modifiers.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO order_item_modifiers (
                        id, order_item_id, line_no, modifier_id, quantity, unit_price
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                )
                .bind(&modifier.id)
                .bind(&item.id)
                .bind(modifier_no as i64)
                .bind(&modifier.modifier_id)
                .bind(modifier.quantity)
                .bind(modifier.unit_price.minor())
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        debug!(id = %order.id, "Order committed");
        Ok(())
    }

    /// Reads an order graph back, scoped to the outlet.
    ///
    /// Items and modifiers come back in the order they were submitted.
    ///
    /// ## Returns
    /// * `Ok(Some(Order))` - Order found for this outlet
    /// * `Ok(None)` - Unknown id, or the order belongs to another outlet
    pub async fn get_by_id(&self, outlet_id: &str, id: &str) -> DbResult<Option<Order>> {
        let mut conn = self.pool.acquire().await?;

        let header = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT
                id, outlet_id, order_number, order_type, status,
                subtotal, discount_type, discount_value, discount_amount,
                tax_amount, total_amount,
                customer_id, table_number, notes, delivery_platform, delivery_address,
                catering_date, catering_status, catering_deposit,
                created_by, created_at, updated_at
            FROM orders
            WHERE id = ?1 AND outlet_id = ?2
            "#,
        )
        .bind(id)
        .bind(outlet_id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT
                id, order_id, product_id, variant_id,
                quantity, unit_price, discount_type, discount_value,
                discount_amount, subtotal, status, station, notes, created_at
            FROM order_items
            WHERE order_id = ?1
            ORDER BY line_no
            "#,
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

        let modifier_rows = sqlx::query_as::<_, OrderItemModifierRow>(
            r#"
            SELECT m.id, m.order_item_id, m.modifier_id, m.quantity, m.unit_price
            FROM order_item_modifiers m
            INNER JOIN order_items i ON i.id = m.order_item_id
            WHERE i.order_id = ?1
            ORDER BY i.line_no, m.line_no
            "#,
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

        let mut modifiers_by_item: HashMap<String, Vec<OrderItemModifier>> = HashMap::new();
        for row in modifier_rows {
            modifiers_by_item
                .entry(row.order_item_id.clone())
                .or_default()
                .push(row.into());
        }

        let items = item_rows
            .into_iter()
            .map(|row| {
                let modifiers = modifiers_by_item.remove(&row.id).unwrap_or_default();
                row.into_item(modifiers)
            })
            .collect::<DbResult<Vec<_>>>()?;

        header.into_order(items).map(Some)
    }

    /// Counts an outlet's orders (for diagnostics and tests).
    pub async fn count_by_outlet(&self, outlet_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE outlet_id = ?1")
            .bind(outlet_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn sample_order(id: &str, number: &str) -> Order {
        let now = Utc::now();
        let item_id = format!("{id}-i0");
        Order {
            id: id.into(),
            outlet_id: "o1".into(),
            order_number: number.into(),
            order_type: OrderType::Catering,
            status: OrderStatus::New,
            subtotal: Money::from_major(30_000),
            discount_type: Some(DiscountType::Percentage),
            discount_value: Some(Decimal::new(125, 1)),
            discount_amount: Money::from_major(3_750),
            tax_amount: Money::zero(),
            total_amount: Money::from_major(26_250),
            customer_id: Some("c1".into()),
            table_number: None,
            notes: None,
            delivery_platform: None,
            delivery_address: None,
            catering_date: Some(now),
            catering_status: Some(CateringStatus::Booked),
            catering_deposit: Some(Money::from_major(10_000)),
            created_by: "u1".into(),
            created_at: now,
            updated_at: now,
            items: vec![
                OrderItem {
                    id: item_id.clone(),
                    order_id: id.into(),
                    product_id: "p1".into(),
                    variant_id: None,
                    quantity: 1,
                    unit_price: Money::from_major(25_000),
                    discount_type: None,
                    discount_value: None,
                    discount_amount: Money::zero(),
                    subtotal: Money::from_major(30_000),
                    status: ItemStatus::Pending,
                    station: Some("GRILL".into()),
                    notes: None,
                    created_at: now,
                    modifiers: vec![
                        OrderItemModifier {
                            id: format!("{id}-m0"),
                            order_item_id: item_id.clone(),
                            modifier_id: "m-b".into(),
                            quantity: 1,
                            unit_price: Money::from_major(3_000),
                        },
                        OrderItemModifier {
                            id: format!("{id}-m1"),
                            order_item_id: item_id.clone(),
                            modifier_id: "m-a".into(),
                            quantity: 2,
                            unit_price: Money::from_major(1_000),
                        },
                    ],
                },
                OrderItem {
                    id: format!("{id}-i1"),
                    order_id: id.into(),
                    product_id: "p0".into(),
                    variant_id: Some("v1".into()),
                    quantity: 1,
                    unit_price: Money::zero(),
                    discount_type: Some(DiscountType::FixedAmount),
                    discount_value: Some(Decimal::ZERO),
                    discount_amount: Money::zero(),
                    subtotal: Money::zero(),
                    status: ItemStatus::Pending,
                    station: None,
                    notes: Some("no ice".into()),
                    created_at: now,
                    modifiers: vec![],
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back_preserves_graph() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order = sample_order("ord-1", "ORD-000001");
        db.orders().insert(&order).await.unwrap();

        let loaded = db.orders().get_by_id("o1", "ord-1").await.unwrap().unwrap();
        assert_eq!(loaded.order_number, "ORD-000001");
        assert_eq!(loaded.discount_value, Some(Decimal::new(125, 1)));
        assert_eq!(loaded.catering_status, Some(CateringStatus::Booked));
        assert_eq!(loaded.items.len(), 2);
        assert_eq!(loaded.items[0].product_id, "p1");
        assert_eq!(loaded.items[1].product_id, "p0");
        assert_eq!(loaded.items[0].modifiers[0].modifier_id, "m-b");
        assert_eq!(loaded.items[0].modifiers[1].modifier_id, "m-a");
        assert!(loaded.items[1].modifiers.is_empty());
        assert_eq!(loaded.items[1].notes.as_deref(), Some("no ice"));
        assert_eq!(loaded.total_amount, order.total_amount);
    }

    #[tokio::test]
    async fn test_get_by_id_is_outlet_scoped() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.orders()
            .insert(&sample_order("ord-1", "ORD-000001"))
            .await
            .unwrap();

        assert!(db.orders().get_by_id("o2", "ord-1").await.unwrap().is_none());
        assert!(db.orders().get_by_id("o1", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_number_rolls_back_whole_graph() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.orders()
            .insert(&sample_order("ord-1", "ORD-000001"))
            .await
            .unwrap();

        let err = db
            .orders()
            .insert(&sample_order("ord-2", "ORD-000001"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(db.orders().count_by_outlet("o1").await.unwrap(), 1);

        let orphan_items: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE order_id = 'ord-2'")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(orphan_items, 0);
    }

    #[tokio::test]
    async fn test_failing_item_rolls_back_header() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut order = sample_order("ord-1", "ORD-000001");
        // violates the quantity CHECK after the header was written
        order.items[1].quantity = 0;

        let err = db.orders().insert(&order).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
        assert_eq!(db.orders().count_by_outlet("o1").await.unwrap(), 0);
    }
}
