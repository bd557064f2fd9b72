//! # Product Repository
//!
//! Master data: products, variant groups, variants, and modifiers.
//!
//! ## Key Operations
//! - Inserts used by the seed binary and tests
//! - Outlet-scoped reads
//! - Price lookups used by the order engine
//!
//! ## Price Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  resolve_item_pricing(outlet, product, variant?)        │
//! │                                                                         │
//! │  products WHERE id = ? AND outlet_id = ? AND is_active = 1             │
//! │       │                                                                 │
//! │       ├── no row ───────────────────────────► ProductNotFound          │
//! │       │                                                                 │
//! │       ├── no variant requested ─────────────► Found { product price }  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  product_variants WHERE id = ? AND product_id = ? AND is_active = 1    │
//! │       │                                                                 │
//! │       ├── no row ───────────────────────────► VariantMismatch          │
//! │       └── row ──────────────────────────────► Found { variant price }  │
//! │                                                                         │
//! │  station always comes from the product                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::generate_id;
use crate::error::DbResult;
use orderly_core::{ItemPricing, Modifier, Money, NewVariantGroup, Product, Variant, VariantGroup};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    outlet_id: String,
    name: String,
    price: i64,
    station: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            outlet_id: row.outlet_id,
            name: row.name,
            price: Money::from_minor(row.price),
            station: row.station,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
    id: String,
    product_id: String,
    group_id: Option<String>,
    name: String,
    price: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VariantRow> for Variant {
    fn from(row: VariantRow) -> Self {
        Variant {
            id: row.id,
            product_id: row.product_id,
            group_id: row.group_id,
            name: row.name,
            price: Money::from_minor(row.price),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for master data.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// repo.insert_product(&product).await?;
/// let pricing = repo.resolve_item_pricing("outlet-1", &product.id, None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id already exists
    pub async fn insert_product(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, outlet_id = %product.outlet_id, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, outlet_id, name, price, station,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.outlet_id)
        .bind(&product.name)
        .bind(product.price.minor())
        .bind(&product.station)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Creates a variant group, applying the `is_required` default.
    pub async fn insert_variant_group(&self, group: NewVariantGroup) -> DbResult<VariantGroup> {
        let group = group.resolve(generate_id(), Utc::now());

        debug!(id = %group.id, product_id = %group.product_id, "Inserting variant group");

        sqlx::query(
            r#"
            INSERT INTO variant_groups (id, product_id, name, is_required, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&group.id)
        .bind(&group.product_id)
        .bind(&group.name)
        .bind(group.is_required)
        .bind(group.created_at)
        .execute(&self.pool)
        .await?;

        Ok(group)
    }

    /// Lists the variant groups of a product.
    pub async fn list_variant_groups(&self, product_id: &str) -> DbResult<Vec<VariantGroup>> {
        let rows = sqlx::query_as::<_, (String, String, String, bool, DateTime<Utc>)>(
            r#"
            SELECT id, product_id, name, is_required, created_at
            FROM variant_groups
            WHERE product_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, product_id, name, is_required, created_at)| VariantGroup {
                id,
                product_id,
                name,
                is_required,
                created_at,
            })
            .collect())
    }

    /// Inserts a variant.
    pub async fn insert_variant(&self, variant: &Variant) -> DbResult<()> {
        debug!(id = %variant.id, product_id = %variant.product_id, "Inserting variant");

        sqlx::query(
            r#"
            INSERT INTO product_variants (
                id, product_id, group_id, name, price,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&variant.id)
        .bind(&variant.product_id)
        .bind(&variant.group_id)
        .bind(&variant.name)
        .bind(variant.price.minor())
        .bind(variant.is_active)
        .bind(variant.created_at)
        .bind(variant.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists the variants of a product, active or not.
    pub async fn list_variants(&self, product_id: &str) -> DbResult<Vec<Variant>> {
        let rows = sqlx::query_as::<_, VariantRow>(
            r#"
            SELECT id, product_id, group_id, name, price, is_active, created_at, updated_at
            FROM product_variants
            WHERE product_id = ?1
            ORDER BY name
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Variant::from).collect())
    }

    /// Inserts a modifier.
    pub async fn insert_modifier(&self, modifier: &Modifier) -> DbResult<()> {
        debug!(id = %modifier.id, outlet_id = %modifier.outlet_id, "Inserting modifier");

        sqlx::query(
            r#"
            INSERT INTO modifiers (
                id, outlet_id, name, price, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&modifier.id)
        .bind(&modifier.outlet_id)
        .bind(&modifier.name)
        .bind(modifier.price.minor())
        .bind(modifier.is_active)
        .bind(modifier.created_at)
        .bind(modifier.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by ID, regardless of outlet or active flag.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, outlet_id, name, price, station, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Lists an outlet's active products, sorted by name.
    pub async fn list_by_outlet(&self, outlet_id: &str) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, outlet_id, name, price, station, is_active, created_at, updated_at
            FROM products
            WHERE outlet_id = ?1 AND is_active = 1
            ORDER BY name
            "#,
        )
        .bind(outlet_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(outlet_id = %outlet_id, count = rows.len(), "Listed products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Counts an outlet's active products (for diagnostics).
    pub async fn count(&self, outlet_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE outlet_id = ?1 AND is_active = 1",
        )
        .bind(outlet_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Resolves the current unit price and station of one order line.
    ///
    /// Unknown, inactive and foreign-outlet master data are reported as the
    /// corresponding [`ItemPricing`] condition, never as an error.
    pub async fn resolve_item_pricing(
        &self,
        outlet_id: &str,
        product_id: &str,
        variant_id: Option<&str>,
    ) -> DbResult<ItemPricing> {
        let product = sqlx::query_as::<_, (i64, Option<String>)>(
            r#"
            SELECT price, station
            FROM products
            WHERE id = ?1 AND outlet_id = ?2 AND is_active = 1
            "#,
        )
        .bind(product_id)
        .bind(outlet_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((product_price, station)) = product else {
            debug!(outlet_id = %outlet_id, product_id = %product_id, "Product not orderable");
            return Ok(ItemPricing::ProductNotFound);
        };

        let unit_price = match variant_id {
            None => product_price,
            Some(variant_id) => {
                let variant_price: Option<i64> = sqlx::query_scalar(
                    r#"
                    SELECT price
                    FROM product_variants
                    WHERE id = ?1 AND product_id = ?2 AND is_active = 1
                    "#,
                )
                .bind(variant_id)
                .bind(product_id)
                .fetch_optional(&self.pool)
                .await?;

                match variant_price {
                    Some(price) => price,
                    None => {
                        debug!(product_id = %product_id, variant_id = %variant_id, "Variant mismatch");
                        return Ok(ItemPricing::VariantMismatch);
                    }
                }
            }
        };

        Ok(ItemPricing::Found {
            unit_price: Money::from_minor(unit_price),
            station,
        })
    }

    /// Resolves the current unit price of a modifier for an outlet.
    ///
    /// Returns `None` when the modifier is unknown, inactive, or owned by
    /// another outlet.
    pub async fn resolve_modifier_pricing(
        &self,
        outlet_id: &str,
        modifier_id: &str,
    ) -> DbResult<Option<Money>> {
        let price: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT price
            FROM modifiers
            WHERE id = ?1 AND outlet_id = ?2 AND is_active = 1
            "#,
        )
        .bind(modifier_id)
        .bind(outlet_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(price.map(Money::from_minor))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
