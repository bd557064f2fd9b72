//! # Seed Data Generator
//!
//! Populates the database with a restaurant menu for one outlet.
//!
//! ## Usage
//! ```bash
//! # Seed the default outlet into ./orderly.db (or $ORDERLY_DB_PATH)
//! cargo run -p orderly-db --bin seed
//!
//! # Seed a specific outlet
//! cargo run -p orderly-db --bin seed -- --outlet outlet-2
//!
//! # Specify database path
//! cargo run -p orderly-db --bin seed -- --db ./data/orderly.db
//! ```
//!
//! ## Generated Data
//! - Products across kitchen stations (GRILL, WOK, BAR, PASTRY)
//! - Size variants for drinks, in a required "Size" group
//! - Add-on modifiers (extra egg, cheese, ...)
//!
//! IDs are derived from the outlet and item name (`outlet-1:nasi-goreng`), so
//! request files can reference seeded data without looking it up first.

use chrono::Utc;
use std::env;
use orderly_core::{Modifier, Money, NewVariantGroup, Product, Variant};
use orderly_db::{Database, DbConfig, DEFAULT_DATABASE_PATH};

/// (name, price in whole currency units, station)
const MENU: &[(&str, i64, &str)] = &[
    ("Nasi Goreng", 25_000, "WOK"),
    ("Mie Goreng", 23_000, "WOK"),
    ("Kwetiau Siram", 27_000, "WOK"),
    ("Ayam Bakar", 32_000, "GRILL"),
    ("Sate Ayam", 28_000, "GRILL"),
    ("Iga Bakar", 55_000, "GRILL"),
    ("Es Teh", 8_000, "BAR"),
    ("Kopi Susu", 18_000, "BAR"),
    ("Jus Alpukat", 20_000, "BAR"),
    ("Pisang Goreng", 15_000, "PASTRY"),
    ("Martabak Manis", 35_000, "PASTRY"),
];

/// Drinks get a size group; prices are absolute variant prices.
const DRINK_SIZES: &[(&str, i64)] = &[("Regular", 0), ("Large", 5_000)];

/// (name, price in whole currency units)
const MODIFIERS: &[(&str, i64)] = &[
    ("Extra Egg", 5_000),
    ("Extra Cheese", 6_000),
    ("Extra Spicy", 0),
    ("Less Sugar", 0),
    ("Extra Shot", 7_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut outlet_id = String::from("outlet-1");
    // Same database the orderly CLI opens by default
    let mut db_path =
        env::var("ORDERLY_DB_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--outlet" | "-o" => {
                if i + 1 < args.len() {
                    outlet_id = args[i + 1].clone();
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Orderly POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -o, --outlet <ID>  Outlet to seed (default: outlet-1)");
                println!(
                    "  -d, --db <PATH>    Database file path (default: $ORDERLY_DB_PATH or {})",
                    DEFAULT_DATABASE_PATH
                );
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Orderly POS Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!("Outlet:   {}", outlet_id);
    println!();

    // Connect to database
    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let products = db.products();

    // Check existing products
    let existing = products.count(&outlet_id).await?;
    if existing > 0 {
        println!("⚠ Outlet already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let now = Utc::now();

    for (name, price, station) in MENU {
        let product = Product {
            id: seed_id(&outlet_id, name),
            outlet_id: outlet_id.clone(),
            name: name.to_string(),
            price: Money::from_major(*price),
            station: Some(station.to_string()),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        products.insert_product(&product).await?;

        if *station == "BAR" {
            let group = products
                .insert_variant_group(NewVariantGroup {
                    product_id: product.id.clone(),
                    name: "Size".to_string(),
                    is_required: None,
                })
                .await?;

            for (size, addon) in DRINK_SIZES {
                let variant = Variant {
                    id: format!("{}:{}", product.id, slug(size)),
                    product_id: product.id.clone(),
                    group_id: Some(group.id.clone()),
                    name: size.to_string(),
                    price: Money::from_major(price + addon),
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                };
                products.insert_variant(&variant).await?;
            }
        }
    }

    for (name, price) in MODIFIERS {
        let modifier = Modifier {
            id: seed_id(&outlet_id, name),
            outlet_id: outlet_id.clone(),
            name: name.to_string(),
            price: Money::from_major(*price),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        products.insert_modifier(&modifier).await?;
    }

    println!();
    println!(
        "✓ Seeded {} products and {} modifiers",
        MENU.len(),
        MODIFIERS.len()
    );
    println!();
    println!("Menu:");
    let listed = products.list_by_outlet(&outlet_id).await?;
    println!("{}", serde_json::to_string_pretty(&listed)?);

    Ok(())
}

/// `outlet-1` + `"Nasi Goreng"` → `outlet-1:nasi-goreng`
fn seed_id(outlet_id: &str, name: &str) -> String {
    format!("{}:{}", outlet_id, slug(name))
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}
