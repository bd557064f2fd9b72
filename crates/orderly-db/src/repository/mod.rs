//! # Repository Module
//!
//! Database repository implementations for Orderly POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  OrderService (orderly-engine)                                         │
//! │       │                                                                 │
//! │       │  via MasterDataGateway / OrderNumberAllocator / OrderStore     │
//! │       ▼                                                                 │
//! │  ProductRepository        OrderSequenceRepository   OrderRepository    │
//! │  ├── resolve_item_pricing ├── next_value             ├── insert        │
//! │  ├── resolve_modifier_... └── current_value          ├── get_by_id     │
//! │  └── insert_* / list_*                               └── count_by_...  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Master data and price lookups
//! - [`OrderSequenceRepository`](sequence::OrderSequenceRepository) - Per-outlet counters
//! - [`OrderRepository`](order::OrderRepository) - Order graph persistence

use uuid::Uuid;

pub mod order;
pub mod product;
pub mod sequence;

/// Generates a new row ID (UUID v4).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
