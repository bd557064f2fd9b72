//! # orderly-db: Database Layer for Orderly POS
//!
//! This crate provides database access for the order engine.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Orderly POS Data Flow                            │
//! │                                                                         │
//! │  OrderService::create_order                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    orderly-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │   │   │
//! │  │   │               │    │ ProductRepo    │   │ 001_master   │   │   │
//! │  │   │ SqlitePool    │◄───│ SequenceRepo   │   │ 002_orders   │   │   │
//! │  │   │ WAL, FKs on   │    │ OrderRepo      │   │              │   │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./orderly.db                                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, sequence, order)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use orderly_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./orderly.db")).await?;
//!
//! let seq = db.sequences().next_value("outlet-1").await?;
//! let products = db.products().list_by_outlet("outlet-1").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DEFAULT_DATABASE_PATH};

// Repository re-exports for convenience
pub use repository::generate_id;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::sequence::OrderSequenceRepository;
