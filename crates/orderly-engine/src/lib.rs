//! # orderly-engine: Order Creation for Orderly POS
//!
//! Turns a cashier's raw request into a persisted, priced, numbered order.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Adapter (CLI, HTTP, ...)                                               │
//! │       │  CreateOrderRequest + Actor                                     │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 orderly-engine (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   OrderService ──► MasterDataGateway    (ports.rs)              │   │
//! │  │        │       ──► OrderNumberAllocator                         │   │
//! │  │        │       ──► OrderStore                                   │   │
//! │  │        ▼                                                        │   │
//! │  │   Order  |  EngineError ──► ErrorResponse  (error.rs)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                             │                                   │
//! │       ▼                             ▼                                   │
//! │  orderly-core (rules)          orderly-db (SQLite)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`service`] - `OrderService::create_order` / `get_order`
//! - [`ports`] - Collaborator traits and their SQLite adapters
//! - [`error`] - Engine error and client error payload
//! - [`config`] - Environment configuration
//! - [`telemetry`] - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod ports;
pub mod service;
pub mod telemetry;

pub use config::{ConfigError, EngineConfig};
pub use error::{EngineError, EngineResult, ErrorCode, ErrorResponse};
pub use ports::{MasterDataGateway, OrderNumberAllocator, OrderStore, SequenceAllocator};
pub use service::OrderService;
