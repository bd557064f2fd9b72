//! # Order Sequence Repository
//!
//! Per-outlet monotonically increasing counters behind order numbers.
//!
//! ## Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  INSERT INTO order_sequences (outlet_id, last_value, updated_at)        │
//! │  VALUES (?, 1, ?)                                                       │
//! │  ON CONFLICT (outlet_id) DO UPDATE SET last_value = last_value + 1      │
//! │  RETURNING last_value                                                   │
//! │                                                                         │
//! │  • one statement, one implicit transaction: no read-modify-write gap    │
//! │  • committed on its own, before the order transaction starts            │
//! │  • a failed order leaves a gap, never a reused number                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for the `order_sequences` table.
#[derive(Debug, Clone)]
pub struct OrderSequenceRepository {
    pool: SqlitePool,
}

impl OrderSequenceRepository {
    /// Creates a new OrderSequenceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderSequenceRepository { pool }
    }

    /// Atomically increments and returns the outlet's sequence value.
    ///
    /// The first call for an outlet returns 1.
    pub async fn next_value(&self, outlet_id: &str) -> DbResult<i64> {
        let value: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO order_sequences (outlet_id, last_value, updated_at)
            VALUES (?1, 1, ?2)
            ON CONFLICT (outlet_id) DO UPDATE SET
                last_value = last_value + 1,
                updated_at = excluded.updated_at
            RETURNING last_value
            "#,
        )
        .bind(outlet_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        debug!(outlet_id = %outlet_id, value, "Allocated order sequence value");
        Ok(value)
    }

    /// Returns the last allocated value without incrementing (0 if none).
    pub async fn current_value(&self, outlet_id: &str) -> DbResult<i64> {
        let value: Option<i64> =
            sqlx::query_scalar("SELECT last_value FROM order_sequences WHERE outlet_id = ?1")
                .bind(outlet_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value.unwrap_or(0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
