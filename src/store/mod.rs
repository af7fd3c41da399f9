//! Store capabilities, generic over record type.
//!
//! Handlers receive a [`Store`] through [`crate::AppState`]; [`PgStore`] talks to PostgreSQL,
//! [`MemoryStore`] keeps rows in process for tests.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::StoreError;
use crate::records::{ActivityLogEntry, BacklogItem, ChatMessage, Deletable, Developer, Record, Updatable};
use crate::sql::Filter;
use async_trait::async_trait;

/// List, insert and count for one record type.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Rows matching every filter, in the record's list order.
    async fn list(&self, filters: &[Filter]) -> Result<Vec<R>, StoreError>;

    /// Insert and return the record with its generated id and server-set timestamp.
    async fn insert(&self, record: R) -> Result<R, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}

#[async_trait]
pub trait RecordUpdate<R: Updatable>: Send + Sync {
    /// Replace every caller-supplied column of row `id`. Returns rows affected (0 when absent).
    async fn update(&self, id: i32, record: &R) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait RecordDelete<R: Deletable>: Send + Sync {
    /// Remove row `id`. Returns rows affected (0 when absent).
    async fn delete(&self, id: i32) -> Result<u64, StoreError>;
}

/// Everything the HTTP surface needs from a store.
#[async_trait]
pub trait Store:
    RecordStore<Developer>
    + RecordUpdate<Developer>
    + RecordStore<BacklogItem>
    + RecordDelete<BacklogItem>
    + RecordStore<ActivityLogEntry>
    + RecordStore<ChatMessage>
    + 'static
{
    async fn ping(&self) -> Result<(), StoreError>;
}
