//! Record types and the mapping between their JSON and table representations.
//!
//! Every entity implements [`Record`]; the store and handlers are generic over it.
//! [`Updatable`] and [`Deletable`] mark which entities expose those operations.

mod activity;
mod backlog;
mod chat;
mod developer;

pub use activity::{ActivityLogEntry, ActivityLogRow};
pub use backlog::{BacklogItem, BacklogRow};
pub use chat::{ChatMessage, ChatMessageRow};
pub use developer::{Developer, DeveloperRow};

use crate::error::AppError;
use crate::sql::BindValue;
use chrono::NaiveDateTime;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use std::fmt;

/// Static description of one table.
#[derive(Debug)]
pub struct EntitySchema {
    pub table: &'static str,
    pub id_column: &'static str,
    /// Caller-supplied columns, in bind order.
    pub columns: &'static [&'static str],
    /// Timestamp assigned by the store on insert.
    pub stamp_column: &'static str,
    pub order: ListOrder,
    pub ddl: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ListOrder {
    pub column: &'static str,
    pub descending: bool,
}

/// Every table provisioned at startup.
pub const TABLES: [&EntitySchema; 4] = [
    Developer::SCHEMA,
    BacklogItem::SCHEMA,
    ActivityLogEntry::SCHEMA,
    ChatMessage::SCHEMA,
];

pub trait Record: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    /// Persisted shape as read back from the table.
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    const SCHEMA: &'static EntitySchema;

    fn from_row(row: Self::Row) -> Self;

    fn id(&self) -> i32;

    fn set_id(&mut self, id: i32);

    fn stamped_at(&self) -> Option<NaiveDateTime>;

    fn stamp(&mut self, at: Option<NaiveDateTime>);

    /// Value of a caller-supplied column.
    fn field(&self, column: &str) -> Option<BindValue>;

    /// Value of any column, including id and the server-set timestamp.
    fn value(&self, column: &str) -> Option<BindValue> {
        if column == Self::SCHEMA.id_column {
            Some(BindValue::Int(self.id()))
        } else if column == Self::SCHEMA.stamp_column {
            self.stamped_at().map(BindValue::Timestamp)
        } else {
            self.field(column)
        }
    }

    /// Caller-supplied values in `SCHEMA.columns` order.
    fn values(&self) -> Vec<BindValue> {
        Self::SCHEMA
            .columns
            .iter()
            .filter_map(|c| self.field(c))
            .collect()
    }
}

/// Records whose rows may be replaced by id.
pub trait Updatable: Record {}

/// Records whose rows may be removed by id.
pub trait Deletable: Record {}

/// Decode a request body. It must be a JSON object; missing fields take their defaults,
/// while `id` and the server-set timestamp are ignored.
pub fn decode<R: Record>(body: &[u8]) -> Result<R, AppError> {
    let mut value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("malformed JSON body: {}", e)))?;
    let Value::Object(fields) = &mut value else {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    };
    // An explicit null leaves the field at its default.
    fields.retain(|_, v| !v.is_null());
    serde_json::from_value(value).map_err(|e| AppError::BadRequest(format!("invalid body: {}", e)))
}
