use super::{EntitySchema, ListOrder, Record};
use crate::sql::BindValue;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One message in a thread; messages sharing a `chat_key` form the thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatMessage {
    #[serde(skip_deserializing)]
    pub id: i32,
    pub chat_key: String,
    pub who: String,
    pub msg: String,
    #[serde(skip_deserializing)]
    pub timestamp: Option<NaiveDateTime>,
    pub customer: String,
}

impl ChatMessage {
    /// Column grouping messages into a thread.
    pub const THREAD_KEY: &'static str = "chat_key";
}

#[derive(Debug, sqlx::FromRow)]
pub struct ChatMessageRow {
    pub id: i32,
    pub chat_key: String,
    pub who: String,
    pub msg: String,
    pub timestamp: Option<NaiveDateTime>,
    pub customer: Option<String>,
}

impl Record for ChatMessage {
    type Row = ChatMessageRow;

    const SCHEMA: &'static EntitySchema = &EntitySchema {
        table: "chat_threads",
        id_column: "id",
        columns: &["chat_key", "who", "msg", "customer"],
        stamp_column: "timestamp",
        order: ListOrder {
            column: "timestamp",
            descending: false,
        },
        ddl: r#"
            CREATE TABLE IF NOT EXISTS chat_threads (
                id SERIAL PRIMARY KEY,
                chat_key VARCHAR(100) NOT NULL,
                who VARCHAR(50) NOT NULL,
                msg TEXT NOT NULL,
                timestamp TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                customer VARCHAR(100)
            )
        "#,
    };

    fn from_row(row: ChatMessageRow) -> Self {
        ChatMessage {
            id: row.id,
            chat_key: row.chat_key,
            who: row.who,
            msg: row.msg,
            timestamp: row.timestamp,
            customer: row.customer.unwrap_or_default(),
        }
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn stamped_at(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }

    fn stamp(&mut self, at: Option<NaiveDateTime>) {
        self.timestamp = at;
    }

    fn field(&self, column: &str) -> Option<BindValue> {
        Some(match column {
            "chat_key" => self.chat_key.as_str().into(),
            "who" => self.who.as_str().into(),
            "msg" => self.msg.as_str().into(),
            "customer" => self.customer.as_str().into(),
            _ => return None,
        })
    }
}
