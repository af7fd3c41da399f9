use super::{EntitySchema, ListOrder, Record, Updatable};
use crate::sql::BindValue;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Developer {
    #[serde(skip_deserializing)]
    pub id: i32,
    pub name: String,
    pub avatar: String,
    /// Completed task counter.
    pub done: i32,
    pub quick_fix: String,
    pub primary: String,
    pub secondary: String,
    pub status: String,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct DeveloperRow {
    pub id: i32,
    pub name: String,
    pub avatar: Option<String>,
    pub done: Option<i32>,
    pub quick_fix: Option<String>,
    pub primary_task: Option<String>,
    pub secondary_task: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

impl Record for Developer {
    type Row = DeveloperRow;

    const SCHEMA: &'static EntitySchema = &EntitySchema {
        table: "developers",
        id_column: "id",
        columns: &[
            "name",
            "avatar",
            "done",
            "quick_fix",
            "primary_task",
            "secondary_task",
            "status",
        ],
        stamp_column: "created_at",
        order: ListOrder {
            column: "id",
            descending: false,
        },
        ddl: r#"
            CREATE TABLE IF NOT EXISTS developers (
                id SERIAL PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                avatar VARCHAR(255),
                done INTEGER DEFAULT 0,
                quick_fix TEXT,
                primary_task TEXT,
                secondary_task TEXT,
                status VARCHAR(20) DEFAULT 'active',
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
        "#,
    };

    fn from_row(row: DeveloperRow) -> Self {
        Developer {
            id: row.id,
            name: row.name,
            avatar: row.avatar.unwrap_or_default(),
            done: row.done.unwrap_or_default(),
            quick_fix: row.quick_fix.unwrap_or_default(),
            primary: row.primary_task.unwrap_or_default(),
            secondary: row.secondary_task.unwrap_or_default(),
            status: row.status.unwrap_or_default(),
            created_at: row.created_at,
        }
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn stamped_at(&self) -> Option<NaiveDateTime> {
        self.created_at
    }

    fn stamp(&mut self, at: Option<NaiveDateTime>) {
        self.created_at = at;
    }

    fn field(&self, column: &str) -> Option<BindValue> {
        Some(match column {
            "name" => self.name.as_str().into(),
            "avatar" => self.avatar.as_str().into(),
            "done" => self.done.into(),
            "quick_fix" => self.quick_fix.as_str().into(),
            "primary_task" => self.primary.as_str().into(),
            "secondary_task" => self.secondary.as_str().into(),
            "status" => self.status.as_str().into(),
            _ => return None,
        })
    }
}

impl Updatable for Developer {}
