use super::{Deletable, EntitySchema, ListOrder, Record};
use crate::sql::BindValue;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BacklogItem {
    #[serde(skip_deserializing)]
    pub id: i32,
    pub task: String,
    /// "low", "medium" or "high"; not enforced.
    pub priority: String,
    pub estimated_hours: i32,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct BacklogRow {
    pub id: i32,
    pub task: String,
    pub priority: Option<String>,
    pub estimated_hours: Option<i32>,
    pub created_at: Option<NaiveDateTime>,
}

impl Record for BacklogItem {
    type Row = BacklogRow;

    const SCHEMA: &'static EntitySchema = &EntitySchema {
        table: "backlog",
        id_column: "id",
        columns: &["task", "priority", "estimated_hours"],
        stamp_column: "created_at",
        order: ListOrder {
            column: "id",
            descending: false,
        },
        ddl: r#"
            CREATE TABLE IF NOT EXISTS backlog (
                id SERIAL PRIMARY KEY,
                task TEXT NOT NULL,
                priority VARCHAR(20) DEFAULT 'medium',
                estimated_hours INTEGER DEFAULT 0,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
        "#,
    };

    fn from_row(row: BacklogRow) -> Self {
        BacklogItem {
            id: row.id,
            task: row.task,
            priority: row.priority.unwrap_or_default(),
            estimated_hours: row.estimated_hours.unwrap_or_default(),
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
            "task" => self.task.as_str().into(),
            "priority" => self.priority.as_str().into(),
            "estimated_hours" => self.estimated_hours.into(),
            _ => return None,
        })
    }
}

impl Deletable for BacklogItem {}
