use super::{EntitySchema, ListOrder, Record};
use crate::sql::BindValue;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Append-only; listed newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityLogEntry {
    #[serde(skip_deserializing)]
    pub id: i32,
    #[serde(skip_deserializing)]
    pub date: Option<NaiveDateTime>,
    pub name: String,
    pub task_type: String,
    pub task_name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ActivityLogRow {
    pub id: i32,
    pub date: Option<NaiveDateTime>,
    pub name: String,
    pub task_type: Option<String>,
    pub task_name: Option<String>,
    #[sqlx(rename = "type")]
    pub kind: Option<String>,
}

impl Record for ActivityLogEntry {
    type Row = ActivityLogRow;

    const SCHEMA: &'static EntitySchema = &EntitySchema {
        table: "activity_log",
        id_column: "id",
        columns: &["name", "task_type", "task_name", "type"],
        stamp_column: "date",
        order: ListOrder {
            column: "date",
            descending: true,
        },
        ddl: r#"
            CREATE TABLE IF NOT EXISTS activity_log (
                id SERIAL PRIMARY KEY,
                date TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                name VARCHAR(100) NOT NULL,
                task_type VARCHAR(50),
                task_name TEXT,
                type VARCHAR(20) DEFAULT 'completion'
            )
        "#,
    };

    fn from_row(row: ActivityLogRow) -> Self {
        ActivityLogEntry {
            id: row.id,
            date: row.date,
            name: row.name,
            task_type: row.task_type.unwrap_or_default(),
            task_name: row.task_name.unwrap_or_default(),
            kind: row.kind.unwrap_or_default(),
        }
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn stamped_at(&self) -> Option<NaiveDateTime> {
        self.date
    }

    fn stamp(&mut self, at: Option<NaiveDateTime>) {
        self.date = at;
    }

    fn field(&self, column: &str) -> Option<BindValue> {
        Some(match column {
            "name" => self.name.as_str().into(),
            "task_type" => self.task_type.as_str().into(),
            "task_name" => self.task_name.as_str().into(),
            "type" => self.kind.as_str().into(),
            _ => return None,
        })
    }
}
