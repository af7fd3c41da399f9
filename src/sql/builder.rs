//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from an entity schema.

use crate::records::EntitySchema;
use crate::sql::{BindValue, Filter};

/// Quote identifier for PostgreSQL (safe: only from static schemas).
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// id, writable columns, then the server-set timestamp.
fn select_column_list(schema: &EntitySchema) -> String {
    std::iter::once(schema.id_column)
        .chain(schema.columns.iter().copied())
        .chain(std::iter::once(schema.stamp_column))
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT all columns with equality filters, in the schema's list order.
pub fn select_list(schema: &EntitySchema, filters: &[Filter]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_parts: Vec<String> = filters
        .iter()
        .map(|f| {
            let n = q.push_param(f.value.clone());
            format!("{} = ${}", quoted(f.column), n)
        })
        .collect();
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    let direction = if schema.order.descending { "DESC" } else { "ASC" };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {} {}",
        select_column_list(schema),
        quoted(schema.table),
        where_clause,
        quoted(schema.order.column),
        direction
    );
    q
}

/// INSERT writable columns; returns the generated id and the server-set timestamp.
pub fn insert(schema: &EntitySchema, values: Vec<BindValue>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let placeholders: Vec<String> = values
        .into_iter()
        .map(|v| format!("${}", q.push_param(v)))
        .collect();
    let cols: Vec<String> = schema.columns.iter().map(|c| quoted(c)).collect();
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}, {}",
        quoted(schema.table),
        cols.join(", "),
        placeholders.join(", "),
        quoted(schema.id_column),
        quoted(schema.stamp_column)
    );
    q
}

/// Full-row UPDATE by id. The server-set timestamp is left untouched.
pub fn update(schema: &EntitySchema, id: i32, values: Vec<BindValue>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let sets: Vec<String> = schema
        .columns
        .iter()
        .zip(values)
        .map(|(c, v)| format!("{} = ${}", quoted(c), q.push_param(v)))
        .collect();
    let id_param = q.push_param(BindValue::Int(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        quoted(schema.table),
        sets.join(", "),
        quoted(schema.id_column),
        id_param
    );
    q
}

/// DELETE by id.
pub fn delete(schema: &EntitySchema, id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let id_param = q.push_param(BindValue::Int(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}",
        quoted(schema.table),
        quoted(schema.id_column),
        id_param
    );
    q
}

pub fn count(schema: &EntitySchema) -> String {
    format!("SELECT COUNT(*) FROM {}", quoted(schema.table))
}
