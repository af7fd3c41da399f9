//! Column values that sqlx can bind.

use chrono::NaiveDateTime;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A value bound to a PostgreSQL parameter. Each variant reports its own wire type.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub enum BindValue {
    Int(i32),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl From<i32> for BindValue {
    fn from(n: i32) -> Self {
        BindValue::Int(n)
    }
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::Text(s.to_string())
    }
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        BindValue::Text(s)
    }
}

impl From<NaiveDateTime> for BindValue {
    fn from(d: NaiveDateTime) -> Self {
        BindValue::Timestamp(d)
    }
}

impl<'q> Encode<'q, Postgres> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            BindValue::Int(n) => <i32 as Encode<Postgres>>::encode_by_ref(n, buf),
            BindValue::Text(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)
            }
            BindValue::Timestamp(d) => <NaiveDateTime as Encode<Postgres>>::encode_by_ref(d, buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            BindValue::Int(_) => PgTypeInfo::with_name("INT4"),
            BindValue::Text(_) => PgTypeInfo::with_name("TEXT"),
            BindValue::Timestamp(_) => PgTypeInfo::with_name("TIMESTAMP"),
        })
    }
}

impl sqlx::Type<Postgres> for BindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

/// Equality filter on one column.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: BindValue,
}

impl Filter {
    pub fn eq(column: &'static str, value: impl Into<BindValue>) -> Self {
        Filter {
            column,
            value: value.into(),
        }
    }
}
