//! PostgreSQL store: one statement per call against the shared pool.

use super::{RecordDelete, RecordStore, RecordUpdate, Store};
use crate::error::StoreError;
use crate::records::{Deletable, Record, Updatable};
use crate::settings::DatabaseSettings;
use crate::sql::{self, Filter, QueryBuf};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    /// Open the process-wide pool on the target database.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_with(settings.connect_options())
            .await?;
        Ok(PgStore { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn execute(&self, q: QueryBuf) -> Result<u64, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let mut query = sqlx::query(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for PgStore {
    async fn list(&self, filters: &[Filter]) -> Result<Vec<R>, StoreError> {
        let q = sql::select_list(R::SCHEMA, filters);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, R::Row>(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(R::from_row).collect())
    }

    async fn insert(&self, mut record: R) -> Result<R, StoreError> {
        let q = sql::insert(R::SCHEMA, record.values());
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, (i32, Option<NaiveDateTime>)>(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        let (id, stamped_at) = query.fetch_one(&self.pool).await?;
        record.set_id(id);
        record.stamp(stamped_at);
        Ok(record)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let sql = sql::count(R::SCHEMA);
        tracing::debug!(sql = %sql, "query");
        let n: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(n)
    }
}

#[async_trait]
impl<R: Updatable> RecordUpdate<R> for PgStore {
    async fn update(&self, id: i32, record: &R) -> Result<u64, StoreError> {
        self.execute(sql::update(R::SCHEMA, id, record.values())).await
    }
}

#[async_trait]
impl<R: Deletable> RecordDelete<R> for PgStore {
    async fn delete(&self, id: i32) -> Result<u64, StoreError> {
        self.execute(sql::delete(R::SCHEMA, id)).await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
