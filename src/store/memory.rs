//! In-process store with the same ordering and id semantics as the PostgreSQL tables.

use super::{RecordDelete, RecordStore, RecordUpdate, Store};
use crate::error::StoreError;
use crate::records::{Deletable, Record, Updatable};
use crate::sql::Filter;
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use std::any::Any;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    offline: AtomicBool,
}

#[derive(Default)]
struct State {
    tables: HashMap<&'static str, Table>,
    clock: Option<NaiveDateTime>,
}

#[derive(Default)]
struct Table {
    last_id: i32,
    rows: Vec<Box<dyn Any + Send>>,
}

impl State {
    /// Wall clock, nudged forward so stamps strictly increase across inserts.
    fn tick(&mut self) -> NaiveDateTime {
        let now = Utc::now().naive_utc();
        let next = match self.clock {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.clock = Some(next);
        next
    }

    fn table<R: Record>(&mut self) -> &mut Table {
        self.tables.entry(R::SCHEMA.table).or_default()
    }

    fn records<R: Record>(&self) -> impl Iterator<Item = &R> {
        self.tables
            .get(R::SCHEMA.table)
            .into_iter()
            .flat_map(|t| t.rows.iter())
            .filter_map(|row| row.downcast_ref::<R>())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    /// Rows of one record type in insertion order.
    pub fn rows<R: Record>(&self) -> Vec<R> {
        self.lock().records::<R>().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(self.lock())
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for MemoryStore {
    async fn list(&self, filters: &[Filter]) -> Result<Vec<R>, StoreError> {
        let mut rows: Vec<R> = self
            .state()?
            .records::<R>()
            .filter(|r| {
                filters
                    .iter()
                    .all(|f| r.value(f.column).as_ref() == Some(&f.value))
            })
            .cloned()
            .collect();
        let order = R::SCHEMA.order;
        rows.sort_by(|a, b| {
            let ord = a
                .value(order.column)
                .partial_cmp(&b.value(order.column))
                .unwrap_or(Ordering::Equal);
            if order.descending {
                ord.reverse()
            } else {
                ord
            }
        });
        Ok(rows)
    }

    async fn insert(&self, mut record: R) -> Result<R, StoreError> {
        let mut state = self.state()?;
        let stamped_at = state.tick();
        let table = state.table::<R>();
        table.last_id += 1;
        record.set_id(table.last_id);
        record.stamp(Some(stamped_at));
        table.rows.push(Box::new(record.clone()));
        Ok(record)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.state()?.records::<R>().count() as i64)
    }
}

#[async_trait]
impl<R: Updatable> RecordUpdate<R> for MemoryStore {
    async fn update(&self, id: i32, record: &R) -> Result<u64, StoreError> {
        let mut state = self.state()?;
        let existing = state
            .table::<R>()
            .rows
            .iter_mut()
            .filter_map(|row| row.downcast_mut::<R>())
            .find(|r| r.id() == id);
        let Some(existing) = existing else {
            return Ok(0);
        };
        let stamped_at = existing.stamped_at();
        *existing = record.clone();
        existing.set_id(id);
        existing.stamp(stamped_at);
        Ok(1)
    }
}

#[async_trait]
impl<R: Deletable> RecordDelete<R> for MemoryStore {
    async fn delete(&self, id: i32) -> Result<u64, StoreError> {
        let mut state = self.state()?;
        let table = state.table::<R>();
        let before = table.rows.len();
        table
            .rows
            .retain(|row| row.downcast_ref::<R>().map(|r| r.id() != id).unwrap_or(true));
        Ok((before - table.rows.len()) as u64)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.state().map(|_| ())
    }
}
