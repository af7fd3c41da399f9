//! Sample rows loaded into empty tables at startup.

use crate::records::{ActivityLogEntry, BacklogItem, Developer, Record};
use crate::store::{RecordStore, Store};

/// Seed every table that is still empty. Failures are logged, never returned.
pub async fn seed_all<S: Store>(store: &S) {
    seed(store, sample_developers()).await;
    seed(store, sample_backlog()).await;
    seed(store, sample_activity()).await;
}

/// Insert `rows` only if the table has none. Returns the number inserted.
pub async fn seed<S, R>(store: &S, rows: Vec<R>) -> usize
where
    S: RecordStore<R>,
    R: Record,
{
    let table = R::SCHEMA.table;
    match store.count().await {
        Ok(0) => {}
        Ok(existing) => {
            tracing::info!(table, existing, "table has rows, skipping seed");
            return 0;
        }
        Err(e) => {
            tracing::warn!(table, error = %e, "could not count rows, skipping seed");
            return 0;
        }
    }
    let mut inserted = 0;
    for row in rows {
        match store.insert(row).await {
            Ok(_) => inserted += 1,
            Err(e) => tracing::warn!(table, error = %e, "seed row failed"),
        }
    }
    tracing::info!(table, inserted, "sample rows inserted");
    inserted
}

fn developer(
    name: &str,
    img: u8,
    quick_fix: &str,
    primary: &str,
    secondary: &str,
    status: &str,
    done: i32,
) -> Developer {
    Developer {
        name: name.into(),
        avatar: format!("https://i.pravatar.cc/40?img={}", img),
        done,
        quick_fix: quick_fix.into(),
        primary: primary.into(),
        secondary: secondary.into(),
        status: status.into(),
        ..Developer::default()
    }
}

pub fn sample_developers() -> Vec<Developer> {
    vec![
        developer("Jane", 1, "Login bug", "Refactor Auth", "Optimize DB", "active", 7),
        developer("Mike", 2, "UI glitch", "Build API", "Write tests", "active", 3),
        developer("Sara", 3, "Navbar flicker", "New dashboard", "Clean CSS", "busy", 5),
        developer("Liam", 4, "404 page issue", "Deploy flow", "Docker cleanup", "active", 2),
    ]
}

pub fn sample_backlog() -> Vec<BacklogItem> {
    [
        ("Fix dark mode", "medium", 4),
        ("Style guide", "low", 8),
        ("Audit logging", "high", 6),
        ("User search", "medium", 3),
    ]
    .into_iter()
    .map(|(task, priority, estimated_hours)| BacklogItem {
        task: task.into(),
        priority: priority.into(),
        estimated_hours,
        ..BacklogItem::default()
    })
    .collect()
}

pub fn sample_activity() -> Vec<ActivityLogEntry> {
    [
        ("System", "setup", "Database initialized", "system"),
        ("Jane", "completion", "Login bug", "completion"),
        ("Mike", "completion", "UI glitch", "completion"),
    ]
    .into_iter()
    .map(|(name, task_type, task_name, kind)| ActivityLogEntry {
        name: name.into(),
        task_type: task_type.into(),
        task_name: task_name.into(),
        kind: kind.into(),
        ..ActivityLogEntry::default()
    })
    .collect()
}
