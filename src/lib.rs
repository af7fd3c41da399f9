//! Dev Tracker backend: JSON CRUD over developers, backlog items, activity log entries
//! and chat threads, stored in PostgreSQL.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod records;
pub mod routes;
pub mod seed;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use error::{AppError, ConfigError, StoreError};
pub use migration::{ensure_database_exists, ensure_tables, DatabaseStatus};
pub use records::{ActivityLogEntry, BacklogItem, ChatMessage, Developer, Record};
pub use routes::{common_routes, entity_routes, router};
pub use seed::seed_all;
pub use settings::{DatabaseSettings, Settings, CONFIG_FILE};
pub use state::AppState;
pub use store::{MemoryStore, PgStore, Store};
