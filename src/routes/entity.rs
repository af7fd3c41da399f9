//! Record routes. Update and delete are mounted only for records that support them.

use crate::handlers::entity::{create, delete as delete_handler, list, list_thread, update};
use crate::records::{ActivityLogEntry, BacklogItem, ChatMessage, Developer};
use crate::state::AppState;
use crate::store::Store;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn entity_routes<S: Store>(state: AppState<S>) -> Router {
    Router::new()
        .route(
            "/developers",
            get(list::<S, Developer>).post(create::<S, Developer>),
        )
        .route("/developers/:id", put(update::<S, Developer>))
        .route(
            "/backlog",
            get(list::<S, BacklogItem>).post(create::<S, BacklogItem>),
        )
        .route("/backlog/:id", delete(delete_handler::<S, BacklogItem>))
        .route(
            "/activity-log",
            get(list::<S, ActivityLogEntry>).post(create::<S, ActivityLogEntry>),
        )
        .route("/chat-threads", post(create::<S, ChatMessage>))
        .route("/chat-threads/:chat_key", get(list_thread::<S>))
        .with_state(state)
}
