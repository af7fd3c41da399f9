//! Record handlers: list, create, update, delete, plus the per-thread chat listing.
//! Each issues exactly one store statement.

use crate::error::AppError;
use crate::extractors::RecordBody;
use crate::records::{ChatMessage, Deletable, Record, Updatable};
use crate::sql::Filter;
use crate::state::AppState;
use crate::store::{RecordDelete, RecordStore, RecordUpdate};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

fn parse_id(id_str: &str) -> Result<i32, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

pub async fn list<S, R>(State(state): State<AppState<S>>) -> Result<Json<Vec<R>>, AppError>
where
    S: RecordStore<R>,
    R: Record,
{
    let rows = state.store.list(&[]).await?;
    Ok(Json(rows))
}

pub async fn list_thread<S>(
    State(state): State<AppState<S>>,
    Path(chat_key): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError>
where
    S: RecordStore<ChatMessage>,
{
    let rows = state
        .store
        .list(&[Filter::eq(ChatMessage::THREAD_KEY, chat_key)])
        .await?;
    Ok(Json(rows))
}

pub async fn create<S, R>(
    State(state): State<AppState<S>>,
    RecordBody(record): RecordBody<R>,
) -> Result<(StatusCode, Json<R>), AppError>
where
    S: RecordStore<R>,
    R: Record,
{
    let created = state.store.insert(record).await?;
    tracing::info!(table = R::SCHEMA.table, id = created.id(), "record created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Full replacement by id. An id matching no row still answers 200 with the payload.
pub async fn update<S, R>(
    State(state): State<AppState<S>>,
    Path(id_str): Path<String>,
    RecordBody(mut record): RecordBody<R>,
) -> Result<Json<R>, AppError>
where
    S: RecordUpdate<R>,
    R: Updatable,
{
    let id = parse_id(&id_str)?;
    let affected = state.store.update(id, &record).await?;
    if affected == 0 {
        tracing::debug!(table = R::SCHEMA.table, id, "update matched no row");
    }
    record.set_id(id);
    Ok(Json(record))
}

/// Delete by id. Answers 204 whether or not the row existed.
pub async fn delete<S, R>(
    State(state): State<AppState<S>>,
    Path(id_str): Path<String>,
) -> Result<StatusCode, AppError>
where
    S: RecordDelete<R>,
    R: Deletable,
{
    let id = parse_id(&id_str)?;
    let affected = state.store.delete(id).await?;
    tracing::info!(table = R::SCHEMA.table, id, affected, "record deleted");
    Ok(StatusCode::NO_CONTENT)
}
