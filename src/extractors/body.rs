//! Decode a size-bounded request body into a record.

use crate::error::AppError;
use crate::records::{decode, Record};
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};

/// Request body decoded as `R`. Does not require a `Content-Type` header.
#[derive(Debug)]
pub struct RecordBody<R>(pub R);

#[async_trait]
impl<S, R> FromRequest<S> for RecordBody<R>
where
    S: Send + Sync,
    R: Record,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(rejection.body_text())
            } else {
                AppError::BadRequest(rejection.body_text())
            }
        })?;
        decode(&bytes).map(RecordBody)
    }
}
