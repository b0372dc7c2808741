//! API handlers for Campus Library REST endpoints

pub mod books;
pub mod borrows;
pub mod health;
pub mod openapi;
pub mod students;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts, Path},
    http::request::Parts,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Plain acknowledgement
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Acknowledgement of a created record
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i32,
}

/// Numeric `{id}` path segment.
///
/// Holds `None` when the segment is an integer outside the range of stored
/// ids, so lookups can answer "not found" instead of a plain-text rejection.
/// Segments that are not integers at all are rejected with a JSON 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub Option<i32>);

impl RecordId {
    /// Parse a raw path segment
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse::<i64>()
            .ok()
            .map(|id| RecordId(i32::try_from(id).ok()))
    }

    pub fn or_not_found(self, message: &str) -> AppResult<i32> {
        self.0.ok_or_else(|| AppError::NotFound(message.to_string()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!("Unreadable path: {}", e.body_text());
                AppError::NotFound("Resource not found".to_string())
            })?;

        RecordId::parse(&raw).ok_or_else(|| AppError::NotFound("Resource not found".to_string()))
    }
}

/// Unwrap an optional JSON body.
///
/// A missing body, or one sent without a JSON content type, reads as `None`.
/// A body that is not valid JSON, or whose values have the wrong types, is a
/// validation error.
pub(crate) fn read_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<Option<T>> {
    match body {
        Ok(Json(value)) => Ok(Some(value)),
        Err(rejection @ (JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_))) => {
            tracing::warn!("Malformed JSON body: {}", rejection.body_text());
            Err(AppError::Validation(format!(
                "Malformed JSON body: {}",
                rejection.body_text()
            )))
        }
        Err(rejection) => {
            tracing::debug!("No JSON body: {}", rejection.body_text());
            Ok(None)
        }
    }
}

/// Like [`read_body`], with a missing body read as an empty request.
///
/// Request types are all-`Option`, so their own validation then reports
/// which fields are missing.
pub(crate) fn body_or_default<T: Default>(
    body: Result<Json<T>, JsonRejection>,
) -> AppResult<T> {
    Ok(read_body(body)?.unwrap_or_default())
}
