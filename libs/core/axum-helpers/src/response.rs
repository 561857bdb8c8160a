//! Uniform success / failure envelope returned by every endpoint.
//!
//! ```json
//! {
//!   "success": true,
//!   "message": "Data retrieved successfully",
//!   "data": [ ... ],
//!   "meta": { "page": 1, "limit": 25, "total": 3, "totalPages": 1 },
//!   "timestamp": "2025-01-01T00:00:00.000Z"
//! }
//! ```

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Request completed successfully";

/// Either a single message or one message per failed constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Message {
    Text(String),
    List(Vec<String>),
}

impl Message {
    /// Messages joined with `", "`, for log lines.
    pub fn joined(&self) -> String {
        match self {
            Message::Text(text) => text.clone(),
            Message::List(items) => items.join(", "),
        }
    }
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Message::Text(value.to_string())
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Message::Text(value)
    }
}

impl From<Vec<String>> for Message {
    fn from(value: Vec<String>) -> Self {
        Message::List(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    /// Never below 1, even for an empty collection
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit.max(1)).max(1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
    /// RFC 3339, fixed when the envelope is built
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    fn build(
        success: bool,
        message: Option<Message>,
        data: Option<T>,
        meta: Option<PaginationMeta>,
    ) -> Self {
        Self {
            success,
            message,
            data,
            meta,
            timestamp: now_rfc3339(),
        }
    }

    pub fn ok(data: T, message: impl Into<Message>) -> Self {
        Self::build(true, Some(message.into()), Some(data), None)
    }

    pub fn ok_with_meta(data: T, meta: PaginationMeta, message: impl Into<Message>) -> Self {
        Self::build(true, Some(message.into()), Some(data), Some(meta))
    }

    /// A failure never carries `data`.
    pub fn fail(message: impl Into<Message>) -> Self {
        Self::build(false, Some(message.into()), None, None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
