//! HTTP error responses.
//!
//! Every failing handler returns an [`ApiError`], rendered as a JSON body of
//! the form `{"message": ..., "error": ...}`:
//!
//! | cause                       | status | message                          |
//! |-----------------------------|--------|----------------------------------|
//! | malformed identity          | 400    | `Invalid equipment id`           |
//! | unreadable request body     | 400    | `Invalid request body`           |
//! | unparseable query string    | 400    | `Invalid query string`           |
//! | no document with identity   | 404    | `Equipment not found` (no error) |
//! | any other store failure     | 500    | per-operation failure message    |

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gearbase::error::StoreError;
use serde::Serialize;
use thiserror::Error;

/// The record operation a request was performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Fetch,
    Update,
    Delete,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Add => "Failed to add equipment",
            Operation::Fetch => "Failed to fetch equipment",
            Operation::Update => "Failed to update equipment",
            Operation::Delete => "Failed to delete equipment",
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}: {source}", .operation.failure_message())]
    Store {
        operation: Operation,
        #[source]
        source: StoreError,
    },
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("Invalid query string: {0}")]
    InvalidQuery(String),
}

/// Failure of [`serve`](crate::serve), from the listener or from closing the store.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store shutdown failed: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Returns a closure for `map_err` that tags a store error with `operation`.
    pub fn during(operation: Operation) -> impl FnOnce(StoreError) -> Self {
        move |source| ApiError::Store { operation, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store { source, .. } => match source {
                StoreError::InvalidIdentity(_) => StatusCode::BAD_REQUEST,
                StoreError::NotFound(..) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::InvalidBody(_) | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Store { operation, source } => match source {
                StoreError::InvalidIdentity(_) => ErrorBody {
                    message: "Invalid equipment id".to_string(),
                    error: Some(source.to_string()),
                },
                StoreError::NotFound(..) => ErrorBody {
                    message: "Equipment not found".to_string(),
                    error: None,
                },
                _ => ErrorBody {
                    message: operation.failure_message().to_string(),
                    error: Some(source.to_string()),
                },
            },
            ApiError::InvalidBody(detail) => ErrorBody {
                message: "Invalid request body".to_string(),
                error: Some(detail.clone()),
            },
            ApiError::InvalidQuery(detail) => ErrorBody {
                message: "Invalid query string".to_string(),
                error: Some(detail.clone()),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}
