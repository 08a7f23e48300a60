//! Greeting and health check handlers.
//!
//! `/health/live` answers as long as the process serves requests.
//! `/health/ready` additionally pings the store and answers 503 when it is
//! unreachable.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::state::AppState;

pub const GREETING: &str = "Welcome to the Sports Equipment API!";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HealthStatus {
    /// `ok`, or `not_ready: <reason>`.
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn not_ready(reason: &str) -> Self {
        Self {
            status: format!("not_ready: {reason}"),
            ..Self::ok()
        }
    }
}

pub async fn greeting() -> &'static str {
    GREETING
}

pub async fn health_live() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthStatus::ok()))
}

pub async fn health_ready(State(state): State<AppState>) -> Response {
    match state.store().ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthStatus::ok())).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "store ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus::not_ready("store unreachable")),
            )
                .into_response()
        }
    }
}
