//! HTTP API for sports equipment records.
//!
//! The router exposes create/list/get/update/delete over a single
//! `equipments` collection, plus a greeting at `/` and liveness/readiness
//! checks under `/health`. Store access goes through
//! [`gearbase`](gearbase), so the same router runs against MongoDB in
//! production and the in-memory backend in tests.
//!
//! # Example
//!
//! ```no_run
//! use gearbase::{memory::InMemoryStore, store::DocumentStore};
//! use gearbase_server::{app, state::AppState};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = DocumentStore::connect(InMemoryStore::builder()).await?;
//! let router = app(AppState::from(store));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod routes;
pub mod state;

use std::future::Future;

use axum::{Router, routing::get};
use gearbase::store::DocumentStore;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{error::ServeError, state::AppState};

/// Builds the full router with CORS and request tracing applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::greeting))
        .route(
            "/equipments",
            get(routes::list_equipment).post(routes::create_equipment),
        )
        .route(
            "/equipments/{id}",
            get(routes::get_equipment)
                .put(routes::update_equipment)
                .delete(routes::delete_equipment),
        )
        .route("/health/live", get(health::health_live))
        .route("/health/ready", get(health::health_ready))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on `listener` until `shutdown` resolves, then closes the
/// store. The store is closed even when serving fails.
pub async fn serve(
    listener: TcpListener,
    store: DocumentStore,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServeError> {
    let served = axum::serve(listener, app(AppState::from(store.clone())))
        .with_graceful_shutdown(shutdown)
        .await;

    if let Err(e) = &served {
        tracing::error!(error = %e, "server stopped unexpectedly");
    }

    tracing::info!("shutting down");
    let closed = store.shutdown().await;

    served?;
    closed?;

    Ok(())
}
