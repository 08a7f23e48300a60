//! Sports equipment HTTP service.
//!
//! # Endpoints
//!
//! - `POST /equipments` - Add an equipment record
//! - `GET /equipments?userEmail=` - List records, optionally for one owner
//! - `GET|PUT|DELETE /equipments/{id}` - Read, partially update, or remove a record
//! - `GET /` - Greeting
//! - `GET /health/live`, `GET /health/ready` - Health checks
//!
//! # Configuration
//!
//! - `DB_USER`, `DB_PASS` - MongoDB credentials
//! - `PORT` - HTTP port (default: 5000)
//! - `STORE_BACKEND` - `mongodb` (default) or `memory`
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - `json` (default) or `text`
//!
//! Variables missing from the process environment are read from a `.env`
//! file when one is found.

use std::net::SocketAddr;

use tracing::{error, info};

use gearbase_server::{
    config::{COLLECTION_NAME, DATABASE_NAME, Environment, ServerConfig},
    logging::{LoggingConfig, init_logging},
    serve,
    state::open_store,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let environment = Environment::load()?;
    init_logging(&LoggingConfig::from_lookup(|key| environment.get(key)));

    let config = ServerConfig::from_environment(&environment).map_err(|e| {
        error!(error = %e, "invalid configuration");
        e
    })?;

    info!(
        env_file_vars = environment.file_vars(),
        backend = config.store.backend_name(),
        database = DATABASE_NAME,
        collection = COLLECTION_NAME,
        port = config.port,
        "starting equipment service"
    );

    let store = open_store(&config.store).await.map_err(|e| {
        error!(error = %e, "failed to create store client");
        e
    })?;

    store.ping().await.map_err(|e| {
        error!(error = %e, "store is unreachable");
        e
    })?;

    info!(backend = config.store.backend_name(), "connected to store");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "listening on");

    serve(listener, store, shutdown_signal()).await?;

    Ok(())
}

/// Resolves on Ctrl-C, or on SIGTERM where the platform has it.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
