//! In-memory document storage backend for gearbase.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `StoreBackend` trait. It backs the HTTP integration tests and can serve
//! local development when no MongoDB cluster is available
//! (`STORE_BACKEND=memory`). Data does not survive a restart.
//!
//! # Quick Start
//!
//! ```ignore
//! use gearbase_core::{backend::StoreBackendBuilder, store::DocumentStore};
//! use gearbase_memory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::connect(InMemoryStore::builder()).await?;
//!     let equipments = store.collection("equipments");
//!
//!     let fields = serde_json::json!({ "name": "Ball" });
//!     let id = equipments.insert(fields.as_object().unwrap().clone()).await?;
//!     println!("inserted {id}");
//!
//!     Ok(())
//! }
//! ```

mod evaluator;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
