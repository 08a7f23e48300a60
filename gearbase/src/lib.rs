//! Main gearbase crate providing a unified interface to the equipment store.
//!
//! This crate re-exports the core types and the available storage backends,
//! so applications depend on one crate and pick a backend at startup.
//!
//! # Quick Start
//!
//! ```ignore
//! use gearbase::{prelude::*, memory::InMemoryStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> StoreResult<()> {
//!     let store = DocumentStore::connect(InMemoryStore::builder()).await?;
//!     let equipments = store.collection("equipments");
//!
//!     let fields = json!({ "name": "Tennis Racket", "userEmail": "a@x.com" });
//!     let id = equipments.insert(fields.as_object().unwrap().clone()).await?;
//!
//!     let mine = equipments
//!         .find(Some(Filter::eq("userEmail", "a@x.com")))
//!         .await?;
//!     assert_eq!(mine[0].id(), &id);
//!
//!     store.shutdown().await
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires `mongodb` feature)

pub mod prelude;

pub use gearbase_core::{backend, collection, document, error, query, store};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use gearbase_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use gearbase_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
