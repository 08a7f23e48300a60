//! MongoDB backend implementation for gearbase.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend`
//! trait. It is the production backend of the equipment service.
//!
//! To use this backend through the facade crate, enable the `mongodb` feature:
//!
//! ```toml
//! [dependencies]
//! gearbase = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Features
//!
//! - **Persistent storage** - Data lives in MongoDB Atlas or a self-hosted MongoDB
//! - **Stable API** - The client pins Stable API v1 in strict mode
//! - **Safe keys** - Caller-supplied keys with `.`, `$` or NUL are escaped on write
//!   and restored on read
//! - **Async/await** - Built on MongoDB's async driver, whose client pools connections
//!
//! # Example
//!
//! ```ignore
//! use gearbase_core::{store::DocumentStore};
//! use gearbase_mongodb::MongoDbStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::connect(
//!         MongoDbStore::builder("mongodb://localhost:27017", "sportsEquipmentDB"),
//!     )
//!     .await?;
//!     store.ping().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod store;
mod query;
mod sanitizer;

#[cfg(test)]
mod key_round_trip;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
