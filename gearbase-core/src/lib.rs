//! Core types for the gearbase equipment store.
//!
//! This crate provides:
//!
//! - **Records and identities** ([`document`]) - Schemaless records keyed by an ObjectId
//! - **Store backend abstraction** ([`backend`]) - The trait MongoDB and in-memory backends implement
//! - **Filtering** ([`query`]) - Filter expressions and the visitor backends evaluate them with
//! - **Collections** ([`collection`]) - Create, list, get, update and delete against one collection
//! - **Document store** ([`store`]) - The shared, process-wide store handle
//! - **Error handling** ([`error`]) - Store error taxonomy and result type
//!
//! # Example
//!
//! ```ignore
//! use gearbase_core::store::DocumentStore;
//! use serde_json::json;
//!
//! let store = DocumentStore::new(backend);
//! let equipments = store.collection("equipments");
//!
//! let fields = json!({ "name": "Tennis Racket", "userEmail": "a@x.com" });
//! let id = equipments.insert(fields.as_object().unwrap().clone()).await?;
//! let record = equipments.get(&id.to_hex()).await?;
//! ```

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod query;
pub mod store;
