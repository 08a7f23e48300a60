//! Convenient re-exports of commonly used types from gearbase.
//!
//! ```ignore
//! use gearbase::prelude::*;
//! ```

pub use gearbase_core::{
    backend::{StoreBackend, StoreBackendBuilder, UpdateOutcome},
    collection::Collection,
    document::{DocumentId, Record},
    error::{StoreError, StoreResult},
    query::{Expr, Filter},
    store::DocumentStore,
};
