//! Error types and result types for document store operations.
//!
//! Every fallible store operation returns [`StoreResult<T>`]. The HTTP layer
//! maps [`StoreError::InvalidIdentity`] and [`StoreError::NotFound`] to client
//! errors and everything else to an internal error.

use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The identity string could not be parsed into an ObjectId.
    #[error("Invalid identity {0:?}: expected a 24 character hex string")]
    InvalidIdentity(String),
    /// No document matched the identity.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document {0} not found in collection {1}")]
    NotFound(String, String),
    /// A document with the given ID already exists in the collection.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document {0} already exists in collection {1}")]
    DocumentAlreadyExists(String, String),
    /// A stored document has a shape that cannot be read back as a record.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// Error during store initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;
