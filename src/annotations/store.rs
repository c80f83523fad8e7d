//! Annotation store interface
//!
//! The overlay core only ever talks to an [`AnnotationStore`]. Concrete
//! stores live next to this module: in-memory, SQLite and HTTP.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{Annotation, AnnotationDraft};

/// Errors raised by any annotation store backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The store could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The caller is not allowed to perform the operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The record violates a store constraint
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// The backend failed while executing the operation
    #[error("Backend error: {0}")]
    Backend(String),

    /// A record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Serialization(err.to_string())
        } else {
            StoreError::Network(err.to_string())
        }
    }
}

impl From<chrono::ParseError> for StoreError {
    fn from(err: chrono::ParseError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Page-scoped annotation persistence
///
/// Implementations must round-trip every draft field losslessly through
/// `insert` and `list`.
#[async_trait]
pub trait AnnotationStore: Send + Sync {
    /// All annotations anchored to one page of one document (order unspecified)
    async fn list(&self, document_id: &str, page_number: u32) -> Result<Vec<Annotation>, StoreError>;

    /// Persist a draft; the store assigns the id and creation time
    async fn insert(&self, draft: AnnotationDraft) -> Result<Annotation, StoreError>;

    /// Remove an annotation by id. Deleting an unknown id succeeds.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
