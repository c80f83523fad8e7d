//! Annotation module
//!
//! Page-scoped PDF annotations (highlights and underlines) and the stores
//! that persist them.
//!
//! # Stores
//!
//! - [`MemoryAnnotationStore`] - in-process map
//! - [`SqliteAnnotationStore`] - SQLite table via sqlx
//! - [`HttpAnnotationStore`] - remote annotation service

mod http;
mod memory;
mod sqlite;
mod store;
mod types;

pub use http::HttpAnnotationStore;
pub use memory::MemoryAnnotationStore;
pub use sqlite::SqliteAnnotationStore;
pub use store::{AnnotationStore, StoreError};
pub use types::{
    Annotation, AnnotationDraft, AnnotationKind, DEFAULT_HIGHLIGHT_COLOR, DEFAULT_UNDERLINE_COLOR,
};
