//! AI Tutor annotation core
//!
//! Lightweight highlight/underline annotations over PDF pages: the pointer
//! selection model, page navigation with a page-scoped visible annotation
//! set, the create/delete flow against an injected store, and the HTTP
//! service that persists annotations.
//!
//! # Modules
//!
//! - `selection`: pointer-drag selection rectangle and creation menu
//! - `session`: current document/page and the visible annotation set
//! - `overlay`: the annotation overlay tying selection, session and store together
//! - `annotations`: annotation records and store implementations
//! - `routes`: the annotation HTTP service

pub mod annotations;
pub mod config;
pub mod db;
pub mod error;
pub mod geometry;
pub mod notification;
pub mod overlay;
pub mod routes;
pub mod selection;
pub mod session;
pub mod state;

pub use annotations::{
    Annotation, AnnotationDraft, AnnotationKind, AnnotationStore, HttpAnnotationStore,
    MemoryAnnotationStore, SqliteAnnotationStore, StoreError,
};
pub use geometry::{Point, Rect};
pub use notification::{Notification, NotificationLevel, NotificationLog, Notifier};
pub use overlay::{AnnotationOverlay, OverlayError, PendingCreate, PendingDelete};
pub use selection::{CreationMenu, SelectionEngine, SelectionError};
pub use session::{DocumentContext, DocumentSession, LoadOutcome, LoadState, PageKey, PageRequest};
