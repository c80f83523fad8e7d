//! Application state management

use std::sync::Arc;

use crate::annotations::SqliteAnnotationStore;
use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    annotations: SqliteAnnotationStore,
}

impl AppState {
    pub fn new(config: Config, annotations: SqliteAnnotationStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                annotations,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the annotation store
    pub fn annotations(&self) -> &SqliteAnnotationStore {
        &self.inner.annotations
    }
}
