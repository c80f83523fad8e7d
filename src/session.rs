//! Document session and page navigation
//!
//! Tracks which page of which document is on screen and owns the visible
//! annotation set for that page. Reads are split into a [`PageRequest`]
//! issued on navigation and a later [`DocumentSession::apply_page`] with the
//! store's answer, so several reads can be in flight at once.
//!
//! Every request takes the next value of a generation counter. A response is
//! only applied when its generation is the latest one issued, so a slow read
//! for a page the user already left can never overwrite the current view.

use crate::annotations::{Annotation, StoreError};

/// Resolved document the viewer is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    pub document_id: String,
    /// Location the render layer loads the PDF from
    pub pdf_source: String,
    pub page_count: u32,
}

impl DocumentContext {
    pub fn new(document_id: impl Into<String>, pdf_source: impl Into<String>, page_count: u32) -> Self {
        Self {
            document_id: document_id.into(),
            pdf_source: pdf_source.into(),
            page_count,
        }
    }
}

/// Identity of one document page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub document_id: String,
    pub page_number: u32,
}

/// An issued annotation read, to be answered through `apply_page`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub key: PageKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle { page: u32 },
    Loading { page: u32, generation: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Response matched the latest request and now backs the visible set
    Applied { count: usize },
    /// Response matched the latest request but the read failed; the visible set is empty
    Failed(StoreError),
    /// Response belonged to a superseded request and was dropped
    Discarded { generation: u64, latest: u64 },
}

/// Clamp a requested page into `[1, page_count]`
pub fn clamp_page(requested: i64, page_count: u32) -> u32 {
    let last = i64::from(page_count.max(1));
    requested.clamp(1, last) as u32
}

#[derive(Debug)]
pub struct DocumentSession {
    document: DocumentContext,
    current_page: u32,
    generation: u64,
    state: LoadState,
    visible: Vec<Annotation>,
}

impl DocumentSession {
    pub fn new(document: DocumentContext) -> Self {
        Self {
            document,
            current_page: 1,
            generation: 0,
            state: LoadState::Idle { page: 1 },
            visible: Vec::new(),
        }
    }

    pub fn document(&self) -> &DocumentContext {
        &self.document
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_count(&self) -> u32 {
        self.document.page_count
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading { .. })
    }

    pub fn visible(&self) -> &[Annotation] {
        &self.visible
    }

    pub fn contains(&self, id: &str) -> bool {
        self.visible.iter().any(|a| a.id == id)
    }

    pub fn current_key(&self) -> PageKey {
        PageKey {
            document_id: self.document.document_id.clone(),
            page_number: self.current_page,
        }
    }

    pub fn is_current(&self, key: &PageKey) -> bool {
        key.document_id == self.document.document_id && key.page_number == self.current_page
    }

    /// Navigate to a page (clamped) and issue a fresh read for it.
    pub fn go_to_page(&mut self, requested: i64) -> PageRequest {
        let page = clamp_page(requested, self.document.page_count);
        if i64::from(page) != requested {
            tracing::debug!(requested, page, "page request clamped");
        }
        self.current_page = page;
        self.reload()
    }

    pub fn next_page(&mut self) -> PageRequest {
        self.go_to_page(i64::from(self.current_page) + 1)
    }

    pub fn previous_page(&mut self) -> PageRequest {
        self.go_to_page(i64::from(self.current_page) - 1)
    }

    /// Switch to another document, starting at its first page.
    pub fn open_document(&mut self, document: DocumentContext) -> PageRequest {
        tracing::info!(document_id = %document.document_id, pages = document.page_count, "opening document");
        self.document = document;
        self.current_page = 1;
        self.reload()
    }

    /// Invalidate the visible set and issue a read for the current page.
    pub fn reload(&mut self) -> PageRequest {
        self.generation += 1;
        self.visible.clear();
        self.state = LoadState::Loading {
            page: self.current_page,
            generation: self.generation,
        };

        let request = PageRequest {
            generation: self.generation,
            key: self.current_key(),
        };
        tracing::debug!(
            generation = request.generation,
            document_id = %request.key.document_id,
            page = request.key.page_number,
            "annotation read issued"
        );
        request
    }

    /// Apply the store's answer to a previously issued read.
    pub fn apply_page(
        &mut self,
        request: &PageRequest,
        result: Result<Vec<Annotation>, StoreError>,
    ) -> LoadOutcome {
        if request.generation != self.generation {
            tracing::debug!(
                generation = request.generation,
                latest = self.generation,
                page = request.key.page_number,
                "stale annotation read discarded"
            );
            return LoadOutcome::Discarded {
                generation: request.generation,
                latest: self.generation,
            };
        }

        self.state = LoadState::Idle {
            page: self.current_page,
        };

        match result {
            Ok(annotations) => {
                self.visible = annotations
                    .into_iter()
                    .filter(|a| a.is_on(&request.key.document_id, request.key.page_number))
                    .collect();
                LoadOutcome::Applied {
                    count: self.visible.len(),
                }
            }
            Err(err) => {
                self.visible.clear();
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Add a store-confirmed record if it belongs to the page on screen.
    pub fn push_confirmed(&mut self, annotation: Annotation) -> bool {
        if !annotation.is_on(&self.document.document_id, self.current_page) {
            return false;
        }
        if self.contains(&annotation.id) {
            return true;
        }
        self.visible.push(annotation);
        true
    }

    /// Remove a record by id after the store confirmed the delete.
    pub fn remove(&mut self, id: &str) -> Option<Annotation> {
        let index = self.visible.iter().position(|a| a.id == id)?;
        Some(self.visible.remove(index))
    }
}
