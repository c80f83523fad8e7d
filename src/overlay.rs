//! Annotation overlay for a PDF viewer
//!
//! Wires the [`SelectionEngine`], the [`DocumentSession`] and an injected
//! [`AnnotationStore`] together. Store mutations are two-phase: `begin_*`
//! validates local state and produces a pending operation, `settle_*`
//! applies the store's answer. The async helpers run both phases back to
//! back; an event loop that wants several operations in flight can drive
//! the phases itself.

use std::sync::Arc;

use thiserror::Error;

use crate::annotations::{Annotation, AnnotationDraft, AnnotationKind, AnnotationStore, StoreError};
use crate::geometry::{Point, Rect};
use crate::notification::{Notification, Notifier};
use crate::selection::{CreationMenu, SelectionEngine, SelectionError};
use crate::session::{DocumentContext, DocumentSession, LoadOutcome, PageKey, PageRequest};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverlayError {
    #[error("no finalized selection to annotate")]
    NoSelection,
    #[error("annotation {0} is not a confirmed annotation on this page")]
    UnknownAnnotation(String),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Insert handed to the store, waiting for its answer
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCreate {
    pub draft: AnnotationDraft,
    pub target: PageKey,
    /// Selection the insert was built from
    pub rect: Rect,
}

/// Delete handed to the store, waiting for its answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: String,
}

pub struct AnnotationOverlay {
    store: Arc<dyn AnnotationStore>,
    notifier: Arc<dyn Notifier>,
    session: DocumentSession,
    selection: SelectionEngine,
}

impl AnnotationOverlay {
    pub fn new(
        document: DocumentContext,
        store: Arc<dyn AnnotationStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            notifier,
            session: DocumentSession::new(document),
            selection: SelectionEngine::new(),
        }
    }

    pub fn session(&self) -> &DocumentSession {
        &self.session
    }

    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    pub fn visible(&self) -> &[Annotation] {
        self.session.visible()
    }

    // ------------------------------------------------------------------
    // Pointer gestures
    // ------------------------------------------------------------------

    pub fn set_annotation_mode(&mut self, enabled: bool) {
        self.selection.set_annotation_mode(enabled);
    }

    pub fn pointer_down(&mut self, point: Point) -> Result<(), SelectionError> {
        self.selection.begin_selection(point)
    }

    pub fn pointer_move(&mut self, point: Point) -> Result<Rect, SelectionError> {
        self.selection.update_selection(point)
    }

    pub fn pointer_up(&mut self, point: Point) -> Result<Option<CreationMenu>, SelectionError> {
        self.selection.end_selection(point)
    }

    pub fn dismiss_menu(&mut self) {
        self.selection.dismiss_menu();
    }

    // ------------------------------------------------------------------
    // Page navigation
    // ------------------------------------------------------------------

    /// Issue a read for a page without waiting for it.
    pub fn request_page(&mut self, page: i64) -> PageRequest {
        self.session.go_to_page(page)
    }

    /// Apply a read's result; failures become notifications.
    pub fn apply_page(
        &mut self,
        request: &PageRequest,
        result: Result<Vec<Annotation>, StoreError>,
    ) -> LoadOutcome {
        let outcome = self.session.apply_page(request, result);
        if let LoadOutcome::Failed(err) = &outcome {
            tracing::error!(page = request.key.page_number, error = %err, "failed to load annotations");
            self.notifier
                .notify(Notification::error(format!("Failed to load annotations: {}", err)));
        }
        outcome
    }

    async fn load(&mut self, request: PageRequest) -> LoadOutcome {
        let result = self
            .store
            .list(&request.key.document_id, request.key.page_number)
            .await;
        self.apply_page(&request, result)
    }

    pub async fn go_to_page(&mut self, page: i64) -> LoadOutcome {
        let request = self.session.go_to_page(page);
        self.load(request).await
    }

    pub async fn next_page(&mut self) -> LoadOutcome {
        let request = self.session.next_page();
        self.load(request).await
    }

    pub async fn previous_page(&mut self) -> LoadOutcome {
        let request = self.session.previous_page();
        self.load(request).await
    }

    pub async fn reload(&mut self) -> LoadOutcome {
        let request = self.session.reload();
        self.load(request).await
    }

    /// Show another document. Any selection on the old one is dropped.
    pub async fn open_document(&mut self, document: DocumentContext) -> LoadOutcome {
        self.selection.clear();
        let request = self.session.open_document(document);
        self.load(request).await
    }

    // ------------------------------------------------------------------
    // Creation flow
    // ------------------------------------------------------------------

    /// Build the insert for the finalized selection.
    pub fn begin_create(
        &self,
        kind: AnnotationKind,
        color: Option<&str>,
        text_content: Option<&str>,
    ) -> Result<PendingCreate, OverlayError> {
        let rect = self
            .selection
            .finalized_rect()
            .ok_or(OverlayError::NoSelection)?;
        let target = self.session.current_key();

        let mut draft = AnnotationDraft::new(
            target.document_id.clone(),
            target.page_number,
            kind,
            color.unwrap_or_else(|| kind.default_color()),
            rect,
        );
        draft.text_content = text_content.map(str::to_string);

        Ok(PendingCreate {
            draft,
            target,
            rect,
        })
    }

    /// Apply the store's answer to an insert.
    ///
    /// On success the record joins the visible set if its page is still on
    /// screen, and the selection is cleared when it is still the one the
    /// insert was built from. On failure nothing local changes.
    pub fn settle_create(
        &mut self,
        pending: PendingCreate,
        result: Result<Annotation, StoreError>,
    ) -> Result<Annotation, OverlayError> {
        match result {
            Ok(annotation) => {
                tracing::info!(
                    id = %annotation.id,
                    kind = %annotation.kind,
                    page = annotation.page_number,
                    "annotation created"
                );
                if !self.session.push_confirmed(annotation.clone()) {
                    tracing::debug!(id = %annotation.id, "created annotation is off-screen");
                }
                if self.session.is_current(&pending.target)
                    && self.selection.finalized_rect() == Some(pending.rect)
                {
                    self.selection.clear();
                }
                Ok(annotation)
            }
            Err(err) => {
                tracing::error!(page = pending.target.page_number, error = %err, "failed to create annotation");
                self.notifier
                    .notify(Notification::error(format!("Failed to save annotation: {}", err)));
                Err(err.into())
            }
        }
    }

    pub async fn create_annotation(
        &mut self,
        kind: AnnotationKind,
        color: Option<&str>,
        text_content: Option<&str>,
    ) -> Result<Annotation, OverlayError> {
        let pending = self.begin_create(kind, color, text_content)?;
        let result = self.store.insert(pending.draft.clone()).await;
        self.settle_create(pending, result)
    }

    /// Only annotations the store has confirmed can be deleted.
    pub fn begin_delete(&self, id: &str) -> Result<PendingDelete, OverlayError> {
        if !self.session.contains(id) {
            return Err(OverlayError::UnknownAnnotation(id.to_string()));
        }
        Ok(PendingDelete { id: id.to_string() })
    }

    pub fn settle_delete(
        &mut self,
        pending: PendingDelete,
        result: Result<(), StoreError>,
    ) -> Result<(), OverlayError> {
        match result {
            Ok(()) => {
                self.session.remove(&pending.id);
                tracing::info!(id = %pending.id, "annotation deleted");
                Ok(())
            }
            Err(err) => {
                tracing::error!(id = %pending.id, error = %err, "failed to delete annotation");
                self.notifier
                    .notify(Notification::error(format!("Failed to delete annotation: {}", err)));
                Err(err.into())
            }
        }
    }

    pub async fn delete_annotation(&mut self, id: &str) -> Result<(), OverlayError> {
        let pending = self.begin_delete(id)?;
        let result = self.store.delete(&pending.id).await;
        self.settle_delete(pending, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::MemoryAnnotationStore;
    use crate::notification::NotificationLog;

    fn overlay(store: Arc<MemoryAnnotationStore>, log: Arc<NotificationLog>) -> AnnotationOverlay {
        AnnotationOverlay::new(
            DocumentContext::new("doc-1", "https://files.example/doc-1.pdf", 4),
            store,
            log,
        )
    }

    fn select(overlay: &mut AnnotationOverlay, from: Point, to: Point) {
        overlay.set_annotation_mode(true);
        overlay.pointer_down(from).unwrap();
        overlay.pointer_move(to).unwrap();
        overlay.pointer_up(to).unwrap();
    }

    #[tokio::test]
    async fn test_create_without_selection_is_rejected() {
        let store = Arc::new(MemoryAnnotationStore::new());
        let mut overlay = overlay(store.clone(), Arc::new(NotificationLog::new()));

        let result = overlay.create_annotation(AnnotationKind::Highlight, None, None).await;
        assert_eq!(result, Err(OverlayError::NoSelection));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_create_uses_current_page_and_default_color() {
        let store = Arc::new(MemoryAnnotationStore::new());
        let mut overlay = overlay(store.clone(), Arc::new(NotificationLog::new()));
        overlay.go_to_page(3).await;

        select(&mut overlay, Point::new(10.0, 20.0), Point::new(40.0, 25.0));
        let created = overlay
            .create_annotation(AnnotationKind::Underline, None, Some("key term"))
            .await
            .unwrap();

        assert_eq!(created.page_number, 3);
        assert_eq!(created.color, "#3b82f6");
        assert_eq!(created.text_content.as_deref(), Some("key term"));
        assert_eq!(overlay.visible(), &[created]);
        assert!(overlay.selection().normalized_rect().is_none());
        assert!(overlay.selection().menu().is_none());
    }

    #[tokio::test]
    async fn test_create_resolving_after_navigation_stays_off_screen() {
        let store = Arc::new(MemoryAnnotationStore::new());
        let mut overlay = overlay(store.clone(), Arc::new(NotificationLog::new()));
        overlay.go_to_page(1).await;

        select(&mut overlay, Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let pending = overlay.begin_create(AnnotationKind::Highlight, None, None).unwrap();
        let inserted = store.insert(pending.draft.clone()).await;

        overlay.go_to_page(2).await;
        let created = overlay.settle_create(pending, inserted).unwrap();

        assert_eq!(created.page_number, 1);
        assert!(overlay.visible().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmed_annotation() {
        let store = Arc::new(MemoryAnnotationStore::new());
        let mut overlay = overlay(store, Arc::new(NotificationLog::new()));

        let result = overlay.delete_annotation("never-created").await;
        assert_eq!(
            result,
            Err(OverlayError::UnknownAnnotation("never-created".to_string()))
        );
    }

    #[tokio::test]
    async fn test_open_document_clears_selection_and_reloads() {
        let store = Arc::new(MemoryAnnotationStore::new());
        let mut overlay = overlay(store.clone(), Arc::new(NotificationLog::new()));
        store
            .insert(AnnotationDraft::new(
                "doc-2",
                1,
                AnnotationKind::Highlight,
                "#fde68a",
                Rect::new(1.0, 1.0, 5.0, 5.0),
            ))
            .await
            .unwrap();

        select(&mut overlay, Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let outcome = overlay
            .open_document(DocumentContext::new("doc-2", "https://files.example/doc-2.pdf", 2))
            .await;

        assert_eq!(outcome, LoadOutcome::Applied { count: 1 });
        assert!(overlay.selection().finalized_rect().is_none());
        assert_eq!(overlay.session().document().document_id, "doc-2");
    }
}
