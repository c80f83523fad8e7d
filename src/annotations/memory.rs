//! In-process annotation store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::store::{AnnotationStore, StoreError};
use super::types::{Annotation, AnnotationDraft};

/// Annotation store backed by a map, for tests and offline sessions
#[derive(Debug, Default)]
pub struct MemoryAnnotationStore {
    records: RwLock<HashMap<String, Annotation>>,
}

impl MemoryAnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records
    pub fn with_records(records: impl IntoIterator<Item = Annotation>) -> Self {
        let store = Self::new();
        {
            let mut map = store.records.write();
            for record in records {
                map.insert(record.id.clone(), record);
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Annotation> {
        self.records.read().get(id).cloned()
    }
}

#[async_trait]
impl AnnotationStore for MemoryAnnotationStore {
    async fn list(&self, document_id: &str, page_number: u32) -> Result<Vec<Annotation>, StoreError> {
        let mut found: Vec<Annotation> = self
            .records
            .read()
            .values()
            .filter(|a| a.is_on(document_id, page_number))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn insert(&self, draft: AnnotationDraft) -> Result<Annotation, StoreError> {
        draft.validate()?;
        let annotation = Annotation::from_draft(Uuid::new_v4().to_string(), draft, Utc::now());
        self.records
            .write()
            .insert(annotation.id.clone(), annotation.clone());
        Ok(annotation)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.records.write().remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::AnnotationKind;
    use crate::geometry::Rect;

    fn draft(document_id: &str, page: u32) -> AnnotationDraft {
        AnnotationDraft::new(
            document_id,
            page,
            AnnotationKind::Underline,
            "#3b82f6",
            Rect::new(1.0, 2.0, 3.0, 4.0),
        )
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_lists_by_page() {
        let store = MemoryAnnotationStore::new();

        let created = store.insert(draft("doc-a", 1)).await.unwrap();
        store.insert(draft("doc-a", 2)).await.unwrap();
        store.insert(draft("doc-b", 1)).await.unwrap();

        assert!(!created.id.is_empty());
        let page = store.list("doc-a", 1).await.unwrap();
        assert_eq!(page, vec![created]);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_draft() {
        let store = MemoryAnnotationStore::new();
        let result = store.insert(draft("doc-a", 0)).await;
        assert!(matches!(result, Err(StoreError::Constraint(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryAnnotationStore::new();
        let created = store.insert(draft("doc-a", 1)).await.unwrap();

        store.delete(&created.id).await.unwrap();
        store.delete(&created.id).await.unwrap();

        assert!(store.get(&created.id).is_none());
    }
}
