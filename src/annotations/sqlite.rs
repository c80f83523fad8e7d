//! SQLite storage for annotations
//!
//! Persists page-scoped annotations in a single `annotations` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::store::{AnnotationStore, StoreError};
use super::types::{Annotation, AnnotationDraft, AnnotationKind};
use crate::geometry::Rect;

/// Annotation store backed by a SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteAnnotationStore {
    pool: SqlitePool,
}

impl SqliteAnnotationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the annotations table
    pub async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS annotations (
                id TEXT PRIMARY KEY,
                document_id TEXT NOT NULL,
                page_number INTEGER NOT NULL CHECK (page_number >= 1),
                kind TEXT NOT NULL,
                color TEXT NOT NULL,
                text_content TEXT,
                x REAL NOT NULL,
                y REAL NOT NULL,
                width REAL NOT NULL CHECK (width >= 0),
                height REAL NOT NULL CHECK (height >= 0),
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_annotations_page ON annotations(document_id, page_number);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a single annotation by id
    pub async fn get(&self, id: &str) -> Result<Option<Annotation>, StoreError> {
        let row = sqlx::query_as::<_, AnnotationRow>(
            r#"
            SELECT id, document_id, page_number, kind, color, text_content,
                   x, y, width, height, created_at
            FROM annotations
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_annotation()).transpose()
    }

    /// Count annotations across all pages of a document
    pub async fn count_for_document(&self, document_id: &str) -> Result<i64, StoreError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM annotations WHERE document_id = ?")
            .bind(document_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }
}

#[async_trait]
impl AnnotationStore for SqliteAnnotationStore {
    async fn list(&self, document_id: &str, page_number: u32) -> Result<Vec<Annotation>, StoreError> {
        let rows = sqlx::query_as::<_, AnnotationRow>(
            r#"
            SELECT id, document_id, page_number, kind, color, text_content,
                   x, y, width, height, created_at
            FROM annotations
            WHERE document_id = ? AND page_number = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(document_id)
        .bind(i64::from(page_number))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_annotation()).collect()
    }

    async fn insert(&self, draft: AnnotationDraft) -> Result<Annotation, StoreError> {
        draft.validate()?;

        let annotation = Annotation::from_draft(Uuid::new_v4().to_string(), draft, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO annotations (
                id, document_id, page_number, kind, color, text_content,
                x, y, width, height, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&annotation.id)
        .bind(&annotation.document_id)
        .bind(i64::from(annotation.page_number))
        .bind(annotation.kind.as_str())
        .bind(&annotation.color)
        .bind(&annotation.text_content)
        .bind(annotation.position.x)
        .bind(annotation.position.y)
        .bind(annotation.position.width)
        .bind(annotation.position.height)
        .bind(annotation.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %annotation.id, document_id = %annotation.document_id, page = annotation.page_number, "annotation inserted");

        Ok(annotation)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM annotations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(id, "delete matched no annotation");
        }

        Ok(())
    }
}

/// Internal row type for SQLite queries
#[derive(sqlx::FromRow)]
struct AnnotationRow {
    id: String,
    document_id: String,
    page_number: i64,
    kind: String,
    color: String,
    text_content: Option<String>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    created_at: String,
}

impl AnnotationRow {
    fn into_annotation(self) -> Result<Annotation, StoreError> {
        let kind: AnnotationKind = self.kind.parse()?;
        let page_number = u32::try_from(self.page_number).map_err(|_| {
            StoreError::Serialization(format!("invalid page number: {}", self.page_number))
        })?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)?.with_timezone(&Utc);

        Ok(Annotation {
            id: self.id,
            document_id: self.document_id,
            page_number,
            kind,
            color: self.color,
            text_content: self.text_content,
            position: Rect::new(self.x, self.y, self.width, self.height),
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn setup_store() -> SqliteAnnotationStore {
        let pool = db::create_memory_pool().await.unwrap();
        let store = SqliteAnnotationStore::new(pool);
        store.init().await.unwrap();
        store
    }

    fn draft(document_id: &str, page: u32) -> AnnotationDraft {
        AnnotationDraft::new(
            document_id,
            page,
            AnnotationKind::Highlight,
            "#fde68a",
            Rect::new(10.0, 20.0, 30.0, 5.0),
        )
    }

    #[tokio::test]
    async fn test_insert_and_list_round_trip() {
        let store = setup_store().await;

        let created = store
            .insert(draft("doc-1", 2).with_text("mitochondria"))
            .await
            .unwrap();

        let listed = store.list("doc-1", 2).await.unwrap();
        assert_eq!(listed.len(), 1);

        let loaded = &listed[0];
        assert_eq!(loaded.id, created.id);
        assert_eq!(loaded.kind, AnnotationKind::Highlight);
        assert_eq!(loaded.color, "#fde68a");
        assert_eq!(loaded.text_content.as_deref(), Some("mitochondria"));
        assert_eq!(loaded.position, Rect::new(10.0, 20.0, 30.0, 5.0));
        assert_eq!(loaded.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_document_page() {
        let store = setup_store().await;

        for _ in 0..3 {
            store.insert(draft("doc-a", 1)).await.unwrap();
        }
        store.insert(draft("doc-a", 2)).await.unwrap();
        store.insert(draft("doc-b", 1)).await.unwrap();

        assert_eq!(store.list("doc-a", 1).await.unwrap().len(), 3);
        assert_eq!(store.list("doc-a", 2).await.unwrap().len(), 1);
        assert_eq!(store.list("doc-a", 9).await.unwrap().len(), 0);
        assert_eq!(store.count_for_document("doc-a").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected() {
        let store = setup_store().await;
        let mut bad = draft("doc-a", 1);
        bad.position.height = -2.0;

        let result = store.insert(bad).await;
        assert!(matches!(result, Err(StoreError::Constraint(_))));
        assert_eq!(store.count_for_document("doc-a").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = setup_store().await;

        let created = store.insert(draft("doc-1", 1)).await.unwrap();
        assert!(store.get(&created.id).await.unwrap().is_some());

        store.delete(&created.id).await.unwrap();
        assert!(store.get(&created.id).await.unwrap().is_none());

        // second delete is a no-op
        store.delete(&created.id).await.unwrap();
    }
}
