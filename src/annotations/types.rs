//! Annotation records anchored to a rectangle on a single PDF page

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::store::StoreError;
use crate::geometry::Rect;

/// Fill color used when a highlight is created without an explicit color
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#fde68a";

/// Stroke color used when an underline is created without an explicit color
pub const DEFAULT_UNDERLINE_COLOR: &str = "#3b82f6";

/// A persisted annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Unique identifier assigned by the store
    pub id: String,
    /// The document this annotation belongs to
    #[serde(rename = "documentId")]
    pub document_id: String,
    /// 1-based page the annotation is anchored to
    #[serde(rename = "pageNumber")]
    pub page_number: u32,
    /// Visual kind
    pub kind: AnnotationKind,
    /// Fill (highlight) or stroke (underline) color
    pub color: String,
    /// Optional caller-supplied label
    #[serde(rename = "textContent", default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    /// Viewport-relative rectangle
    pub position: Rect,
    /// Creation timestamp assigned by the store
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Annotation {
    /// Materialize a draft into a record once the store has assigned an id.
    pub fn from_draft(id: impl Into<String>, draft: AnnotationDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            document_id: draft.document_id,
            page_number: draft.page_number,
            kind: draft.kind,
            color: draft.color,
            text_content: draft.text_content,
            position: draft.position,
            created_at,
        }
    }

    /// Whether this record is anchored to the given document page
    pub fn is_on(&self, document_id: &str, page_number: u32) -> bool {
        self.document_id == document_id && self.page_number == page_number
    }
}

/// Everything the store needs to create an annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDraft {
    #[serde(rename = "documentId")]
    pub document_id: String,
    #[serde(rename = "pageNumber")]
    pub page_number: u32,
    pub kind: AnnotationKind,
    pub color: String,
    #[serde(rename = "textContent", default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    pub position: Rect,
}

impl AnnotationDraft {
    pub fn new(
        document_id: impl Into<String>,
        page_number: u32,
        kind: AnnotationKind,
        color: impl Into<String>,
        position: Rect,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            page_number,
            kind,
            color: color.into(),
            text_content: None,
            position,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Check the constraints every store enforces before persisting.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.document_id.trim().is_empty() {
            return Err(StoreError::Constraint("documentId must not be empty".to_string()));
        }
        if self.page_number == 0 {
            return Err(StoreError::Constraint("pageNumber must be at least 1".to_string()));
        }
        if self.color.trim().is_empty() {
            return Err(StoreError::Constraint("color must not be empty".to_string()));
        }
        if !self.position.is_finite() {
            return Err(StoreError::Constraint("position must be finite".to_string()));
        }
        if self.position.width < 0.0 || self.position.height < 0.0 {
            return Err(StoreError::Constraint(
                "position width and height must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Visual kinds of annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    /// Filled rectangle behind the text
    Highlight,
    /// Line along the bottom edge of the rectangle
    Underline,
}

impl AnnotationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Highlight => "highlight",
            AnnotationKind::Underline => "underline",
        }
    }

    pub fn default_color(&self) -> &'static str {
        match self {
            AnnotationKind::Highlight => DEFAULT_HIGHLIGHT_COLOR,
            AnnotationKind::Underline => DEFAULT_UNDERLINE_COLOR,
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnotationKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "highlight" => Ok(AnnotationKind::Highlight),
            "underline" => Ok(AnnotationKind::Underline),
            other => Err(StoreError::Serialization(format!(
                "unknown annotation kind: {}",
                other
            ))),
        }
    }
}
