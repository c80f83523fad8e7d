//! Annotation API endpoints
//!
//! Page-scoped list, create, fetch and delete of PDF annotations.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::annotations::{Annotation, AnnotationDraft, AnnotationStore};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the annotations router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_annotations).post(create_annotation))
        .route("/:id", get(get_annotation).delete(delete_annotation))
        .route("/document/:document_id/count", get(count_document_annotations))
}

/// Query parameters for listing a page's annotations
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(rename = "documentId")]
    document_id: String,
    #[serde(rename = "pageNumber")]
    page_number: u32,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

/// List annotations for one document page
async fn list_annotations(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Annotation>>> {
    if params.page_number == 0 {
        return Err(AppError::BadRequest("pageNumber must be at least 1".to_string()));
    }

    let annotations = state
        .annotations()
        .list(&params.document_id, params.page_number)
        .await?;
    Ok(Json(annotations))
}

/// Create a new annotation
async fn create_annotation(
    State(state): State<AppState>,
    Json(draft): Json<AnnotationDraft>,
) -> Result<(StatusCode, Json<Annotation>)> {
    let annotation = state.annotations().insert(draft).await?;
    Ok((StatusCode::CREATED, Json(annotation)))
}

/// Get a specific annotation
async fn get_annotation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Annotation>> {
    let annotation = state
        .annotations()
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Annotation not found: {}", id)))?;
    Ok(Json(annotation))
}

/// Delete an annotation; unknown ids are not an error
async fn delete_annotation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.annotations().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Count annotations across a document
async fn count_document_annotations(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<CountResponse>> {
    let count = state.annotations().count_for_document(&document_id).await?;
    Ok(Json(CountResponse { count }))
}
