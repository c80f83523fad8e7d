//! HTTP client for a remote annotation service
//!
//! Talks to the routes served by this crate's binary (`/api/v1/annotations`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};

use super::store::{AnnotationStore, StoreError};
use super::types::{Annotation, AnnotationDraft};
use crate::config::AnnotationApiConfig;

const ANNOTATIONS_PATH: &str = "/api/v1/annotations";

/// Annotation store reached over HTTP/JSON
#[derive(Debug, Clone)]
pub struct HttpAnnotationStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpAnnotationStore {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &AnnotationApiConfig) -> Result<Self, StoreError> {
        Self::new(
            &config.base_url,
            config.token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}{}{}", self.base_url, ANNOTATIONS_PATH, suffix)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Turn a non-success response into the matching store error
async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = format!("{}: {}", status, body);

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized(detail),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            StoreError::Constraint(detail)
        }
        _ => StoreError::Backend(detail),
    })
}

#[async_trait]
impl AnnotationStore for HttpAnnotationStore {
    async fn list(&self, document_id: &str, page_number: u32) -> Result<Vec<Annotation>, StoreError> {
        let request = self
            .client
            .get(self.url(""))
            .query(&[("documentId", document_id.to_string()), ("pageNumber", page_number.to_string())]);

        let response = check_status(self.authorize(request).send().await?).await?;
        Ok(response.json::<Vec<Annotation>>().await?)
    }

    async fn insert(&self, draft: AnnotationDraft) -> Result<Annotation, StoreError> {
        let request = self.client.post(self.url("")).json(&draft);

        let response = check_status(self.authorize(request).send().await?).await?;
        Ok(response.json::<Annotation>().await?)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let request = self.client.delete(self.url(&format!("/{}", id)));

        check_status(self.authorize(request).send().await?).await?;
        Ok(())
    }
}
