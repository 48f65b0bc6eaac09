//! JSON-over-HTTP client for the DocScanner server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::normalize::{normalize_listing, normalize_search};
use super::{ApiError, DocumentApi, DocumentPage};
use crate::models::CategoryCount;

const USER_AGENT: &str = concat!("docscanner/", env!("CARGO_PKG_VERSION"));

/// HTTP implementation of [`DocumentApi`].
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    /// Create a new client against a base URL (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Join a path onto the base URL, tolerating a missing trailing slash.
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().expect("base URL must be hierarchical");
            segments.pop_if_empty();
            for segment in path.split('/') {
                segments.push(segment);
            }
        }
        url
    }

    /// Issue a GET and parse the JSON body, mapping non-2xx to [`ApiError::Status`].
    async fn get_json(&self, url: Url) -> Result<serde_json::Value, ApiError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Shape(e.to_string()))
    }

    /// Check a mutation response for success, discarding the body.
    fn check_status(response: &reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status(status.as_u16()))
        }
    }
}

#[derive(Deserialize)]
struct CategoriesResponse {
    categories: Vec<CategoryCount>,
}

#[async_trait]
impl DocumentApi for HttpApi {
    async fn list_documents(
        &self,
        user_id: &str,
        category: Option<&str>,
    ) -> Result<DocumentPage, ApiError> {
        let mut url = self.endpoint("documents");
        url.query_pairs_mut().append_pair("user_id", user_id);
        if let Some(category) = category {
            url.query_pairs_mut().append_pair("category", category);
        }
        let body = self.get_json(url).await?;
        normalize_listing(body)
    }

    async fn search_documents(&self, user_id: &str, query: &str) -> Result<DocumentPage, ApiError> {
        let mut url = self.endpoint("search");
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("user_id", user_id);
        let body = self.get_json(url).await?;
        normalize_search(body)
    }

    async fn list_categories(&self, user_id: &str) -> Result<Vec<CategoryCount>, ApiError> {
        let mut url = self.endpoint("documents/categories");
        url.query_pairs_mut().append_pair("user_id", user_id);
        let body = self.get_json(url).await?;
        let parsed: CategoriesResponse =
            serde_json::from_value(body).map_err(|e| ApiError::Shape(e.to_string()))?;
        Ok(parsed.categories)
    }

    async fn set_category(&self, document_id: &str, category: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("documents/{document_id}/category"));
        debug!("PATCH {}", url);
        let response = self
            .client
            .patch(url)
            .json(&serde_json::json!({ "category": category }))
            .send()
            .await?;
        Self::check_status(&response)
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("documents/{document_id}"));
        debug!("DELETE {}", url);
        let response = self.client.delete(url).send().await?;
        Self::check_status(&response)
    }
}
