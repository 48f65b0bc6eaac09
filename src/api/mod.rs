//! HTTP contract consumed by the synchronization engine.
//!
//! The engine talks to the server through the [`DocumentApi`] trait so that
//! tests can substitute a scripted implementation. [`HttpApi`] is the real
//! JSON-over-HTTP client.

mod http;
mod normalize;

pub use http::HttpApi;
pub use normalize::{normalize_listing, normalize_search, DocumentPage};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::CategoryCount;

/// Errors from a fetch against the document server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request rejected or server unreachable.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("server returned status {0}")]
    Status(u16),

    /// Response body matched neither the listing nor the search schema.
    #[error("unrecognized response shape: {0}")]
    Shape(String),
}

/// Operations the document server exposes to the collection client.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Fetch the document listing, optionally scoped to one category.
    async fn list_documents(
        &self,
        user_id: &str,
        category: Option<&str>,
    ) -> Result<DocumentPage, ApiError>;

    /// Full-text search across the user's documents.
    async fn search_documents(&self, user_id: &str, query: &str) -> Result<DocumentPage, ApiError>;

    /// Category names with document counts.
    async fn list_categories(&self, user_id: &str) -> Result<Vec<CategoryCount>, ApiError>;

    /// Change the category of a single document.
    async fn set_category(&self, document_id: &str, category: &str) -> Result<(), ApiError>;

    /// Delete a document.
    async fn delete_document(&self, document_id: &str) -> Result<(), ApiError>;
}
