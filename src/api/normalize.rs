//! Normalization of the two server response shapes.
//!
//! The listing endpoint returns `{documents: [...], count?: n}` while the
//! search endpoint returns `{results: [...]}` where each hit carries the
//! document fields plus a match `snippet`. Both collapse into one
//! [`DocumentPage`] so the rest of the client never branches on shape.

use serde::Deserialize;

use super::ApiError;
use crate::models::DocumentRecord;

/// A normalized page of documents plus the server-reported total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPage {
    /// Records in server order. Never re-sorted client-side.
    pub records: Vec<DocumentRecord>,
    /// Total matched count as reported by the server.
    pub count: usize,
}

#[derive(Deserialize)]
struct ListingResponse {
    documents: Vec<DocumentRecord>,
    count: Option<usize>,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

/// A search result: a document plus the matching snippet.
///
/// Snippets may carry `<b>` highlight markup; it is passed through untouched.
#[derive(Deserialize)]
struct SearchHit {
    #[serde(flatten)]
    record: DocumentRecord,
    snippet: Option<String>,
}

/// Normalize a listing response body.
pub fn normalize_listing(body: serde_json::Value) -> Result<DocumentPage, ApiError> {
    let listing: ListingResponse =
        serde_json::from_value(body).map_err(|e| ApiError::Shape(e.to_string()))?;
    let count = listing.count.unwrap_or(listing.documents.len());
    Ok(DocumentPage {
        records: listing.documents,
        count,
    })
}

/// Normalize a search response body, sourcing `preview` from the snippet.
pub fn normalize_search(body: serde_json::Value) -> Result<DocumentPage, ApiError> {
    let search: SearchResponse =
        serde_json::from_value(body).map_err(|e| ApiError::Shape(e.to_string()))?;
    let records: Vec<DocumentRecord> = search
        .results
        .into_iter()
        .map(|hit| {
            let mut record = hit.record;
            if hit.snippet.is_some() {
                record.preview = hit.snippet;
            }
            record
        })
        .collect();
    let count = records.len();
    Ok(DocumentPage { records, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentStatus;
    use serde_json::json;

    fn doc(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("doc-{id}.pdf"),
            "category": "Finance",
            "date": "2024-03-01T12:00:00Z",
            "status": "completed"
        })
    }

    #[test]
    fn test_listing_with_count() {
        let page = normalize_listing(json!({"documents": [doc(1), doc(2)], "count": 7})).unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.count, 7);
    }

    #[test]
    fn test_listing_without_count_falls_back_to_len() {
        let page = normalize_listing(json!({"documents": [doc(1)]})).unwrap();
        assert_eq!(page.count, 1);
    }

    #[test]
    fn test_search_snippet_becomes_preview() {
        let mut hit = doc(2);
        hit["snippet"] = json!("...<b>invoice</b> due...");
        let page = normalize_search(json!({"results": [hit]})).unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(
            page.records[0].preview.as_deref(),
            Some("...<b>invoice</b> due...")
        );
        assert_eq!(page.records[0].status, DocumentStatus::Completed);
    }

    #[test]
    fn test_search_without_snippet_keeps_preview_absent() {
        let page = normalize_search(json!({"results": [doc(3)]})).unwrap();
        assert!(page.records[0].preview.is_none());
    }

    #[test]
    fn test_malformed_body_is_shape_error() {
        let err = normalize_listing(json!({"rows": []})).unwrap_err();
        assert!(matches!(err, ApiError::Shape(_)));

        let err = normalize_search(json!("not an object")).unwrap_err();
        assert!(matches!(err, ApiError::Shape(_)));
    }

    #[test]
    fn test_malformed_record_is_shape_error() {
        let err = normalize_listing(json!({
            "documents": [{"id": 1, "title": "x", "status": "unknown", "date": "2024-03-01T12:00:00Z"}]
        }))
        .unwrap_err();
        assert!(matches!(err, ApiError::Shape(_)));
    }
}
