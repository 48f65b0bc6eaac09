//! Data models for the document collection client.

mod document;

pub use document::{CategoryCount, DocumentRecord, DocumentStatus, ALL_CATEGORIES, UNCATEGORIZED};
