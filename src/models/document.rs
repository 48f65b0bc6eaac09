//! Document models for the DocScanner collection.
//!
//! Records mirror what the server returns for listing and search responses.
//! Status transitions only move forward (processing -> completed/failed);
//! a terminal status never reverts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel category meaning "no category filter applied".
///
/// Only ever appears on the filter input, never on a record.
pub const ALL_CATEGORIES: &str = "All Categories";

/// Default category assigned to documents the server has not classified.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Processing status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Processing,
    Completed,
    Failed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether the status is final. Only `Processing` documents are watched
    /// by the background poller.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Processing)
    }
}

/// A document as displayed in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Opaque stable identifier, unique within a user's collection.
    /// The server may issue integer ids; they are normalized to strings.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Display name.
    pub title: String,
    /// Category label. Mutable post-creation.
    #[serde(default = "default_category")]
    pub category: String,
    /// Creation timestamp. Immutable.
    pub date: DateTime<Utc>,
    /// Current processing status.
    pub status: DocumentStatus,
    /// Short text excerpt, present once extraction or search has text to
    /// show. Search results source this from the match snippet.
    #[serde(default)]
    pub preview: Option<String>,
}

fn default_category() -> String {
    UNCATEGORIZED.to_string()
}

/// Accept both string and integer ids from the server.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Str(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

/// Category name with its document count, from the categories endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: u64,
}
