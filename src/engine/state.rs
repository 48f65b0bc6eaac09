//! View state owned by the synchronization engine.

use crate::models::{DocumentRecord, DocumentStatus};

/// The state the presentation layer reads.
///
/// Owned and mutated exclusively by the engine task; consumers observe it
/// through a watch channel. Every update replaces the whole collection
/// rather than mutating records in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Records in server order.
    pub collection: Vec<DocumentRecord>,
    /// True only while a user-facing (non-background) fetch is in flight.
    pub loading: bool,
    /// Last foreground fetch failure, or `None` when healthy. While set,
    /// the collection retains its last known-good value.
    pub error: Option<String>,
    /// Total matched count as reported by the server.
    pub count: usize,
}

impl ViewState {
    /// Initial state at engine spawn: empty and loading.
    pub fn initial() -> Self {
        Self {
            collection: Vec::new(),
            loading: true,
            error: None,
            count: 0,
        }
    }

    /// Empty, settled state used when no user is signed in.
    pub fn empty() -> Self {
        Self {
            loading: false,
            ..Self::initial()
        }
    }

    /// Whether any displayed record is still processing.
    pub fn has_processing(&self) -> bool {
        self.collection
            .iter()
            .any(|record| record.status == DocumentStatus::Processing)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::initial()
    }
}
