//! The synchronization actor.
//!
//! One task owns the view state and drives everything through a single
//! `select!` loop: input commands, fetch outcomes, the debounce deadline,
//! and the poll deadline. Fetches run as spawned tasks that report back on
//! an outcome channel tagged with a request sequence number; a response
//! whose sequence is no longer the latest is dropped at commit time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::query::{Query, QueryInput};
use super::state::ViewState;
use crate::api::{ApiError, DocumentApi, DocumentPage};

/// Timing configuration for the engine.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Quiet period required after the last input change before a fetch.
    pub debounce: Duration,
    /// Interval between background polls while documents are processing.
    pub poll_interval: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// Commands from the owning view into the engine task.
enum Command {
    SetSearch(String),
    SetCategory(String),
    Refresh,
    Retry,
    ApplyCategory { id: String, category: String },
    ApplyDelete { id: String },
}

/// Result of one spawned fetch, tagged for the commit-time sequence check.
struct FetchOutcome {
    seq: u64,
    background: bool,
    result: Result<DocumentPage, ApiError>,
}

/// Spawns and owns the synchronization task.
pub struct SyncEngine;

impl SyncEngine {
    /// Start the engine for a user's collection.
    ///
    /// With `user_id` absent the engine settles to an empty, non-loading
    /// state and never issues a request. Dropping the returned handle
    /// cancels the task, its timers, and the effect of any in-flight fetch.
    pub fn spawn(
        api: Arc<dyn DocumentApi>,
        user_id: Option<String>,
        options: SyncOptions,
    ) -> SyncHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ViewState::initial());

        let task = EngineTask {
            api: api.clone(),
            user_id,
            options,
            input: QueryInput::default(),
            state: ViewState::initial(),
            state_tx,
            command_rx,
            outcome_tx,
            outcome_rx,
            latest_seq: 0,
            active_query: None,
            debounce_at: None,
            poll_at: None,
        };
        let task = tokio::spawn(task.run());

        SyncHandle {
            api,
            command_tx,
            state_rx,
            task,
        }
    }
}

/// Handle held by the owning view.
///
/// Input setters are fire-and-forget; the engine debounces and fetches on
/// its own schedule. Single-record mutations go through the server first
/// and are applied locally only on acknowledgement.
pub struct SyncHandle {
    api: Arc<dyn DocumentApi>,
    command_tx: mpsc::UnboundedSender<Command>,
    state_rx: watch::Receiver<ViewState>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Watch receiver for view state updates.
    pub fn state(&self) -> watch::Receiver<ViewState> {
        self.state_rx.clone()
    }

    /// Snapshot of the current view state.
    pub fn current(&self) -> ViewState {
        self.state_rx.borrow().clone()
    }

    /// Update the free-text search input.
    pub fn set_search(&self, text: impl Into<String>) {
        let _ = self.command_tx.send(Command::SetSearch(text.into()));
    }

    /// Update the category filter input.
    pub fn set_category(&self, category: impl Into<String>) {
        let _ = self.command_tx.send(Command::SetCategory(category.into()));
    }

    /// Force a reload of the currently selected query.
    pub fn refresh(&self) {
        let _ = self.command_tx.send(Command::Refresh);
    }

    /// Re-issue the last request after a surfaced error.
    pub fn retry(&self) {
        let _ = self.command_tx.send(Command::Retry);
    }

    /// Change one document's category on the server, then mirror the change
    /// into the displayed record without a full refetch.
    pub async fn set_document_category(&self, id: &str, category: &str) -> Result<(), ApiError> {
        self.api.set_category(id, category).await?;
        let _ = self.command_tx.send(Command::ApplyCategory {
            id: id.to_string(),
            category: category.to_string(),
        });
        Ok(())
    }

    /// Delete a document on the server, then drop it from the collection.
    pub async fn delete_document(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete_document(id).await?;
        let _ = self.command_tx.send(Command::ApplyDelete { id: id.to_string() });
        Ok(())
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct EngineTask {
    api: Arc<dyn DocumentApi>,
    user_id: Option<String>,
    options: SyncOptions,
    input: QueryInput,
    state: ViewState,
    state_tx: watch::Sender<ViewState>,
    command_rx: mpsc::UnboundedReceiver<Command>,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    /// Sequence number of the most recently issued request, foreground or
    /// background. Only the response carrying this number may commit.
    latest_seq: u64,
    /// Query of the last issued foreground fetch; polls re-issue it.
    active_query: Option<Query>,
    debounce_at: Option<Instant>,
    poll_at: Option<Instant>,
}

impl EngineTask {
    async fn run(mut self) {
        // The initial load goes through the same debounce path as any
        // input change.
        self.arm_debounce();

        loop {
            let debounce = deadline_wait(self.debounce_at);
            let poll = deadline_wait(self.poll_at);

            tokio::select! {
                command = self.command_rx.recv() => {
                    match command {
                        Some(command) => self.handle_command(command),
                        // Handle dropped: stop, discarding pending timers
                        // and any in-flight responses with them.
                        None => break,
                    }
                }
                outcome = self.outcome_rx.recv() => {
                    if let Some(outcome) = outcome {
                        self.handle_outcome(outcome);
                    }
                }
                _ = debounce => {
                    self.debounce_at = None;
                    self.issue_fetch(false);
                }
                _ = poll => {
                    self.poll_at = None;
                    self.issue_fetch(true);
                }
            }
        }
    }

    /// Re-arm the debounce deadline, replacing any pending one.
    fn arm_debounce(&mut self) {
        self.debounce_at = Some(Instant::now() + self.options.debounce);
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetSearch(text) => {
                if self.input.search != text {
                    self.input.search = text;
                    self.arm_debounce();
                }
            }
            Command::SetCategory(category) => {
                if self.input.category != category {
                    self.input.category = category;
                    self.arm_debounce();
                }
            }
            Command::Refresh => {
                self.input.refresh += 1;
                self.arm_debounce();
            }
            Command::Retry => {
                self.debounce_at = None;
                self.issue_fetch(false);
            }
            Command::ApplyCategory { id, category } => {
                let mut collection = self.state.collection.clone();
                if let Some(record) = collection.iter_mut().find(|r| r.id == id) {
                    record.category = category;
                    self.state.collection = collection;
                    self.publish();
                    self.rearm_poller();
                }
            }
            Command::ApplyDelete { id } => {
                let before = self.state.collection.len();
                self.state.collection.retain(|r| r.id != id);
                if self.state.collection.len() != before {
                    self.state.count = self.state.count.saturating_sub(1);
                    self.publish();
                    self.rearm_poller();
                }
            }
        }
    }

    /// Issue one fetch for the current query, foreground or background.
    ///
    /// Both paths share the request logic and the sequence counter; the
    /// flag only controls whether `loading` and `error` are touched.
    fn issue_fetch(&mut self, background: bool) {
        let Some(user_id) = self.user_id.clone() else {
            // No signed-in user: settle to empty without a request.
            self.state = ViewState::empty();
            self.publish();
            return;
        };

        let query = if background {
            match &self.active_query {
                Some(query) => query.clone(),
                None => return,
            }
        } else {
            Query::build(&self.input)
        };

        self.latest_seq += 1;
        let seq = self.latest_seq;
        debug!(seq, background, ?query, "issuing fetch");

        if !background {
            self.active_query = Some(query.clone());
            // A pending poll would outrank this request's sequence number;
            // the commit re-arms it if still needed.
            self.poll_at = None;
            self.state.loading = true;
            self.publish();
        }

        let api = self.api.clone();
        let outcomes = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = match &query {
                Query::Search { q } => api.search_documents(&user_id, q).await,
                Query::Filtered { category } => {
                    api.list_documents(&user_id, Some(category)).await
                }
                Query::All => api.list_documents(&user_id, None).await,
            };
            let _ = outcomes.send(FetchOutcome {
                seq,
                background,
                result,
            });
        });
    }

    fn handle_outcome(&mut self, outcome: FetchOutcome) {
        if outcome.seq != self.latest_seq {
            // Superseded: a newer request was issued while this one was in
            // flight. Not an error; drop it.
            debug!(
                seq = outcome.seq,
                latest = self.latest_seq,
                "dropping superseded response"
            );
            return;
        }

        match outcome.result {
            Ok(page) => {
                self.state.collection = page.records;
                self.state.count = page.count;
                self.state.error = None;
                if !outcome.background {
                    self.state.loading = false;
                }
                self.publish();
                self.rearm_poller();
            }
            Err(err) if outcome.background => {
                // Transient poll failures never disturb the visible state.
                warn!("background poll failed: {err}");
                self.rearm_poller();
            }
            Err(err) => {
                self.state.error = Some(err.to_string());
                self.state.loading = false;
                self.publish();
            }
        }
    }

    /// Single-timer poller discipline: cancel any armed poll, then re-arm
    /// only while a non-terminal record remains and the active query is not
    /// a search (search result sets are point-in-time).
    fn rearm_poller(&mut self) {
        self.poll_at = None;
        let searching = self.active_query.as_ref().is_some_and(Query::is_search);
        if !searching && self.state.has_processing() {
            self.poll_at = Some(Instant::now() + self.options.poll_interval);
        }
    }

    fn publish(&self) {
        let _ = self.state_tx.send(self.state.clone());
    }
}

/// Wait on an optional deadline; absent means wait forever.
async fn deadline_wait(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
