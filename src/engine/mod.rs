//! Collection synchronization engine.
//!
//! Derives one effective request from three independent inputs (search text,
//! category filter, refresh counter), debounces rapid changes into a single
//! foreground fetch, and polls in the background while any displayed
//! document is still processing. All commits go through one sequence check
//! so a superseded response can never overwrite a newer one.

mod query;
mod state;
mod sync;

pub use query::{Query, QueryInput};
pub use state::ViewState;
pub use sync::{SyncEngine, SyncHandle, SyncOptions};
