//! Live collection view driven by the synchronization engine.

use std::sync::Arc;

use console::style;
use tracing::info;

use crate::api::HttpApi;
use crate::config::Settings;
use crate::engine::{SyncEngine, SyncHandle, SyncOptions, ViewState};

/// Run the engine against the server and print each state transition
/// until interrupted.
pub async fn cmd_watch(
    settings: &Settings,
    api: Arc<HttpApi>,
    search: Option<String>,
    category: Option<String>,
) -> anyhow::Result<()> {
    let options = SyncOptions {
        debounce: settings.debounce(),
        poll_interval: settings.poll_interval(),
    };

    let handle: SyncHandle = SyncEngine::spawn(api, settings.user_id.clone(), options);
    if let Some(search) = search {
        handle.set_search(search);
    }
    if let Some(category) = category {
        handle.set_category(category);
    }

    if settings.user_id.is_none() {
        println!(
            "{} No user identifier configured; showing an empty collection.",
            style("!").yellow()
        );
    }
    info!("watching collection (Ctrl-C to stop)");

    let mut state_rx = handle.state();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                print_state(&state);
            }
        }
    }

    Ok(())
}

fn print_state(state: &ViewState) {
    if state.loading {
        println!("{}", style("… loading").dim());
        return;
    }
    if let Some(error) = &state.error {
        println!("{} {}", style("✗").red(), error);
        return;
    }

    let processing = state
        .collection
        .iter()
        .filter(|r| !r.status.is_terminal())
        .count();

    println!(
        "{} {} document(s){}",
        style("✓").green(),
        state.count,
        if processing > 0 {
            format!(", {processing} still processing")
        } else {
            String::new()
        }
    );
    for record in &state.collection {
        println!(
            "  {:>8}  [{}]  {}",
            record.id,
            record.status.as_str(),
            record.title
        );
    }
}
