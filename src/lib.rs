//! DocScanner - document collection synchronization client.
//!
//! Keeps a displayed document collection consistent with server state while
//! search text, category filter, and manual refresh change independently.
//! A background poller watches processing documents until they settle.

pub mod api;
pub mod cli;
pub mod config;
pub mod engine;
pub mod models;
