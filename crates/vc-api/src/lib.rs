//! # vc-api
//!
//! HTTP surface of the voice presence ledger built with Axum: presence
//! ingest through a sharded worker pool, summary and ranking queries, and
//! guild/user settings.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;
pub mod tracker;

pub use server::{create_app, run, run_until};
pub use state::AppState;
pub use tracker::{TrackerError, VoiceTracker};
