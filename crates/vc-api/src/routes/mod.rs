//! Route definitions
//!
//! Health probes at the root, everything else mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{guilds, health, users, voice};
use crate::state::AppState;

/// Create the main router with health checks and all API routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(voice_routes())
        .merge(guild_routes())
        .merge(user_routes())
}

/// Presence ingest and voice queries
fn voice_routes() -> Router<AppState> {
    Router::new()
        // 202 without `?wait=true`: accounting failures are then only logged
        .route("/voice/events", post(voice::submit_event))
        .route("/guilds/:guild_id/voice/ranking", get(voice::get_ranking))
        .route(
            "/guilds/:guild_id/users/:user_id/voice/rank",
            get(voice::get_user_rank),
        )
        .route(
            "/guilds/:guild_id/users/:user_id/voice/:channel_id",
            get(voice::get_summary),
        )
}

/// Guild routes
fn guild_routes() -> Router<AppState> {
    Router::new().route(
        "/guilds/:guild_id/settings",
        get(guilds::get_settings).put(guilds::update_settings),
    )
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new().route("/users/:user_id/commands", post(users::record_command))
}
