//! Guild handlers
//!
//! Endpoints for guild settings.

use axum::{
    extract::{Path, State},
    Json,
};
use vc_service::dto::{GuildSettingsResponse, UpdateGuildSettingsRequest};
use vc_service::IdentityService;

use crate::extractors::{GuildIdPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Get guild settings
///
/// GET /guilds/{guild_id}/settings
pub async fn get_settings(
    State(state): State<AppState>,
    Path(path): Path<GuildIdPath>,
) -> ApiResult<Json<GuildSettingsResponse>> {
    let guild_id = path.guild_id()?;

    let service = IdentityService::new(state.service_context());
    let response = service.guild_settings(guild_id).await?;
    Ok(Json(response))
}

/// Set or clear the notification channel
///
/// PUT /guilds/{guild_id}/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Path(path): Path<GuildIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateGuildSettingsRequest>,
) -> ApiResult<Json<GuildSettingsResponse>> {
    let guild_id = path.guild_id()?;

    let service = IdentityService::new(state.service_context());
    let response = service
        .set_notification_channel(guild_id, request.channel())
        .await?;
    Ok(Json(response))
}
