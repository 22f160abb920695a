//! Voice handlers
//!
//! Presence ingest plus summary and ranking queries.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use vc_core::VoiceStateUpdate;
use vc_service::dto::{
    PeriodQuery, RankingQuery, RankingResponse, SummaryResponse, UserRankQuery, UserRankResponse,
    VoiceEventAcceptedResponse, VoiceEventQuery,
};
use vc_service::QueryService;

use crate::extractors::{
    GuildIdPath, GuildUserChannelPath, GuildUserPath, JsonBody, ValidatedQuery,
};
use crate::response::{Accepted, ApiResult};
use crate::state::AppState;

/// Submit a voice state update
///
/// POST /voice/events
///
/// Responds 202 once queued, or 200 after accounting with `?wait=true`.
/// A queued update that later fails to apply is only logged by its tracker
/// worker; callers that need to see storage errors must pass `?wait=true`.
/// Updates that imply no transition are acknowledged without queueing.
pub async fn submit_event(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<VoiceEventQuery>,
    JsonBody(update): JsonBody<VoiceStateUpdate>,
) -> ApiResult<Response> {
    let accepted = |transition: Option<&'static str>| VoiceEventAcceptedResponse {
        guild_id: update.guild_id.to_string(),
        user_id: update.user_id.to_string(),
        transition,
    };

    let Some(transition) = update.transition() else {
        return Ok(Json(accepted(None)).into_response());
    };

    if params.wait {
        let applied = state.tracker().submit_and_wait(update).await??;
        return Ok(Json(accepted(applied.map(|t| t.kind()))).into_response());
    }

    state.tracker().submit(update).await?;
    Ok(Accepted(Json(accepted(Some(transition.kind())))).into_response())
}

/// A member's totals in one channel
///
/// GET /guilds/{guild_id}/users/{user_id}/voice/{channel_id}
pub async fn get_summary(
    State(state): State<AppState>,
    Path(path): Path<GuildUserChannelPath>,
    ValidatedQuery(query): ValidatedQuery<PeriodQuery>,
) -> ApiResult<Json<SummaryResponse>> {
    let (guild_id, user_id, channel_id) = path.ids()?;

    let service = QueryService::new(state.service_context());
    let response = service
        .get_summary(guild_id, user_id, channel_id, query.year, query.month)
        .await?;
    Ok(Json(response))
}

/// Guild ranking by muted time
///
/// GET /guilds/{guild_id}/voice/ranking
pub async fn get_ranking(
    State(state): State<AppState>,
    Path(path): Path<GuildIdPath>,
    ValidatedQuery(query): ValidatedQuery<RankingQuery>,
) -> ApiResult<Json<RankingResponse>> {
    let guild_id = path.guild_id()?;

    let service = QueryService::new(state.service_context());
    let response = service
        .get_ranking(guild_id, query.channel(), query.year, query.month, query.limit)
        .await?;
    Ok(Json(response))
}

/// One member's ranking position
///
/// GET /guilds/{guild_id}/users/{user_id}/voice/rank
pub async fn get_user_rank(
    State(state): State<AppState>,
    Path(path): Path<GuildUserPath>,
    ValidatedQuery(query): ValidatedQuery<UserRankQuery>,
) -> ApiResult<Json<UserRankResponse>> {
    let guild_id = path.guild_id()?;
    let user_id = path.user_id()?;

    let service = QueryService::new(state.service_context());
    let response = service
        .get_user_rank(guild_id, user_id, query.channel(), query.year, query.month)
        .await?;
    Ok(Json(response))
}
