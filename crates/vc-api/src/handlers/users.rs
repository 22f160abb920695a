//! User handlers

use axum::{
    extract::{Path, State},
    Json,
};
use vc_service::dto::CommandUsageResponse;
use vc_service::IdentityService;

use crate::extractors::UserIdPath;
use crate::response::ApiResult;
use crate::state::AppState;

/// Count one command invocation
///
/// POST /users/{user_id}/commands
pub async fn record_command(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
) -> ApiResult<Json<CommandUsageResponse>> {
    let user_id = path.user_id()?;

    let service = IdentityService::new(state.service_context());
    let response = service.record_command_usage(user_id).await?;
    Ok(Json(response))
}
