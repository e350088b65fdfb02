//! Content sharing and access check endpoints

use std::collections::BTreeSet;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::teams::parse_team_id;
use crate::api::types::ApiError;
use crate::domain::share::{ContentId, ContentShare, SharePermission};

/// Request to share content with a team
#[derive(Debug, Clone, Deserialize)]
pub struct ShareApiRequest {
    pub permissions: Vec<SharePermission>,
}

/// Share grant response
#[derive(Debug, Clone, Serialize)]
pub struct ShareResponse {
    pub content_id: String,
    pub team_id: String,
    pub permissions: Vec<SharePermission>,
    pub granted_by: String,
    pub granted_at: String,
    pub updated_at: String,
}

impl From<&ContentShare> for ShareResponse {
    fn from(share: &ContentShare) -> Self {
        Self {
            content_id: share.content_id().as_str().to_string(),
            team_id: share.team_id().as_str().to_string(),
            permissions: share.permissions().iter().copied().collect(),
            granted_by: share.granted_by().as_str().to_string(),
            granted_at: share.granted_at().to_rfc3339(),
            updated_at: share.updated_at().to_rfc3339(),
        }
    }
}

/// Access check query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct AccessQuery {
    pub operation: SharePermission,
}

/// Access check response
#[derive(Debug, Clone, Serialize)]
pub struct AccessResponse {
    pub allowed: bool,
}

fn parse_content_id(raw: &str) -> Result<ContentId, ApiError> {
    ContentId::new(raw).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// POST /team/{team_id}/content/{content_id}/share
pub async fn share_content(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    Path((team_id, content_id)): Path<(String, String)>,
    Json(request): Json<ShareApiRequest>,
) -> Result<Json<ShareResponse>, ApiError> {
    let team_id = parse_team_id(&team_id)?;
    let content_id = parse_content_id(&content_id)?;

    debug!(team = %team_id, content = %content_id, "Sharing content");

    let permissions: BTreeSet<SharePermission> = request.permissions.into_iter().collect();

    let share = state
        .sharing_service
        .share_content(content_id, &team_id, permissions, &actor)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ShareResponse::from(&share)))
}

/// DELETE /team/{team_id}/content/{content_id}/share
pub async fn revoke_share(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    Path((team_id, content_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let team_id = parse_team_id(&team_id)?;
    let content_id = parse_content_id(&content_id)?;

    debug!(team = %team_id, content = %content_id, "Revoking share");

    state
        .sharing_service
        .revoke_share(&content_id, &team_id, &actor)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({
        "revoked": true,
        "content_id": content_id.as_str(),
        "team_id": team_id.as_str()
    })))
}

/// GET /team/{team_id}/content/{content_id}/share
pub async fn get_share(
    State(state): State<AppState>,
    RequireUser(_actor): RequireUser,
    Path((team_id, content_id)): Path<(String, String)>,
) -> Result<Json<ShareResponse>, ApiError> {
    let team_id = parse_team_id(&team_id)?;
    let content_id = parse_content_id(&content_id)?;

    let share = state
        .sharing_service
        .get_share(&content_id, &team_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ShareResponse::from(&share)))
}

/// GET /content/{content_id}/access
pub async fn check_access(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Path(content_id): Path<String>,
    Query(query): Query<AccessQuery>,
) -> Result<Json<AccessResponse>, ApiError> {
    let content_id = parse_content_id(&content_id)?;

    let allowed = state
        .authorization
        .can_access(&user_id, &content_id, query.operation)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(AccessResponse { allowed }))
}
