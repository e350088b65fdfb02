//! Team and membership endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::membership::Membership;
use crate::domain::role::TeamRole;
use crate::domain::team::{Team, TeamId, UserId};

/// Request to create a new team
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamApiRequest {
    pub name: String,
}

/// Request to change a member's role
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRoleApiRequest {
    pub role: TeamRole,
}

/// Request to transfer team ownership
#[derive(Debug, Clone, Deserialize)]
pub struct TransferOwnershipApiRequest {
    pub new_owner_id: String,
}

/// Team response
#[derive(Debug, Clone, Serialize)]
pub struct TeamResponse {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: String,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id().as_str().to_string(),
            name: team.name().to_string(),
            owner_id: team.owner_id().as_str().to_string(),
            created_at: team.created_at().to_rfc3339(),
        }
    }
}

/// Membership response
#[derive(Debug, Clone, Serialize)]
pub struct MembershipResponse {
    pub team_id: String,
    pub user_id: String,
    pub role: TeamRole,
    pub joined_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited_by: Option<String>,
}

impl From<&Membership> for MembershipResponse {
    fn from(membership: &Membership) -> Self {
        Self {
            team_id: membership.team_id().as_str().to_string(),
            user_id: membership.user_id().as_str().to_string(),
            role: membership.role(),
            joined_at: membership.joined_at().to_rfc3339(),
            invited_by: membership.invited_by().map(|u| u.as_str().to_string()),
        }
    }
}

/// Team with its active members
#[derive(Debug, Clone, Serialize)]
pub struct TeamDetailResponse {
    #[serde(flatten)]
    pub team: TeamResponse,
    pub members: Vec<MembershipResponse>,
}

pub(super) fn parse_team_id(raw: &str) -> Result<TeamId, ApiError> {
    TeamId::new(raw).map_err(|e| ApiError::bad_request(e.to_string()))
}

pub(super) fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    UserId::new(raw).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// POST /team
pub async fn create_team(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Json(request): Json<CreateTeamApiRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    debug!(name = %request.name, owner = %user_id, "Creating team");

    let team = state
        .team_service
        .create(&request.name, user_id)
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(TeamResponse::from(&team))))
}

/// GET /team/{team_id}
pub async fn get_team(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Path(team_id): Path<String>,
) -> Result<Json<TeamDetailResponse>, ApiError> {
    let team_id = parse_team_id(&team_id)?;

    let team = state
        .team_service
        .get(&team_id)
        .await
        .map_err(ApiError::from)?;

    // Team detail is member-only
    state
        .team_service
        .membership(&team_id, &user_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| {
            ApiError::forbidden(format!("User '{}' is not a member of team '{}'", user_id, team_id))
        })?;

    let members = state
        .team_service
        .list_members(&team_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TeamDetailResponse {
        team: TeamResponse::from(&team),
        members: members.iter().map(MembershipResponse::from).collect(),
    }))
}

/// DELETE /team/{team_id}/member/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    Path((team_id, user_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let team_id = parse_team_id(&team_id)?;
    let user_id = parse_user_id(&user_id)?;

    debug!(team = %team_id, user = %user_id, "Removing member");

    state
        .team_service
        .remove_membership(&team_id, &actor, &user_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({
        "removed": true,
        "team_id": team_id.as_str(),
        "user_id": user_id.as_str()
    })))
}

/// PUT /team/{team_id}/member/{user_id}/role
pub async fn change_member_role(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    Path((team_id, user_id)): Path<(String, String)>,
    Json(request): Json<ChangeRoleApiRequest>,
) -> Result<Json<MembershipResponse>, ApiError> {
    let team_id = parse_team_id(&team_id)?;
    let user_id = parse_user_id(&user_id)?;

    debug!(team = %team_id, user = %user_id, role = %request.role, "Changing member role");

    let membership = state
        .team_service
        .change_role(&team_id, &actor, &user_id, request.role)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(MembershipResponse::from(&membership)))
}

/// POST /team/{team_id}/transfer
pub async fn transfer_ownership(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    Path(team_id): Path<String>,
    Json(request): Json<TransferOwnershipApiRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team_id = parse_team_id(&team_id)?;
    let new_owner = parse_user_id(&request.new_owner_id)?;

    debug!(team = %team_id, new_owner = %new_owner, "Transferring ownership");

    let team = state
        .team_service
        .transfer_ownership(&team_id, &actor, &new_owner)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TeamResponse::from(&team)))
}
