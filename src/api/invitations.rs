//! Invitation endpoints
//!
//! Raw tokens are never echoed back over the API; they leave the service
//! only through the delivery channel that emails them to the invitee.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::teams::{parse_team_id, MembershipResponse};
use crate::api::types::ApiError;
use crate::domain::role::TeamRole;
use crate::infrastructure::invitation::InviteOutcome;

/// Request to invite a batch of email addresses
#[derive(Debug, Clone, Deserialize)]
pub struct InviteApiRequest {
    pub emails: Vec<String>,
    pub role: TeamRole,
}

/// Per-email invite result
#[derive(Debug, Clone, Serialize)]
pub struct InviteResultEntry {
    pub email: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Batch invite response
#[derive(Debug, Clone, Serialize)]
pub struct InviteApiResponse {
    pub results: Vec<InviteResultEntry>,
}

/// Request carrying a raw invitation token
#[derive(Debug, Clone, Deserialize)]
pub struct TokenApiRequest {
    pub token: String,
}

/// POST /team/{team_id}/invite
pub async fn invite_members(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    Path(team_id): Path<String>,
    Json(request): Json<InviteApiRequest>,
) -> Result<Json<InviteApiResponse>, ApiError> {
    let team_id = parse_team_id(&team_id)?;

    if request.emails.is_empty() {
        return Err(ApiError::bad_request("No email addresses provided"));
    }

    debug!(team = %team_id, count = request.emails.len(), "Inviting members");

    let outcomes = state
        .invitation_service
        .invite_many(&team_id, &actor, request.emails, request.role)
        .await
        .map_err(ApiError::from)?;

    let results = outcomes
        .into_iter()
        .map(|outcome| match outcome {
            InviteOutcome::Invited(issued) => InviteResultEntry {
                email: issued.invitation.email().as_str().to_string(),
                status: "invited".to_string(),
                reason: None,
            },
            InviteOutcome::InvalidEmail { email, reason } => InviteResultEntry {
                email,
                status: "invalid_email".to_string(),
                reason: Some(reason),
            },
        })
        .collect();

    Ok(Json(InviteApiResponse { results }))
}

/// POST /invitation/accept
pub async fn accept_invitation(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Json(request): Json<TokenApiRequest>,
) -> Result<Json<MembershipResponse>, ApiError> {
    debug!(user = %user_id, "Accepting invitation");

    let membership = state
        .invitation_service
        .accept(&request.token, &user_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(MembershipResponse::from(&membership)))
}

/// POST /invitation/revoke
pub async fn revoke_invitation(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    Json(request): Json<TokenApiRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(actor = %actor, "Revoking invitation");

    let invitation = state
        .invitation_service
        .revoke(&request.token, &actor)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({
        "status": invitation.status().to_string(),
        "team_id": invitation.team_id().as_str(),
        "email": invitation.email().as_str()
    })))
}
