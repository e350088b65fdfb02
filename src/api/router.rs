//! HTTP router assembly

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::api::state::AppState;
use crate::api::{health, invitations, sharing, teams};

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Teams and memberships
        .route("/team", post(teams::create_team))
        .route("/team/{team_id}", get(teams::get_team))
        .route(
            "/team/{team_id}/member/{user_id}",
            axum::routing::delete(teams::remove_member),
        )
        .route(
            "/team/{team_id}/member/{user_id}/role",
            put(teams::change_member_role),
        )
        .route("/team/{team_id}/transfer", post(teams::transfer_ownership))
        // Invitations
        .route("/team/{team_id}/invite", post(invitations::invite_members))
        .route("/invitation/accept", post(invitations::accept_invitation))
        .route("/invitation/revoke", post(invitations::revoke_invitation))
        // Content sharing
        .route(
            "/team/{team_id}/content/{content_id}/share",
            post(sharing::share_content)
                .get(sharing::get_share)
                .delete(sharing::revoke_share),
        )
        .route("/content/{content_id}/access", get(sharing::check_access))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
