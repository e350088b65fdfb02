//! Content Collab
//!
//! Team-based collaboration and content authorization service:
//! - Teams with role-based memberships (owner/admin/editor/viewer)
//! - Email invitations with single-use, expiring tokens
//! - Content share grants between teams and content items
//! - An authorization gate aggregating memberships and grants

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::invitation::{
    InMemoryInvitationRepository, InvitationService, InvitationTokenGenerator,
};
use infrastructure::membership::InMemoryMembershipRepository;
use infrastructure::sharing::{InMemoryShareRepository, SharingService};
use infrastructure::team::{InMemoryTeamRepository, TeamService};
use infrastructure::AuthorizationGate;

/// Create the application state with all services initialized
pub fn create_app_state(config: &AppConfig) -> AppState {
    let team_service = Arc::new(TeamService::new(
        Arc::new(InMemoryTeamRepository::new()),
        Arc::new(InMemoryMembershipRepository::new()),
    ));

    let invitation_service = Arc::new(InvitationService::new(
        Arc::new(InMemoryInvitationRepository::new()),
        team_service.clone(),
        InvitationTokenGenerator::default(),
        config.invitation.expiry_days,
    ));

    let sharing_service = Arc::new(SharingService::new(
        Arc::new(InMemoryShareRepository::new()),
        team_service.clone(),
    ));

    let authorization = Arc::new(AuthorizationGate::new(
        team_service.clone(),
        sharing_service.clone(),
    ));

    AppState::new(
        team_service,
        invitation_service,
        sharing_service,
        authorization,
    )
}
