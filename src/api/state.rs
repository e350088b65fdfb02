//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::invitation::InvitationService;
use crate::infrastructure::sharing::SharingService;
use crate::infrastructure::team::TeamService;
use crate::infrastructure::AuthorizationGate;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub team_service: Arc<TeamService>,
    pub invitation_service: Arc<InvitationService>,
    pub sharing_service: Arc<SharingService>,
    pub authorization: Arc<AuthorizationGate>,
}

impl AppState {
    pub fn new(
        team_service: Arc<TeamService>,
        invitation_service: Arc<InvitationService>,
        sharing_service: Arc<SharingService>,
        authorization: Arc<AuthorizationGate>,
    ) -> Self {
        Self {
            team_service,
            invitation_service,
            sharing_service,
            authorization,
        }
    }
}
