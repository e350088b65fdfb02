//! Authorization gate aggregating memberships and share grants

use std::sync::Arc;

use tracing::debug;

use crate::domain::share::{ContentId, SharePermission};
use crate::domain::team::UserId;
use crate::domain::DomainError;
use crate::infrastructure::sharing::SharingService;
use crate::infrastructure::team::TeamService;

/// Stateless adjudicator for team-mediated content access.
///
/// A user may perform an operation on a content item when any team they
/// are an active member of holds a share grant covering the required
/// permission tier. Content ownership lives outside this service; owners
/// are assumed to pass upstream and never reach this gate.
#[derive(Debug)]
pub struct AuthorizationGate {
    teams: Arc<TeamService>,
    sharing: Arc<SharingService>,
}

impl AuthorizationGate {
    /// Create a new authorization gate
    pub fn new(teams: Arc<TeamService>, sharing: Arc<SharingService>) -> Self {
        Self { teams, sharing }
    }

    /// Whether the user may perform an operation on a content item
    pub async fn can_access(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
        operation: SharePermission,
    ) -> Result<bool, DomainError> {
        for membership in self.teams.memberships_for_user(user_id).await? {
            if let Some(share) = self
                .sharing
                .find_share(content_id, membership.team_id())
                .await?
            {
                if share.covers(operation) {
                    debug!(
                        user = %user_id,
                        content = %content_id,
                        team = %membership.team_id(),
                        operation = %operation,
                        "Access granted"
                    );
                    return Ok(true);
                }
            }
        }

        debug!(user = %user_id, content = %content_id, operation = %operation, "Access denied");
        Ok(false)
    }
}
