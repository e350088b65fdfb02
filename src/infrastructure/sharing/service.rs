//! Sharing service owning content share grants

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;

use crate::domain::role::Capability;
use crate::domain::share::{ContentId, ContentShare, SharePermission, ShareRepository};
use crate::domain::team::{TeamId, UserId};
use crate::domain::DomainError;
use crate::infrastructure::team::TeamService;

/// Sharing service
#[derive(Debug)]
pub struct SharingService {
    shares: Arc<dyn ShareRepository>,
    teams: Arc<TeamService>,
}

impl SharingService {
    /// Create a new sharing service
    pub fn new(shares: Arc<dyn ShareRepository>, teams: Arc<TeamService>) -> Self {
        Self { shares, teams }
    }

    async fn check_share_authority(
        &self,
        team_id: &TeamId,
        actor: &UserId,
    ) -> Result<(), DomainError> {
        self.teams.get(team_id).await?;

        let actor_role = self
            .teams
            .membership(team_id, actor)
            .await?
            .map(|m| m.role())
            .ok_or_else(|| {
                DomainError::not_authorized(format!(
                    "User '{}' is not a member of team '{}'",
                    actor, team_id
                ))
            })?;

        if !actor_role.has_capability(Capability::ManageShares) {
            return Err(DomainError::not_authorized(format!(
                "Role '{}' cannot manage shares",
                actor_role
            )));
        }

        Ok(())
    }

    /// Grant a team permissions over a content item.
    ///
    /// Requires share-management authority (admin or owner) on the team.
    /// A repeat grant for the same `(content, team)` replaces the
    /// permission set wholesale.
    pub async fn share_content(
        &self,
        content_id: ContentId,
        team_id: &TeamId,
        permissions: BTreeSet<SharePermission>,
        actor: &UserId,
    ) -> Result<ContentShare, DomainError> {
        info!(content = %content_id, team = %team_id, "Sharing content");

        self.check_share_authority(team_id, actor).await?;

        let share = ContentShare::new(content_id, team_id.clone(), permissions, actor.clone())
            .map_err(|e| DomainError::invalid_input(e.to_string()))?;

        self.shares.upsert(share).await
    }

    /// Revoke a team's grant over a content item.
    ///
    /// Same authority rule as granting; revoking an absent grant is a
    /// no-op.
    pub async fn revoke_share(
        &self,
        content_id: &ContentId,
        team_id: &TeamId,
        actor: &UserId,
    ) -> Result<(), DomainError> {
        info!(content = %content_id, team = %team_id, "Revoking share");

        self.check_share_authority(team_id, actor).await?;

        self.shares.remove(content_id, team_id).await?;
        Ok(())
    }

    /// Get the grant for a `(content, team)` pair
    pub async fn get_share(
        &self,
        content_id: &ContentId,
        team_id: &TeamId,
    ) -> Result<ContentShare, DomainError> {
        self.shares
            .get(content_id, team_id)
            .await?
            .ok_or_else(|| {
                DomainError::content_not_found(content_id.as_str(), team_id.as_str())
            })
    }

    /// Grant lookup that treats absence as a normal answer
    pub async fn find_share(
        &self,
        content_id: &ContentId,
        team_id: &TeamId,
    ) -> Result<Option<ContentShare>, DomainError> {
        self.shares.get(content_id, team_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::role::TeamRole;
    use crate::domain::team::Team;
    use crate::infrastructure::membership::InMemoryMembershipRepository;
    use crate::infrastructure::sharing::InMemoryShareRepository;
    use crate::infrastructure::team::InMemoryTeamRepository;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn content(id: &str) -> ContentId {
        ContentId::new(id).unwrap()
    }

    fn perms(list: &[SharePermission]) -> BTreeSet<SharePermission> {
        list.iter().copied().collect()
    }

    fn create_services() -> (Arc<TeamService>, SharingService) {
        let teams = Arc::new(TeamService::new(
            Arc::new(InMemoryTeamRepository::new()),
            Arc::new(InMemoryMembershipRepository::new()),
        ));
        let sharing = SharingService::new(Arc::new(InMemoryShareRepository::new()), teams.clone());
        (teams, sharing)
    }

    async fn team_with_members(teams: &TeamService) -> Team {
        let team = teams.create("Acme", user("alice")).await.unwrap();
        teams
            .add_membership(team.id(), &user("alice"), user("bob"), TeamRole::Admin)
            .await
            .unwrap();
        teams
            .add_membership(team.id(), &user("alice"), user("carol"), TeamRole::Editor)
            .await
            .unwrap();
        team
    }

    #[tokio::test]
    async fn test_share_content() {
        let (teams, sharing) = create_services();
        let team = team_with_members(&teams).await;

        let share = sharing
            .share_content(
                content("c42"),
                team.id(),
                perms(&[SharePermission::View, SharePermission::Edit]),
                &user("bob"),
            )
            .await
            .unwrap();

        assert!(share.covers(SharePermission::Edit));
        assert_eq!(share.granted_by().as_str(), "bob");
    }

    #[tokio::test]
    async fn test_share_requires_manage_shares() {
        let (teams, sharing) = create_services();
        let team = team_with_members(&teams).await;

        // Editors cannot manage shares
        let result = sharing
            .share_content(
                content("c42"),
                team.id(),
                perms(&[SharePermission::View]),
                &user("carol"),
            )
            .await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::NotAuthorized { .. }
        ));
    }

    #[tokio::test]
    async fn test_share_rejects_empty_permissions() {
        let (teams, sharing) = create_services();
        let team = team_with_members(&teams).await;

        let result = sharing
            .share_content(content("c42"), team.id(), BTreeSet::new(), &user("alice"))
            .await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::InvalidInput { .. }
        ));
    }

    #[tokio::test]
    async fn test_repeat_grant_replaces_wholesale() {
        let (teams, sharing) = create_services();
        let team = team_with_members(&teams).await;

        sharing
            .share_content(
                content("c42"),
                team.id(),
                perms(&[SharePermission::View, SharePermission::Edit]),
                &user("alice"),
            )
            .await
            .unwrap();

        let replaced = sharing
            .share_content(
                content("c42"),
                team.id(),
                perms(&[SharePermission::Comment]),
                &user("bob"),
            )
            .await
            .unwrap();

        assert!(!replaced.covers(SharePermission::Edit));
        assert_eq!(replaced.granted_by().as_str(), "bob");
    }

    #[tokio::test]
    async fn test_revoke_share_is_idempotent() {
        let (teams, sharing) = create_services();
        let team = team_with_members(&teams).await;

        sharing
            .share_content(
                content("c42"),
                team.id(),
                perms(&[SharePermission::View]),
                &user("alice"),
            )
            .await
            .unwrap();

        sharing
            .revoke_share(&content("c42"), team.id(), &user("alice"))
            .await
            .unwrap();

        // Revoking again is a no-op
        sharing
            .revoke_share(&content("c42"), team.id(), &user("alice"))
            .await
            .unwrap();

        let result = sharing.get_share(&content("c42"), team.id()).await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::ContentNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_get_share_absent() {
        let (teams, sharing) = create_services();
        let team = team_with_members(&teams).await;

        let result = sharing.get_share(&content("ghost"), team.id()).await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::ContentNotFound { .. }
        ));

        assert!(sharing
            .find_share(&content("ghost"), team.id())
            .await
            .unwrap()
            .is_none());
    }
}
