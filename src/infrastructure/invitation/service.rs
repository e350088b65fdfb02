//! Invitation service owning the invitation lifecycle

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use super::token::InvitationTokenGenerator;
use crate::domain::invitation::{
    EmailAddress, Invitation, InvitationRepository, InvitationStatus,
};
use crate::domain::membership::Membership;
use crate::domain::role::{Capability, TeamRole};
use crate::domain::team::{TeamId, UserId};
use crate::domain::DomainError;
use crate::infrastructure::team::TeamService;

/// A freshly issued invitation together with its raw token.
///
/// The token exists only in this value; storage keeps the digest. It is
/// handed to the delivery channel once and never recoverable afterwards.
#[derive(Debug, Clone)]
pub struct IssuedInvitation {
    pub invitation: Invitation,
    pub token: String,
}

/// Per-email outcome of a batch invite
#[derive(Debug)]
pub enum InviteOutcome {
    Invited(IssuedInvitation),
    InvalidEmail { email: String, reason: String },
}

/// Invitation service
#[derive(Debug)]
pub struct InvitationService {
    invitations: Arc<dyn InvitationRepository>,
    teams: Arc<TeamService>,
    generator: InvitationTokenGenerator,
    expiry_days: i64,
}

impl InvitationService {
    /// Create a new invitation service
    pub fn new(
        invitations: Arc<dyn InvitationRepository>,
        teams: Arc<TeamService>,
        generator: InvitationTokenGenerator,
        expiry_days: i64,
    ) -> Self {
        Self {
            invitations,
            teams,
            generator,
            expiry_days,
        }
    }

    /// Invite an email address to join a team with a role.
    ///
    /// The actor must hold a role strictly above the offered one, which
    /// also rules out offering owner. A repeat invite for the same
    /// `(team, email)` supersedes the earlier pending one and invalidates
    /// its token.
    pub async fn invite(
        &self,
        team_id: &TeamId,
        actor: &UserId,
        email: EmailAddress,
        role: TeamRole,
    ) -> Result<IssuedInvitation, DomainError> {
        info!(team = %team_id, email = %email, role = %role, "Issuing invitation");

        self.check_invite_authority(team_id, actor, role).await?;
        self.issue(team_id, actor, email, role).await
    }

    /// Invite a batch of email addresses with one role.
    ///
    /// Authority is checked once up front; a failed check aborts the
    /// whole batch. Individual addresses that fail validation produce a
    /// per-email outcome instead of failing the batch.
    pub async fn invite_many(
        &self,
        team_id: &TeamId,
        actor: &UserId,
        emails: Vec<String>,
        role: TeamRole,
    ) -> Result<Vec<InviteOutcome>, DomainError> {
        info!(team = %team_id, count = emails.len(), role = %role, "Issuing batch invitations");

        self.check_invite_authority(team_id, actor, role).await?;

        let mut outcomes = Vec::with_capacity(emails.len());

        for raw in emails {
            match EmailAddress::new(&raw) {
                Ok(email) => {
                    let issued = self.issue(team_id, actor, email, role).await?;
                    outcomes.push(InviteOutcome::Invited(issued));
                }
                Err(e) => outcomes.push(InviteOutcome::InvalidEmail {
                    email: raw,
                    reason: e.to_string(),
                }),
            }
        }

        Ok(outcomes)
    }

    async fn check_invite_authority(
        &self,
        team_id: &TeamId,
        actor: &UserId,
        role: TeamRole,
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

        if !actor_role.outranks(role) {
            return Err(DomainError::not_authorized(format!(
                "Role '{}' does not outrank '{}'",
                actor_role, role
            )));
        }

        Ok(())
    }

    async fn issue(
        &self,
        team_id: &TeamId,
        actor: &UserId,
        email: EmailAddress,
        role: TeamRole,
    ) -> Result<IssuedInvitation, DomainError> {
        let generated = self.generator.generate();
        let expires_at = Utc::now() + Duration::days(self.expiry_days);

        let invitation = Invitation::new(
            generated.digest,
            team_id.clone(),
            email,
            role,
            actor.clone(),
            expires_at,
        )
        .map_err(|e| DomainError::invalid_input(e.to_string()))?;

        let invitation = self.invitations.put_pending(invitation).await?;

        Ok(IssuedInvitation {
            invitation,
            token: generated.token,
        })
    }

    /// Accept an invitation by raw token, joining the accepting user to
    /// the team.
    ///
    /// The pending-to-accepted transition is a compare-and-set, so a
    /// token is consumed exactly once even under concurrent accepts. If
    /// the user already holds an active membership the accept folds into
    /// it and the existing membership is returned unchanged.
    pub async fn accept(&self, token: &str, user_id: &UserId) -> Result<Membership, DomainError> {
        let digest = self.generator.digest(token);

        let invitation = self
            .invitations
            .get(&digest)
            .await?
            .ok_or(DomainError::InvitationNotFound)?;

        if invitation.status().is_pending() && invitation.is_expired_at(Utc::now()) {
            // Settle the row lazily; losing this race to another accept
            // or the reaper changes nothing for the caller
            let _ = self
                .invitations
                .transition(&digest, InvitationStatus::Pending, InvitationStatus::Expired)
                .await;
            return Err(DomainError::InvitationExpired);
        }

        match invitation.status() {
            InvitationStatus::Pending => {}
            // A row the sweeper already settled reads the same as one
            // settled lazily above
            InvitationStatus::Expired => return Err(DomainError::InvitationExpired),
            InvitationStatus::Accepted | InvitationStatus::Revoked => {
                return Err(DomainError::InvitationNotPending)
            }
        }

        let accepted = self
            .invitations
            .transition(&digest, InvitationStatus::Pending, InvitationStatus::Accepted)
            .await?;

        info!(team = %accepted.team_id(), user = %user_id, "Invitation accepted");

        match self
            .teams
            .add_invited_member(
                accepted.team_id(),
                user_id.clone(),
                accepted.role(),
                accepted.invited_by().clone(),
            )
            .await
        {
            Ok(membership) => Ok(membership),
            Err(DomainError::DuplicateMembership { .. }) => {
                debug!(team = %accepted.team_id(), user = %user_id, "Accept folded into existing membership");
                self.teams
                    .membership(accepted.team_id(), user_id)
                    .await?
                    .ok_or_else(|| {
                        DomainError::internal("Active membership vanished during accept")
                    })
            }
            Err(e) => Err(e),
        }
    }

    /// Revoke a pending invitation.
    ///
    /// Requires member-management authority (admin or owner) on the
    /// invitation's team.
    pub async fn revoke(&self, token: &str, actor: &UserId) -> Result<Invitation, DomainError> {
        let digest = self.generator.digest(token);

        let invitation = self
            .invitations
            .get(&digest)
            .await?
            .ok_or(DomainError::InvitationNotFound)?;

        let actor_role = self
            .teams
            .membership(invitation.team_id(), actor)
            .await?
            .map(|m| m.role())
            .ok_or_else(|| {
                DomainError::not_authorized(format!(
                    "User '{}' is not a member of team '{}'",
                    actor,
                    invitation.team_id()
                ))
            })?;

        if !actor_role.has_capability(Capability::ManageMembers) {
            return Err(DomainError::not_authorized(format!(
                "Role '{}' cannot manage members",
                actor_role
            )));
        }

        info!(team = %invitation.team_id(), "Revoking invitation");

        self.invitations
            .transition(&digest, InvitationStatus::Pending, InvitationStatus::Revoked)
            .await
    }

    /// Settle every pending invitation whose expiry window has passed at
    /// `now`. Returns how many rows were expired.
    pub async fn expire_stale(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let pending = self.invitations.list_pending().await?;
        let mut expired = 0;

        for invitation in pending {
            if !invitation.is_expired_at(now) {
                continue;
            }

            // A concurrent accept or revoke may win; that is fine
            if self
                .invitations
                .transition(
                    invitation.token_digest(),
                    InvitationStatus::Pending,
                    InvitationStatus::Expired,
                )
                .await
                .is_ok()
            {
                expired += 1;
            }
        }

        if expired > 0 {
            info!(count = expired, "Expired stale invitations");
        }

        Ok(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::invitation::InMemoryInvitationRepository;
    use crate::infrastructure::membership::InMemoryMembershipRepository;
    use crate::infrastructure::team::{InMemoryTeamRepository, TeamService};

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn email(addr: &str) -> EmailAddress {
        EmailAddress::new(addr).unwrap()
    }

    fn create_services() -> (Arc<TeamService>, InvitationService) {
        let teams = Arc::new(TeamService::new(
            Arc::new(InMemoryTeamRepository::new()),
            Arc::new(InMemoryMembershipRepository::new()),
        ));
        let invitations = InvitationService::new(
            Arc::new(InMemoryInvitationRepository::new()),
            teams.clone(),
            InvitationTokenGenerator::default(),
            7,
        );
        (teams, invitations)
    }

    #[tokio::test]
    async fn test_invite_returns_token_once() {
        let (teams, invitations) = create_services();
        let team = teams.create("Acme", user("alice")).await.unwrap();

        let issued = invitations
            .invite(team.id(), &user("alice"), email("bob@x.com"), TeamRole::Editor)
            .await
            .unwrap();

        assert!(issued.token.starts_with("inv_"));
        assert!(issued.invitation.token_digest().starts_with("sha256$"));
        assert!(issued.invitation.status().is_pending());
        assert_eq!(issued.invitation.role(), TeamRole::Editor);
    }

    #[tokio::test]
    async fn test_invite_requires_outranking() {
        let (teams, invitations) = create_services();
        let team = teams.create("Acme", user("alice")).await.unwrap();
        teams
            .add_membership(team.id(), &user("alice"), user("bob"), TeamRole::Editor)
            .await
            .unwrap();

        // Editor can invite a viewer but not a fellow editor
        invitations
            .invite(team.id(), &user("bob"), email("carol@x.com"), TeamRole::Viewer)
            .await
            .unwrap();

        let result = invitations
            .invite(team.id(), &user("bob"), email("dave@x.com"), TeamRole::Editor)
            .await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::NotAuthorized { .. }
        ));
    }

    #[tokio::test]
    async fn test_invite_never_offers_owner() {
        let (teams, invitations) = create_services();
        let team = teams.create("Acme", user("alice")).await.unwrap();

        let result = invitations
            .invite(team.id(), &user("alice"), email("bob@x.com"), TeamRole::Owner)
            .await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::NotAuthorized { .. }
        ));
    }

    #[tokio::test]
    async fn test_invite_unknown_team() {
        let (_, invitations) = create_services();

        let result = invitations
            .invite(
                &TeamId::generate(),
                &user("alice"),
                email("bob@x.com"),
                TeamRole::Viewer,
            )
            .await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::TeamNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_repeat_invite_invalidates_old_token() {
        let (teams, invitations) = create_services();
        let team = teams.create("Acme", user("alice")).await.unwrap();

        let first = invitations
            .invite(team.id(), &user("alice"), email("bob@x.com"), TeamRole::Viewer)
            .await
            .unwrap();
        let second = invitations
            .invite(team.id(), &user("alice"), email("bob@x.com"), TeamRole::Editor)
            .await
            .unwrap();

        let result = invitations.accept(&first.token, &user("bob")).await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::InvitationNotFound
        ));

        let membership = invitations.accept(&second.token, &user("bob")).await.unwrap();
        assert_eq!(membership.role(), TeamRole::Editor);
    }

    #[tokio::test]
    async fn test_invite_many_reports_per_email() {
        let (teams, invitations) = create_services();
        let team = teams.create("Acme", user("alice")).await.unwrap();

        let outcomes = invitations
            .invite_many(
                team.id(),
                &user("alice"),
                vec![
                    "bob@x.com".to_string(),
                    "not-an-email".to_string(),
                    "carol@x.com".to_string(),
                ],
                TeamRole::Viewer,
            )
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0], InviteOutcome::Invited(_)));
        assert!(matches!(outcomes[1], InviteOutcome::InvalidEmail { .. }));
        assert!(matches!(outcomes[2], InviteOutcome::Invited(_)));
    }

    #[tokio::test]
    async fn test_invite_many_aborts_on_bad_authority() {
        let (teams, invitations) = create_services();
        let team = teams.create("Acme", user("alice")).await.unwrap();
        teams
            .add_membership(team.id(), &user("alice"), user("bob"), TeamRole::Viewer)
            .await
            .unwrap();

        let result = invitations
            .invite_many(
                team.id(),
                &user("bob"),
                vec!["carol@x.com".to_string()],
                TeamRole::Viewer,
            )
            .await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::NotAuthorized { .. }
        ));
    }

    #[tokio::test]
    async fn test_accept_creates_membership() {
        let (teams, invitations) = create_services();
        let team = teams.create("Acme", user("alice")).await.unwrap();

        let issued = invitations
            .invite(team.id(), &user("alice"), email("bob@x.com"), TeamRole::Editor)
            .await
            .unwrap();

        let membership = invitations.accept(&issued.token, &user("bob")).await.unwrap();

        assert_eq!(membership.role(), TeamRole::Editor);
        assert_eq!(membership.invited_by().unwrap().as_str(), "alice");
        assert!(teams
            .membership(team.id(), &user("bob"))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_accept_is_single_use() {
        let (teams, invitations) = create_services();
        let team = teams.create("Acme", user("alice")).await.unwrap();

        let issued = invitations
            .invite(team.id(), &user("alice"), email("bob@x.com"), TeamRole::Editor)
            .await
            .unwrap();

        invitations.accept(&issued.token, &user("bob")).await.unwrap();

        let result = invitations.accept(&issued.token, &user("carol")).await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::InvitationNotPending
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_accepts_consume_token_once() {
        let (teams, invitations) = create_services();
        let invitations = Arc::new(invitations);
        let team = teams.create("Acme", user("alice")).await.unwrap();

        let issued = invitations
            .invite(team.id(), &user("alice"), email("bob@x.com"), TeamRole::Viewer)
            .await
            .unwrap();

        // Two users race for one token; the compare-and-set lets exactly
        // one through
        let first = tokio::spawn({
            let invitations = invitations.clone();
            let token = issued.token.clone();
            async move { invitations.accept(&token, &user("bob")).await }
        });
        let second = tokio::spawn({
            let invitations = invitations.clone();
            let token = issued.token.clone();
            async move { invitations.accept(&token, &user("carol")).await }
        });

        let results = [first.await.unwrap(), second.await.unwrap()];
        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);

        for result in results {
            if let Err(e) = result {
                assert!(matches!(e, DomainError::InvitationNotPending));
            }
        }

        // Owner plus the single winner
        assert_eq!(teams.list_members(team.id()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_accept_unknown_token() {
        let (_, invitations) = create_services();

        let result = invitations.accept("inv_bogus", &user("bob")).await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::InvitationNotFound
        ));
    }

    #[tokio::test]
    async fn test_accept_expired_token() {
        let (teams, _) = create_services();
        let team = teams.create("Acme", user("alice")).await.unwrap();

        // Negative expiry window makes the invitation stale immediately
        let repo = Arc::new(InMemoryInvitationRepository::new());
        let invitations = InvitationService::new(
            repo.clone(),
            teams.clone(),
            InvitationTokenGenerator::default(),
            -1,
        );

        let issued = invitations
            .invite(team.id(), &user("alice"), email("bob@x.com"), TeamRole::Viewer)
            .await
            .unwrap();

        let result = invitations.accept(&issued.token, &user("bob")).await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::InvitationExpired
        ));

        // The row is settled to expired, not left pending
        let row = repo
            .get(issued.invitation.token_digest())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.status(), InvitationStatus::Expired);
    }

    #[tokio::test]
    async fn test_accept_folds_into_existing_membership() {
        let (teams, invitations) = create_services();
        let team = teams.create("Acme", user("alice")).await.unwrap();
        teams
            .add_membership(team.id(), &user("alice"), user("bob"), TeamRole::Admin)
            .await
            .unwrap();

        let issued = invitations
            .invite(team.id(), &user("alice"), email("bob@x.com"), TeamRole::Viewer)
            .await
            .unwrap();

        // Bob already belongs; the accept succeeds and keeps his role
        let membership = invitations.accept(&issued.token, &user("bob")).await.unwrap();
        assert_eq!(membership.role(), TeamRole::Admin);
    }

    #[tokio::test]
    async fn test_revoke() {
        let (teams, invitations) = create_services();
        let team = teams.create("Acme", user("alice")).await.unwrap();

        let issued = invitations
            .invite(team.id(), &user("alice"), email("bob@x.com"), TeamRole::Viewer)
            .await
            .unwrap();

        let revoked = invitations.revoke(&issued.token, &user("alice")).await.unwrap();
        assert_eq!(revoked.status(), InvitationStatus::Revoked);

        let result = invitations.accept(&issued.token, &user("bob")).await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::InvitationNotPending
        ));
    }

    #[tokio::test]
    async fn test_revoke_requires_member_management() {
        let (teams, invitations) = create_services();
        let team = teams.create("Acme", user("alice")).await.unwrap();
        teams
            .add_membership(team.id(), &user("alice"), user("bob"), TeamRole::Editor)
            .await
            .unwrap();

        let issued = invitations
            .invite(team.id(), &user("alice"), email("carol@x.com"), TeamRole::Viewer)
            .await
            .unwrap();

        let result = invitations.revoke(&issued.token, &user("bob")).await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::NotAuthorized { .. }
        ));
    }

    #[tokio::test]
    async fn test_expire_stale() {
        let (teams, _) = create_services();
        let team = teams.create("Acme", user("alice")).await.unwrap();

        let repo = Arc::new(InMemoryInvitationRepository::new());
        let invitations = InvitationService::new(
            repo.clone(),
            teams.clone(),
            InvitationTokenGenerator::default(),
            7,
        );

        let issued = invitations
            .invite(team.id(), &user("alice"), email("bob@x.com"), TeamRole::Viewer)
            .await
            .unwrap();
        invitations
            .invite(team.id(), &user("alice"), email("carol@x.com"), TeamRole::Viewer)
            .await
            .unwrap();

        // Nothing is stale yet
        assert_eq!(invitations.expire_stale(Utc::now()).await.unwrap(), 0);

        let later = Utc::now() + Duration::days(8);
        assert_eq!(invitations.expire_stale(later).await.unwrap(), 2);
        assert!(repo.list_pending().await.unwrap().is_empty());

        // Idempotent
        assert_eq!(invitations.expire_stale(later).await.unwrap(), 0);

        // Accepting a swept token still reports expiry
        let result = invitations.accept(&issued.token, &user("bob")).await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::InvitationExpired
        ));
    }
}
