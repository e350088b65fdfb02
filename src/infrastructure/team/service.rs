//! Team service for team and membership management

use std::sync::Arc;

use tracing::info;

use crate::domain::membership::{Membership, MembershipRepository};
use crate::domain::role::TeamRole;
use crate::domain::team::{Team, TeamId, TeamRepository, UserId};
use crate::domain::DomainError;

/// Team service owning the team and membership invariants
///
/// Every authority decision funnels through the actor's own active
/// membership in the target team; roles held in other teams carry no
/// weight here.
#[derive(Debug)]
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    memberships: Arc<dyn MembershipRepository>,
}

impl TeamService {
    /// Create a new team service
    pub fn new(teams: Arc<dyn TeamRepository>, memberships: Arc<dyn MembershipRepository>) -> Self {
        Self { teams, memberships }
    }

    /// Create a new team with the creator as its sole owner
    pub async fn create(&self, name: &str, owner_id: UserId) -> Result<Team, DomainError> {
        info!(name = %name, owner = %owner_id, "Creating team");

        let team = Team::new(name, owner_id.clone())
            .map_err(|e| DomainError::invalid_input(e.to_string()))?;

        let team = self.teams.create(team).await?;

        // The creator's owner membership is born with the team
        let membership = Membership::new(team.id().clone(), owner_id, TeamRole::Owner);
        self.memberships.insert_active(membership).await?;

        Ok(team)
    }

    /// Get a team by ID
    pub async fn get(&self, team_id: &TeamId) -> Result<Team, DomainError> {
        self.teams
            .get(team_id)
            .await?
            .ok_or_else(|| DomainError::team_not_found(team_id.as_str()))
    }

    /// The user's active membership in a team, if any
    pub async fn membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<Option<Membership>, DomainError> {
        Ok(self
            .memberships
            .get(team_id, user_id)
            .await?
            .filter(|m| m.is_active()))
    }

    /// The actor's role in a team, or `NotAuthorized` for non-members
    async fn actor_role(&self, team_id: &TeamId, actor: &UserId) -> Result<TeamRole, DomainError> {
        self.membership(team_id, actor)
            .await?
            .map(|m| m.role())
            .ok_or_else(|| {
                DomainError::not_authorized(format!(
                    "User '{}' is not a member of team '{}'",
                    actor, team_id
                ))
            })
    }

    /// Add a member directly, on the actor's authority.
    ///
    /// The actor must hold a role strictly above the one being assigned,
    /// which also rules out granting owner.
    pub async fn add_membership(
        &self,
        team_id: &TeamId,
        actor: &UserId,
        user_id: UserId,
        role: TeamRole,
    ) -> Result<Membership, DomainError> {
        info!(team = %team_id, user = %user_id, role = %role, "Adding member");

        self.get(team_id).await?;

        let actor_role = self.actor_role(team_id, actor).await?;
        if !actor_role.outranks(role) {
            return Err(DomainError::not_authorized(format!(
                "Role '{}' does not outrank '{}'",
                actor_role, role
            )));
        }

        let membership = Membership::new(team_id.clone(), user_id, role);
        self.memberships.insert_active(membership).await
    }

    /// Materialize a membership from an accepted invitation.
    ///
    /// Authority was checked when the invitation was issued; none is
    /// re-checked here.
    pub async fn add_invited_member(
        &self,
        team_id: &TeamId,
        user_id: UserId,
        role: TeamRole,
        invited_by: UserId,
    ) -> Result<Membership, DomainError> {
        self.get(team_id).await?;

        let membership =
            Membership::new(team_id.clone(), user_id, role).with_inviter(invited_by);
        self.memberships.insert_active(membership).await
    }

    /// Remove a member from a team.
    ///
    /// Any member may remove themselves; removing someone else requires
    /// strictly higher rank. The owner can never be removed, that would
    /// leave the team ownerless.
    pub async fn remove_membership(
        &self,
        team_id: &TeamId,
        actor: &UserId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        info!(team = %team_id, user = %user_id, "Removing member");

        self.get(team_id).await?;

        let mut target = self.membership(team_id, user_id).await?.ok_or_else(|| {
            DomainError::membership_not_found(team_id.as_str(), user_id.as_str())
        })?;

        if actor != user_id {
            let actor_role = self.actor_role(team_id, actor).await?;
            if !actor_role.outranks(target.role()) {
                return Err(DomainError::not_authorized(format!(
                    "Role '{}' does not outrank '{}'",
                    actor_role,
                    target.role()
                )));
            }
        }

        if target.role() == TeamRole::Owner {
            return Err(DomainError::last_owner(team_id.as_str()));
        }

        target.remove();
        self.memberships.update(target).await?;
        Ok(())
    }

    /// Change a member's role.
    ///
    /// The actor must outrank both the member's current role and the new
    /// one. Owner is unreachable through this path; ownership moves only
    /// via [`TeamService::transfer_ownership`].
    pub async fn change_role(
        &self,
        team_id: &TeamId,
        actor: &UserId,
        user_id: &UserId,
        new_role: TeamRole,
    ) -> Result<Membership, DomainError> {
        info!(team = %team_id, user = %user_id, role = %new_role, "Changing member role");

        self.get(team_id).await?;

        let mut target = self.membership(team_id, user_id).await?.ok_or_else(|| {
            DomainError::membership_not_found(team_id.as_str(), user_id.as_str())
        })?;

        let actor_role = self.actor_role(team_id, actor).await?;
        if !actor_role.outranks(target.role()) || !actor_role.outranks(new_role) {
            return Err(DomainError::not_authorized(format!(
                "Role '{}' does not outrank both '{}' and '{}'",
                actor_role,
                target.role(),
                new_role
            )));
        }

        target.set_role(new_role);
        self.memberships.update(target).await
    }

    /// Transfer ownership to another active member.
    ///
    /// The previous owner steps down to admin, so the team holds exactly
    /// one owner before and after.
    pub async fn transfer_ownership(
        &self,
        team_id: &TeamId,
        actor: &UserId,
        new_owner: &UserId,
    ) -> Result<Team, DomainError> {
        info!(team = %team_id, new_owner = %new_owner, "Transferring ownership");

        let mut team = self.get(team_id).await?;

        let mut actor_membership = self.membership(team_id, actor).await?.ok_or_else(|| {
            DomainError::not_authorized(format!(
                "User '{}' is not a member of team '{}'",
                actor, team_id
            ))
        })?;

        if actor_membership.role() != TeamRole::Owner {
            return Err(DomainError::not_authorized(
                "Only the owner can transfer ownership",
            ));
        }

        if actor == new_owner {
            return Err(DomainError::invalid_input(
                "Cannot transfer ownership to the current owner",
            ));
        }

        let mut target = self.membership(team_id, new_owner).await?.ok_or_else(|| {
            DomainError::membership_not_found(team_id.as_str(), new_owner.as_str())
        })?;

        target.set_role(TeamRole::Owner);
        actor_membership.set_role(TeamRole::Admin);

        // One atomic write, so no reader ever sees two owners
        self.memberships
            .update_pair(target, actor_membership)
            .await?;

        team.set_owner(new_owner.clone());
        self.teams.update(team).await
    }

    /// All active memberships of a team
    pub async fn list_members(&self, team_id: &TeamId) -> Result<Vec<Membership>, DomainError> {
        self.get(team_id).await?;

        Ok(self
            .memberships
            .list_for_team(team_id)
            .await?
            .into_iter()
            .filter(|m| m.is_active())
            .collect())
    }

    /// All active memberships of a user, across teams
    pub async fn memberships_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Membership>, DomainError> {
        Ok(self
            .memberships
            .list_for_user(user_id)
            .await?
            .into_iter()
            .filter(|m| m.is_active())
            .collect())
    }
}
