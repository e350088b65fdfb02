//! Membership entity linking a user to a team with a role

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::role::TeamRole;
use crate::domain::team::{TeamId, UserId};

/// Status of a membership
///
/// Removed rows are kept so the `(team, user)` pair stays unique; a
/// later re-invite revives the row instead of inserting a second one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    #[default]
    Active,
    Removed,
}

impl MembershipStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

/// Membership entity, unique per `(team_id, user_id)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    team_id: TeamId,
    user_id: UserId,
    role: TeamRole,
    status: MembershipStatus,
    joined_at: DateTime<Utc>,
    /// Who invited this user, when membership came from an invitation
    invited_by: Option<UserId>,
}

impl Membership {
    /// Create a new active membership
    pub fn new(team_id: TeamId, user_id: UserId, role: TeamRole) -> Self {
        Self {
            team_id,
            user_id,
            role,
            status: MembershipStatus::Active,
            joined_at: Utc::now(),
            invited_by: None,
        }
    }

    /// Set who invited this user
    pub fn with_inviter(mut self, inviter: UserId) -> Self {
        self.invited_by = Some(inviter);
        self
    }

    pub fn team_id(&self) -> &TeamId {
        &self.team_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn role(&self) -> TeamRole {
        self.role
    }

    pub fn status(&self) -> MembershipStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    pub fn invited_by(&self) -> Option<&UserId> {
        self.invited_by.as_ref()
    }

    /// Change the member's role
    pub fn set_role(&mut self, role: TeamRole) {
        self.role = role;
    }

    /// Mark the membership removed
    pub fn remove(&mut self) {
        self.status = MembershipStatus::Removed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn membership(role: TeamRole) -> Membership {
        Membership::new(
            TeamId::new("t1").unwrap(),
            UserId::new("u1").unwrap(),
            role,
        )
    }

    #[test]
    fn test_new_membership_is_active() {
        let m = membership(TeamRole::Editor);

        assert!(m.is_active());
        assert_eq!(m.role(), TeamRole::Editor);
        assert!(m.invited_by().is_none());
    }

    #[test]
    fn test_with_inviter() {
        let m = membership(TeamRole::Viewer).with_inviter(UserId::new("u9").unwrap());
        assert_eq!(m.invited_by().unwrap().as_str(), "u9");
    }

    #[test]
    fn test_remove() {
        let mut m = membership(TeamRole::Viewer);
        m.remove();

        assert!(!m.is_active());
        assert_eq!(m.status(), MembershipStatus::Removed);
    }

    #[test]
    fn test_set_role() {
        let mut m = membership(TeamRole::Viewer);
        m.set_role(TeamRole::Admin);
        assert_eq!(m.role(), TeamRole::Admin);
    }
}
