//! Membership repository trait

use async_trait::async_trait;

use super::entity::Membership;
use crate::domain::team::{TeamId, UserId};
use crate::domain::DomainError;

/// Repository for membership rows keyed by `(team_id, user_id)`
///
/// `insert_active` is the uniqueness guard for the pair: it must be an
/// atomic conditional write, so two concurrent inserts for the same pair
/// produce exactly one active membership and one `DuplicateMembership`.
#[async_trait]
pub trait MembershipRepository: Send + Sync + std::fmt::Debug {
    /// Get the membership row for a pair, active or removed
    async fn get(&self, team_id: &TeamId, user_id: &UserId)
        -> Result<Option<Membership>, DomainError>;

    /// Insert an active membership.
    ///
    /// Fails with `DuplicateMembership` if an active row exists for the
    /// pair; a removed row is replaced (re-join after removal).
    async fn insert_active(&self, membership: Membership) -> Result<Membership, DomainError>;

    /// Update an existing membership row
    async fn update(&self, membership: Membership) -> Result<Membership, DomainError>;

    /// Update two membership rows as one atomic write.
    ///
    /// Either both rows are replaced or neither is, and no reader can
    /// observe just one side of the pair. This is what keeps an
    /// ownership transfer from ever exposing two owners.
    async fn update_pair(
        &self,
        first: Membership,
        second: Membership,
    ) -> Result<(), DomainError>;

    /// All membership rows for a team
    async fn list_for_team(&self, team_id: &TeamId) -> Result<Vec<Membership>, DomainError>;

    /// All membership rows for a user across teams
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Membership>, DomainError>;
}
