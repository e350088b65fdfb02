//! Invitation repository trait

use async_trait::async_trait;

use super::entity::{Invitation, InvitationStatus};
use crate::domain::DomainError;

/// Repository for invitation rows keyed by token digest
///
/// State transitions go through `transition`, an atomic compare-and-set:
/// of two concurrent accepts for one token, exactly one wins and the
/// loser observes `InvitationNotPending`.
#[async_trait]
pub trait InvitationRepository: Send + Sync + std::fmt::Debug {
    /// Get an invitation by token digest
    async fn get(&self, token_digest: &str) -> Result<Option<Invitation>, DomainError>;

    /// Store a pending invitation, atomically superseding any existing
    /// pending row for the same `(team, email)` slot. The superseded
    /// row is deleted, which invalidates its token.
    async fn put_pending(&self, invitation: Invitation) -> Result<Invitation, DomainError>;

    /// Compare-and-set state transition.
    ///
    /// Fails with `InvitationNotFound` for an unknown digest and with
    /// `InvitationNotPending` when the current status is not `from`.
    async fn transition(
        &self,
        token_digest: &str,
        from: InvitationStatus,
        to: InvitationStatus,
    ) -> Result<Invitation, DomainError>;

    /// All pending invitations (reaper input)
    async fn list_pending(&self) -> Result<Vec<Invitation>, DomainError>;
}
