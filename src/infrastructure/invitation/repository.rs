//! In-memory invitation repository

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::invitation::{Invitation, InvitationRepository, InvitationStatus};
use crate::domain::DomainError;

/// Thread-safe in-memory implementation of [`InvitationRepository`]
///
/// Rows are keyed by token digest. `put_pending` and `transition` each
/// run under a single write lock, so supersede and compare-and-set are
/// atomic with respect to each other.
#[derive(Debug, Default)]
pub struct InMemoryInvitationRepository {
    invitations: RwLock<HashMap<String, Invitation>>,
}

impl InMemoryInvitationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvitationRepository for InMemoryInvitationRepository {
    async fn get(&self, token_digest: &str) -> Result<Option<Invitation>, DomainError> {
        let invitations = self
            .invitations
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(invitations.get(token_digest).cloned())
    }

    async fn put_pending(&self, invitation: Invitation) -> Result<Invitation, DomainError> {
        let mut invitations = self
            .invitations
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        // Delete the superseded pending row for this slot, invalidating
        // its token
        let superseded: Vec<String> = invitations
            .values()
            .filter(|i| {
                i.status().is_pending()
                    && i.team_id() == invitation.team_id()
                    && i.email() == invitation.email()
            })
            .map(|i| i.token_digest().to_string())
            .collect();

        for digest in superseded {
            invitations.remove(&digest);
        }

        invitations.insert(invitation.token_digest().to_string(), invitation.clone());
        Ok(invitation)
    }

    async fn transition(
        &self,
        token_digest: &str,
        from: InvitationStatus,
        to: InvitationStatus,
    ) -> Result<Invitation, DomainError> {
        let mut invitations = self
            .invitations
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        let invitation = invitations
            .get_mut(token_digest)
            .ok_or(DomainError::InvitationNotFound)?;

        if invitation.status() != from {
            return Err(DomainError::InvitationNotPending);
        }

        invitation.set_status(to);
        Ok(invitation.clone())
    }

    async fn list_pending(&self) -> Result<Vec<Invitation>, DomainError> {
        let invitations = self
            .invitations
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(invitations
            .values()
            .filter(|i| i.status().is_pending())
            .cloned()
            .collect())
    }
}
