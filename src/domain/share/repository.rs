//! Content share repository trait

use async_trait::async_trait;

use super::entity::{ContentId, ContentShare};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Repository for share grants keyed by `(content_id, team_id)`
///
/// `upsert` replaces the whole row in one write, so concurrent grants
/// for the same pair resolve last-writer-wins with no torn permission
/// set observable.
#[async_trait]
pub trait ShareRepository: Send + Sync + std::fmt::Debug {
    /// Get the grant for a pair
    async fn get(
        &self,
        content_id: &ContentId,
        team_id: &TeamId,
    ) -> Result<Option<ContentShare>, DomainError>;

    /// Create or wholesale-replace the grant for a pair
    async fn upsert(&self, share: ContentShare) -> Result<ContentShare, DomainError>;

    /// Remove the grant for a pair; returns false if none existed
    async fn remove(
        &self,
        content_id: &ContentId,
        team_id: &TeamId,
    ) -> Result<bool, DomainError>;
}
