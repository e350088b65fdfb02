//! In-memory content share repository

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::share::{ContentId, ContentShare, ShareRepository};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Thread-safe in-memory implementation of [`ShareRepository`]
///
/// Rows are keyed by the `(content_id, team_id)` pair. `upsert` replaces
/// the whole row under one write lock; of two concurrent grants the last
/// writer wins and no merged permission set is ever observable.
#[derive(Debug, Default)]
pub struct InMemoryShareRepository {
    shares: RwLock<HashMap<(ContentId, TeamId), ContentShare>>,
}

impl InMemoryShareRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShareRepository for InMemoryShareRepository {
    async fn get(
        &self,
        content_id: &ContentId,
        team_id: &TeamId,
    ) -> Result<Option<ContentShare>, DomainError> {
        let shares = self
            .shares
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(shares
            .get(&(content_id.clone(), team_id.clone()))
            .cloned())
    }

    async fn upsert(&self, share: ContentShare) -> Result<ContentShare, DomainError> {
        let key = (share.content_id().clone(), share.team_id().clone());
        let mut shares = self
            .shares
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        // A replaced grant keeps its original grant time
        let share = match shares.get(&key) {
            Some(existing) => share.preserving_granted_at(existing.granted_at()),
            None => share,
        };

        shares.insert(key, share.clone());
        Ok(share)
    }

    async fn remove(
        &self,
        content_id: &ContentId,
        team_id: &TeamId,
    ) -> Result<bool, DomainError> {
        let mut shares = self
            .shares
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(shares
            .remove(&(content_id.clone(), team_id.clone()))
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::share::SharePermission;
    use crate::domain::team::UserId;

    fn share(content: &str, team: &str, perms: &[SharePermission]) -> ContentShare {
        ContentShare::new(
            ContentId::new(content).unwrap(),
            TeamId::new(team).unwrap(),
            perms.iter().copied().collect(),
            UserId::new("u1").unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let repo = InMemoryShareRepository::new();
        repo.upsert(share("c42", "t1", &[SharePermission::View]))
            .await
            .unwrap();

        let c = ContentId::new("c42").unwrap();
        let t = TeamId::new("t1").unwrap();
        let fetched = repo.get(&c, &t).await.unwrap().unwrap();
        assert!(fetched.covers(SharePermission::View));
    }

    #[tokio::test]
    async fn test_upsert_replaces_wholesale() {
        let repo = InMemoryShareRepository::new();
        let first = repo
            .upsert(share("c42", "t1", &[SharePermission::View, SharePermission::Edit]))
            .await
            .unwrap();

        let replaced = repo
            .upsert(share("c42", "t1", &[SharePermission::Comment]))
            .await
            .unwrap();

        // Latest grant is authoritative, no merging, grant time survives
        assert_eq!(replaced.permissions().len(), 1);
        assert!(!replaced.covers(SharePermission::Edit));
        assert_eq!(replaced.granted_at(), first.granted_at());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let repo = InMemoryShareRepository::new();
        repo.upsert(share("c42", "t1", &[SharePermission::View]))
            .await
            .unwrap();

        let c = ContentId::new("c42").unwrap();
        let t = TeamId::new("t1").unwrap();
        assert!(repo.remove(&c, &t).await.unwrap());
        assert!(!repo.remove(&c, &t).await.unwrap());
        assert!(repo.get(&c, &t).await.unwrap().is_none());
    }
}
