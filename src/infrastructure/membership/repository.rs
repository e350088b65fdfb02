//! In-memory membership repository

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::membership::{Membership, MembershipRepository};
use crate::domain::team::{TeamId, UserId};
use crate::domain::DomainError;

/// Thread-safe in-memory implementation of [`MembershipRepository`]
///
/// Rows are keyed by the `(team_id, user_id)` pair. `insert_active`
/// checks and writes under one lock, which is what makes the pair's
/// uniqueness hold under concurrent inserts.
#[derive(Debug, Default)]
pub struct InMemoryMembershipRepository {
    memberships: RwLock<HashMap<(TeamId, UserId), Membership>>,
}

impl InMemoryMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn get(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<Option<Membership>, DomainError> {
        let memberships = self
            .memberships
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(memberships
            .get(&(team_id.clone(), user_id.clone()))
            .cloned())
    }

    async fn insert_active(&self, membership: Membership) -> Result<Membership, DomainError> {
        let key = (membership.team_id().clone(), membership.user_id().clone());
        let mut memberships = self
            .memberships
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(existing) = memberships.get(&key) {
            if existing.is_active() {
                return Err(DomainError::duplicate_membership(
                    key.0.as_str(),
                    key.1.as_str(),
                ));
            }
        }

        memberships.insert(key, membership.clone());
        Ok(membership)
    }

    async fn update(&self, membership: Membership) -> Result<Membership, DomainError> {
        let key = (membership.team_id().clone(), membership.user_id().clone());
        let mut memberships = self
            .memberships
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if !memberships.contains_key(&key) {
            return Err(DomainError::membership_not_found(
                key.0.as_str(),
                key.1.as_str(),
            ));
        }

        memberships.insert(key, membership.clone());
        Ok(membership)
    }

    async fn update_pair(
        &self,
        first: Membership,
        second: Membership,
    ) -> Result<(), DomainError> {
        let first_key = (first.team_id().clone(), first.user_id().clone());
        let second_key = (second.team_id().clone(), second.user_id().clone());
        let mut memberships = self
            .memberships
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        // Verify both rows before touching either
        for key in [&first_key, &second_key] {
            if !memberships.contains_key(key) {
                return Err(DomainError::membership_not_found(
                    key.0.as_str(),
                    key.1.as_str(),
                ));
            }
        }

        memberships.insert(first_key, first);
        memberships.insert(second_key, second);
        Ok(())
    }

    async fn list_for_team(&self, team_id: &TeamId) -> Result<Vec<Membership>, DomainError> {
        let memberships = self
            .memberships
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(memberships
            .values()
            .filter(|m| m.team_id() == team_id)
            .cloned()
            .collect())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Membership>, DomainError> {
        let memberships = self
            .memberships
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(memberships
            .values()
            .filter(|m| m.user_id() == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::role::TeamRole;

    fn ids(team: &str, user: &str) -> (TeamId, UserId) {
        (TeamId::new(team).unwrap(), UserId::new(user).unwrap())
    }

    fn membership(team: &str, user: &str, role: TeamRole) -> Membership {
        let (t, u) = ids(team, user);
        Membership::new(t, u, role)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = InMemoryMembershipRepository::new();
        repo.insert_active(membership("t1", "u1", TeamRole::Owner))
            .await
            .unwrap();

        let (t, u) = ids("t1", "u1");
        let fetched = repo.get(&t, &u).await.unwrap().unwrap();
        assert_eq!(fetched.role(), TeamRole::Owner);
    }

    #[tokio::test]
    async fn test_insert_active_rejects_duplicate() {
        let repo = InMemoryMembershipRepository::new();
        repo.insert_active(membership("t1", "u1", TeamRole::Editor))
            .await
            .unwrap();

        let result = repo
            .insert_active(membership("t1", "u1", TeamRole::Viewer))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            DomainError::DuplicateMembership { .. }
        ));
    }

    #[tokio::test]
    async fn test_insert_active_revives_removed_row() {
        let repo = InMemoryMembershipRepository::new();
        let mut m = repo
            .insert_active(membership("t1", "u1", TeamRole::Editor))
            .await
            .unwrap();
        m.remove();
        repo.update(m).await.unwrap();

        // A removed row does not block a fresh insert
        repo.insert_active(membership("t1", "u1", TeamRole::Viewer))
            .await
            .unwrap();

        let (t, u) = ids("t1", "u1");
        let fetched = repo.get(&t, &u).await.unwrap().unwrap();
        assert!(fetched.is_active());
        assert_eq!(fetched.role(), TeamRole::Viewer);
    }

    #[tokio::test]
    async fn test_update_pair_swaps_both_rows() {
        let repo = InMemoryMembershipRepository::new();
        let mut a = repo
            .insert_active(membership("t1", "u1", TeamRole::Owner))
            .await
            .unwrap();
        let mut b = repo
            .insert_active(membership("t1", "u2", TeamRole::Editor))
            .await
            .unwrap();

        a.set_role(TeamRole::Admin);
        b.set_role(TeamRole::Owner);
        repo.update_pair(b, a).await.unwrap();

        let (t, u1) = ids("t1", "u1");
        let (_, u2) = ids("t1", "u2");
        assert_eq!(repo.get(&t, &u1).await.unwrap().unwrap().role(), TeamRole::Admin);
        assert_eq!(repo.get(&t, &u2).await.unwrap().unwrap().role(), TeamRole::Owner);
    }

    #[tokio::test]
    async fn test_update_pair_touches_neither_row_on_missing() {
        let repo = InMemoryMembershipRepository::new();
        let mut a = repo
            .insert_active(membership("t1", "u1", TeamRole::Owner))
            .await
            .unwrap();

        a.set_role(TeamRole::Admin);
        let result = repo
            .update_pair(a, membership("t1", "ghost", TeamRole::Owner))
            .await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::MembershipNotFound { .. }
        ));

        // The existing row is untouched
        let (t, u1) = ids("t1", "u1");
        assert_eq!(repo.get(&t, &u1).await.unwrap().unwrap().role(), TeamRole::Owner);
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let repo = InMemoryMembershipRepository::new();
        let result = repo.update(membership("t1", "u1", TeamRole::Viewer)).await;

        assert!(matches!(
            result.unwrap_err(),
            DomainError::MembershipNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_list_for_team_and_user() {
        let repo = InMemoryMembershipRepository::new();
        repo.insert_active(membership("t1", "u1", TeamRole::Owner))
            .await
            .unwrap();
        repo.insert_active(membership("t1", "u2", TeamRole::Editor))
            .await
            .unwrap();
        repo.insert_active(membership("t2", "u1", TeamRole::Viewer))
            .await
            .unwrap();

        let (t1, u1) = ids("t1", "u1");
        assert_eq!(repo.list_for_team(&t1).await.unwrap().len(), 2);
        assert_eq!(repo.list_for_user(&u1).await.unwrap().len(), 2);
    }
}
