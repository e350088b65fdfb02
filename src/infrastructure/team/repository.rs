//! In-memory team repository

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::team::{Team, TeamId, TeamRepository};
use crate::domain::DomainError;

/// Thread-safe in-memory implementation of [`TeamRepository`]
///
/// Every operation takes a single lock, so conditional writes (create on
/// a fresh ID) are atomic. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryTeamRepository {
    teams: RwLock<HashMap<TeamId, Team>>,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let teams = self
            .teams
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(teams.get(id).cloned())
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        let mut teams = self
            .teams
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if teams.contains_key(team.id()) {
            return Err(DomainError::storage(format!(
                "Team '{}' already exists",
                team.id()
            )));
        }

        teams.insert(team.id().clone(), team.clone());
        Ok(team)
    }

    async fn update(&self, team: Team) -> Result<Team, DomainError> {
        let mut teams = self
            .teams
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if !teams.contains_key(team.id()) {
            return Err(DomainError::team_not_found(team.id().as_str()));
        }

        teams.insert(team.id().clone(), team.clone());
        Ok(team)
    }
}
