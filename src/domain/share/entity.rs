//! Content share entity and permission tiers

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::team::{TeamId, UserId};

/// Errors that can occur during share validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShareValidationError {
    #[error("Content ID cannot be empty")]
    EmptyContentId,

    #[error("Content ID cannot exceed {0} characters")]
    ContentIdTooLong(usize),

    #[error("Permission set cannot be empty")]
    EmptyPermissions,
}

const MAX_CONTENT_ID_LENGTH: usize = 64;

/// Content identifier - owned by the content storage collaborator,
/// opaque to this service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Result<Self, ShareValidationError> {
        let id = id.into();

        if id.is_empty() {
            return Err(ShareValidationError::EmptyContentId);
        }

        if id.len() > MAX_CONTENT_ID_LENGTH {
            return Err(ShareValidationError::ContentIdTooLong(MAX_CONTENT_ID_LENGTH));
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentId {
    type Error = ShareValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Permission granted over a content item.
///
/// Tiered like roles (view < comment < edit < admin): a granted
/// permission covers every operation at or below its tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SharePermission {
    View = 1,
    Comment = 2,
    Edit = 3,
    Admin = 4,
}

impl SharePermission {
    /// Parse from string representation (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "view" => Some(Self::View),
            "comment" => Some(Self::Comment),
            "edit" => Some(Self::Edit),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Comment => "comment",
            Self::Edit => "edit",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for SharePermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A grant of permissions over one content item to one team, unique per
/// `(content_id, team_id)`.
///
/// Repeated grants replace the permission set wholesale - the latest
/// call is authoritative, there is no merging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentShare {
    content_id: ContentId,
    team_id: TeamId,
    permissions: BTreeSet<SharePermission>,
    granted_by: UserId,
    granted_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ContentShare {
    /// Create a share grant; the permission set must be non-empty
    pub fn new(
        content_id: ContentId,
        team_id: TeamId,
        permissions: BTreeSet<SharePermission>,
        granted_by: UserId,
    ) -> Result<Self, ShareValidationError> {
        if permissions.is_empty() {
            return Err(ShareValidationError::EmptyPermissions);
        }

        let now = Utc::now();

        Ok(Self {
            content_id,
            team_id,
            permissions,
            granted_by,
            granted_at: now,
            updated_at: now,
        })
    }

    pub fn content_id(&self) -> &ContentId {
        &self.content_id
    }

    pub fn team_id(&self) -> &TeamId {
        &self.team_id
    }

    pub fn permissions(&self) -> &BTreeSet<SharePermission> {
        &self.permissions
    }

    pub fn granted_by(&self) -> &UserId {
        &self.granted_by
    }

    pub fn granted_at(&self) -> DateTime<Utc> {
        self.granted_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether this grant covers an operation: true when any granted
    /// permission sits at or above the required tier.
    pub fn covers(&self, required: SharePermission) -> bool {
        self.permissions.iter().any(|p| *p >= required)
    }

    /// Carry the original grant time through an upsert replacing this row
    pub fn preserving_granted_at(mut self, granted_at: DateTime<Utc>) -> Self {
        self.granted_at = granted_at;
        self
    }
}
