//! Invitation entity and state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::role::TeamRole;
use crate::domain::team::{TeamId, UserId};

/// Errors that can occur during invitation validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvitationValidationError {
    #[error("Email address cannot be empty")]
    EmptyEmail,

    #[error("Email address cannot exceed {0} characters")]
    EmailTooLong(usize),

    #[error("Email address must contain '@'")]
    MissingAtSign,

    #[error("Invitations cannot offer the owner role")]
    OwnerRoleOffered,
}

const MAX_EMAIL_LENGTH: usize = 254;

/// A normalized email address (trimmed, lowercased)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalize and validate an email address
    pub fn new(email: impl Into<String>) -> Result<Self, InvitationValidationError> {
        let email = email.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(InvitationValidationError::EmptyEmail);
        }

        if email.len() > MAX_EMAIL_LENGTH {
            return Err(InvitationValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
        }

        if !email.contains('@') {
            return Err(InvitationValidationError::MissingAtSign);
        }

        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = InvitationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Invitation lifecycle state.
///
/// `Pending` is the only non-terminal state; the legal transitions are
/// pending → accepted, pending → expired, and pending → revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    #[default]
    Pending,
    Accepted,
    Expired,
    Revoked,
}

impl InvitationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether `self -> to` is a legal state machine transition
    pub fn can_transition_to(&self, to: InvitationStatus) -> bool {
        self.is_pending() && !to.is_pending()
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Accepted => write!(f, "accepted"),
            Self::Expired => write!(f, "expired"),
            Self::Revoked => write!(f, "revoked"),
        }
    }
}

/// Invitation entity
///
/// The raw token never touches storage; only its digest is kept, and the
/// digest doubles as the record key. At most one `pending` invitation
/// exists per `(team_id, email)` - a repeat invite supersedes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    token_digest: String,
    team_id: TeamId,
    email: EmailAddress,
    role: TeamRole,
    status: InvitationStatus,
    invited_by: UserId,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Invitation {
    /// Create a pending invitation.
    ///
    /// The offered role can never be owner - ownership moves only through
    /// an explicit transfer.
    pub fn new(
        token_digest: impl Into<String>,
        team_id: TeamId,
        email: EmailAddress,
        role: TeamRole,
        invited_by: UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, InvitationValidationError> {
        if role == TeamRole::Owner {
            return Err(InvitationValidationError::OwnerRoleOffered);
        }

        Ok(Self {
            token_digest: token_digest.into(),
            team_id,
            email,
            role,
            status: InvitationStatus::Pending,
            invited_by,
            created_at: Utc::now(),
            expires_at,
        })
    }

    pub fn token_digest(&self) -> &str {
        &self.token_digest
    }

    pub fn team_id(&self) -> &TeamId {
        &self.team_id
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn role(&self) -> TeamRole {
        self.role
    }

    pub fn status(&self) -> InvitationStatus {
        self.status
    }

    pub fn invited_by(&self) -> &UserId {
        &self.invited_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the expiry window has passed at `now`.
    ///
    /// Expiry is evaluated lazily on every read; a row can sit
    /// `pending`-but-expired until the next access or reaper sweep.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Apply a state transition (storage-internal; callers go through the
    /// repository's compare-and-set)
    pub(crate) fn set_status(&mut self, status: InvitationStatus) {
        self.status = status;
    }
}
