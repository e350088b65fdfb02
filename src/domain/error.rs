use thiserror::Error;

/// Core domain errors
///
/// Every failure in this crate is logical (authorization, validity, state)
/// rather than transient, so errors are returned immediately and never
/// retried internally. Variants carry the offending identifiers; the API
/// layer owns the translation to HTTP status codes.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Not authorized: {message}")]
    NotAuthorized { message: String },

    #[error("Team '{team_id}' not found")]
    TeamNotFound { team_id: String },

    #[error("User '{user_id}' has no membership in team '{team_id}'")]
    MembershipNotFound { team_id: String, user_id: String },

    #[error("Invitation not found")]
    InvitationNotFound,

    #[error("No share of content '{content_id}' with team '{team_id}'")]
    ContentNotFound { content_id: String, team_id: String },

    #[error("User '{user_id}' is already an active member of team '{team_id}'")]
    DuplicateMembership { team_id: String, user_id: String },

    #[error("Cannot remove the last owner of team '{team_id}'")]
    LastOwner { team_id: String },

    #[error("Invitation has expired")]
    InvitationExpired,

    #[error("Invitation is no longer pending")]
    InvitationNotPending,

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn not_authorized(message: impl Into<String>) -> Self {
        Self::NotAuthorized {
            message: message.into(),
        }
    }

    pub fn team_not_found(team_id: impl Into<String>) -> Self {
        Self::TeamNotFound {
            team_id: team_id.into(),
        }
    }

    pub fn membership_not_found(team_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::MembershipNotFound {
            team_id: team_id.into(),
            user_id: user_id.into(),
        }
    }

    pub fn content_not_found(content_id: impl Into<String>, team_id: impl Into<String>) -> Self {
        Self::ContentNotFound {
            content_id: content_id.into(),
            team_id: team_id.into(),
        }
    }

    pub fn duplicate_membership(team_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::DuplicateMembership {
            team_id: team_id.into(),
            user_id: user_id.into(),
        }
    }

    pub fn last_owner(team_id: impl Into<String>) -> Self {
        Self::LastOwner {
            team_id: team_id.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
