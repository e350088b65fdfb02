//! Domain layer - entities, validation, and repository traits

pub mod error;
pub mod invitation;
pub mod membership;
pub mod role;
pub mod share;
pub mod team;

pub use error::DomainError;
pub use invitation::{
    EmailAddress, Invitation, InvitationRepository, InvitationStatus, InvitationValidationError,
};
pub use membership::{Membership, MembershipRepository, MembershipStatus};
pub use role::{Capability, TeamRole};
pub use share::{ContentId, ContentShare, SharePermission, ShareRepository, ShareValidationError};
pub use team::{Team, TeamId, TeamRepository, TeamValidationError, UserId};
