//! Invitation domain module
//!
//! Invitations are pending offers of membership, bound to an email and a
//! single-use token with an expiry window.

mod entity;
mod repository;

pub use entity::{EmailAddress, Invitation, InvitationStatus, InvitationValidationError};
pub use repository::InvitationRepository;
