//! Invitation storage, tokens and service

mod repository;
mod service;
mod token;

pub use repository::InMemoryInvitationRepository;
pub use service::{InvitationService, InviteOutcome, IssuedInvitation};
pub use token::{GeneratedToken, InvitationTokenGenerator};
