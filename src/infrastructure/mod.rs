//! Infrastructure layer - storage implementations and services

pub mod authorization;
pub mod invitation;
pub mod logging;
pub mod membership;
pub mod sharing;
pub mod team;

pub use authorization::AuthorizationGate;
