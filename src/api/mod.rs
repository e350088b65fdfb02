//! API layer - HTTP handlers, router and middleware

pub mod health;
pub mod invitations;
pub mod middleware;
pub mod router;
pub mod sharing;
pub mod state;
pub mod teams;
pub mod types;

pub use router::create_router;
