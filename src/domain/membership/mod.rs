//! Membership domain module

mod entity;
mod repository;

pub use entity::{Membership, MembershipStatus};
pub use repository::MembershipRepository;
