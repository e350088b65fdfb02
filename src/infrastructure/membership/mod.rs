//! Membership storage

mod repository;

pub use repository::InMemoryMembershipRepository;
