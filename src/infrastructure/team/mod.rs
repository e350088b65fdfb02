//! Team storage and service

mod repository;
mod service;

pub use repository::InMemoryTeamRepository;
pub use service::TeamService;
