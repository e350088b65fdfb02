//! Content share storage and service

mod repository;
mod service;

pub use repository::InMemoryShareRepository;
pub use service::SharingService;
