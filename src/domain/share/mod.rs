//! Content sharing domain module

mod entity;
mod repository;

pub use entity::{ContentId, ContentShare, SharePermission, ShareValidationError};
pub use repository::ShareRepository;
