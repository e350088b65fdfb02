//! Team domain module
//!
//! Teams are the unit of collaboration: members join with a role, and
//! content is shared with a team as a whole.

mod entity;
mod repository;
mod validation;

pub use entity::{Team, TeamId, UserId};
pub use repository::TeamRepository;
pub use validation::{
    validate_team_id, validate_team_name, validate_user_id, TeamValidationError,
};
