//! API middleware and extractors

mod identity;

pub use identity::{extract_user_id, RequireUser, USER_ID_HEADER};
