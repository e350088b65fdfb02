//! Caller identity extraction
//!
//! Authentication itself is a collaborator sitting in front of this
//! service; by the time a request arrives the user is verified and the
//! gateway forwards the identity in the `x-user-id` header.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::team::UserId;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor that requires a forwarded user identity
#[derive(Debug, Clone)]
pub struct RequireUser(pub UserId);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = extract_user_id(&parts.headers)?;
        Ok(RequireUser(user_id))
    }
}

/// Extract the forwarded user identity from request headers
pub fn extract_user_id(headers: &HeaderMap) -> Result<UserId, ApiError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| {
            ApiError::unauthorized(format!(
                "Authentication required. Provide user identity via '{}' header",
                USER_ID_HEADER
            ))
        })?
        .to_str()
        .map_err(|_| ApiError::bad_request("Invalid x-user-id header encoding"))?;

    UserId::new(raw).map_err(|e| ApiError::unauthorized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_extract_user_id() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, "alice".parse().unwrap());

        let user_id = extract_user_id(&headers).unwrap();
        assert_eq!(user_id.as_str(), "alice");
    }

    #[test]
    fn test_missing_header() {
        let headers = HeaderMap::new();

        let err = extract_user_id(&headers).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_empty_user_id_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, "".parse().unwrap());

        let err = extract_user_id(&headers).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
}
