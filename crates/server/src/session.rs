use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;

/// Identity of the logged-in user, as established by the out-of-scope auth
/// layer and forwarded in the `x-user-id` header.
pub struct SessionUser(pub Uuid);

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok())
            .map(SessionUser)
            .ok_or(ApiError::Unauthorized("No session identity"))
    }
}
