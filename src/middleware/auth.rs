use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use activecenter_auth::{Principal, verify_token};
use activecenter_config::JwtConfig;
use activecenter_core::AppError;

use crate::state::AppState;

/// Extracts the token from an `Authorization: Bearer <jwt>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))
}

/// Resolves the caller from the request headers.
///
/// Fails with `Unauthenticated` when the header is missing or malformed, the
/// token does not verify, or its subject is not a user id.
pub fn authenticate(headers: &HeaderMap, jwt_config: &JwtConfig) -> Result<Principal, AppError> {
    let token = bearer_token(headers)?;
    let claims = verify_token(token, jwt_config)?;
    Principal::try_from(claims)
}

/// Extractor for the authenticated caller.
///
/// Behind the route guard the principal is already in the request
/// extensions; otherwise the token is verified here.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(AuthUser(principal.clone()));
        }

        authenticate(&parts.headers, &state.jwt_config).map(AuthUser)
    }
}
