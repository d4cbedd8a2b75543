//! Per-route authentication and authorization.
//!
//! Every route carries a [`RouteRequirement`] attached at router construction
//! through [`guarded`]. For each request the guard runs:
//!
//! ```text
//! public route ───────────────────────────────► allowed
//! otherwise: authenticate ── fail ──► 401
//!                 │ ok
//!                 ▼
//!            authorize ───── fail ──► 403
//!                 │ ok
//!                 ▼
//!              allowed (Principal in request extensions)
//! ```
//!
//! # Example
//!
//! ```ignore
//! Router::new().route(
//!     "/",
//!     guarded(get(list_products), &jwt, RouteRequirement::PUBLIC)
//!         .merge(guarded(post(create_product), &jwt, RouteRequirement::ADMIN)),
//! )
//! ```

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use activecenter_auth::{Principal, Role};
use activecenter_config::JwtConfig;
use activecenter_core::AppError;

use crate::middleware::auth::authenticate;

/// What a route demands of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequirement {
    /// Public routes skip authentication entirely.
    pub public: bool,
    /// Empty means any authenticated caller.
    pub required_roles: &'static [Role],
}

impl RouteRequirement {
    pub const PUBLIC: Self = Self {
        public: true,
        required_roles: &[],
    };

    pub const AUTHENTICATED: Self = Self {
        public: false,
        required_roles: &[],
    };

    pub const ADMIN: Self = Self::roles(&[Role::Admin]);

    pub const fn roles(required_roles: &'static [Role]) -> Self {
        Self {
            public: false,
            required_roles,
        }
    }
}

impl Default for RouteRequirement {
    fn default() -> Self {
        Self::AUTHENTICATED
    }
}

/// Role check for an already-authenticated request. No I/O.
pub fn authorize(
    requirement: &RouteRequirement,
    principal: Option<&Principal>,
) -> Result<(), AppError> {
    if requirement.required_roles.is_empty() {
        return Ok(());
    }

    match principal {
        Some(principal) if principal.has_any_role(requirement.required_roles) => Ok(()),
        Some(principal) => Err(AppError::forbidden(format!(
            "Access denied. Required roles: {}, but user has role: {}",
            role_list(requirement.required_roles),
            principal.role
        ))),
        None => Err(AppError::forbidden("Access denied")),
    }
}

/// Runs the full pipeline for one request.
///
/// Returns the resolved principal, or `None` for public routes.
pub fn evaluate(
    requirement: &RouteRequirement,
    headers: &HeaderMap,
    jwt_config: &JwtConfig,
) -> Result<Option<Principal>, AppError> {
    if requirement.public {
        return Ok(None);
    }

    let principal = authenticate(headers, jwt_config)?;
    authorize(requirement, Some(&principal))?;
    Ok(Some(principal))
}

#[derive(Clone)]
pub struct GuardState {
    jwt_config: JwtConfig,
    requirement: RouteRequirement,
}

/// Route layer installed by [`guarded`].
///
/// Role and status are read from the token as it was issued; the user store
/// is not consulted. A ban or role change therefore applies from the next
/// login, and a token issued before it keeps working until it expires.
///
/// The principal is put in the request extensions for [`AuthUser`] and in the
/// response extensions for the request log.
///
/// [`AuthUser`]: crate::middleware::AuthUser
pub async fn enforce(
    State(guard): State<GuardState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(principal) = evaluate(&guard.requirement, req.headers(), &guard.jwt_config)?
    else {
        return Ok(next.run(req).await);
    };

    tracing::debug!(user_id = %principal.id, role = %principal.role, "Request authorized");
    req.extensions_mut().insert(principal.clone());

    let mut response = next.run(req).await;
    response.extensions_mut().insert(principal);
    Ok(response)
}

/// Attaches `requirement` to every method of `route`.
pub fn guarded<S>(
    route: MethodRouter<S>,
    jwt_config: &JwtConfig,
    requirement: RouteRequirement,
) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let guard = GuardState {
        jwt_config: jwt_config.clone(),
        requirement,
    };

    route.route_layer(middleware::from_fn_with_state(guard, enforce))
}

fn role_list(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use activecenter_auth::{UserStatus, create_access_token};
    use activecenter_core::ErrorKind;
    use axum::http::{HeaderValue, header};
    use uuid::Uuid;

    fn principal(role: Role) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            email: "member@club.test".to_string(),
            role,
            status: UserStatus::Active,
        }
    }

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "guard-test-secret".to_string(),
            access_token_expiry: 3600,
        }
    }

    #[test]
    fn test_default_requirement_is_authenticated_any_role() {
        let requirement = RouteRequirement::default();
        assert!(!requirement.public);
        assert!(requirement.required_roles.is_empty());
    }

    #[test]
    fn test_authorize_without_roles_allows_anyone() {
        assert!(authorize(&RouteRequirement::AUTHENTICATED, None).is_ok());
        assert!(authorize(&RouteRequirement::AUTHENTICATED, Some(&principal(Role::User))).is_ok());
    }

    #[test]
    fn test_authorize_role_membership() {
        assert!(authorize(&RouteRequirement::ADMIN, Some(&principal(Role::Admin))).is_ok());

        let err = authorize(&RouteRequirement::ADMIN, Some(&principal(Role::User))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let err = authorize(&RouteRequirement::ADMIN, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[test]
    fn test_authorize_is_idempotent() {
        let user = principal(Role::User);
        let first = authorize(&RouteRequirement::ADMIN, Some(&user)).is_ok();
        let second = authorize(&RouteRequirement::ADMIN, Some(&user)).is_ok();
        assert_eq!(first, second);
    }

    #[test]
    fn test_authorize_multiple_roles() {
        let requirement = RouteRequirement::roles(&[Role::Admin, Role::User]);
        assert!(authorize(&requirement, Some(&principal(Role::User))).is_ok());
    }

    #[test]
    fn test_evaluate_public_ignores_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer garbage"));

        let result = evaluate(&RouteRequirement::PUBLIC, &headers, &config()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_evaluate_missing_credential_is_unauthenticated() {
        let err = evaluate(&RouteRequirement::ADMIN, &HeaderMap::new(), &config()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[test]
    fn test_evaluate_trusts_role_as_issued() {
        let id = Uuid::new_v4();
        let token = create_access_token(
            id,
            "demoted@club.test",
            Role::Admin,
            UserStatus::Active,
            &config(),
        )
        .unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );

        // Nothing here knows the account was demoted after the token was issued.
        let principal = evaluate(&RouteRequirement::ADMIN, &headers, &config())
            .unwrap()
            .unwrap();
        assert_eq!(principal.id, id);
        assert_eq!(principal.role, Role::Admin);
    }
}
