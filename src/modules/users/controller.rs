use axum::{Json, extract::State};
use tracing::instrument;
use uuid::Uuid;

use activecenter_core::AppError;
use activecenter_models::{
    BanStatusResponse, RoleResponse, UpdateProfileDto, UserFilterParams, UserResponse,
};

use crate::extract::{Path, Query};
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::UserService;

/// List users (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserFilterParams),
    responses(
        (status = 200, description = "One page of users", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    Query(filters): Query<UserFilterParams>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = UserService::get_users(state.users.as_ref(), &filters).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::get_user(state.users.as_ref(), &caller, id).await?;
    Ok(Json(user))
}

/// Update the caller's own name, phone or address
#[utoipa::path(
    patch,
    path = "/api/users/me",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation error")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::update_profile(state.users.as_ref(), caller.id, dto).await?;
    Ok(Json(user))
}

/// Ban a user, or lift an existing ban
#[utoipa::path(
    patch,
    path = "/api/users/{id}/ban",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "The user's new status", body = BanStatusResponse),
        (status = 400, description = "Cannot ban yourself"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn toggle_ban(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BanStatusResponse>, AppError> {
    let response = UserService::toggle_ban(state.users.as_ref(), &caller, id).await?;
    Ok(Json(response))
}

/// Grant or revoke the admin role
#[utoipa::path(
    patch,
    path = "/api/users/{id}/admin",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "The user's new role", body = RoleResponse),
        (status = 400, description = "Cannot change your own role"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn toggle_admin(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RoleResponse>, AppError> {
    let response = UserService::toggle_admin(state.users.as_ref(), &caller, id).await?;
    Ok(Json(response))
}
