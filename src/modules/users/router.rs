use axum::{
    Router,
    routing::{get, patch},
};

use crate::middleware::{RouteRequirement, guarded};
use crate::state::AppState;

use super::controller::{get_user, get_users, toggle_admin, toggle_ban, update_profile};

pub fn init_users_router(state: &AppState) -> Router<AppState> {
    let jwt = &state.jwt_config;

    Router::new()
        .route("/", guarded(get(get_users), jwt, RouteRequirement::ADMIN))
        .route(
            "/me",
            guarded(patch(update_profile), jwt, RouteRequirement::AUTHENTICATED),
        )
        .route(
            "/{id}",
            guarded(get(get_user), jwt, RouteRequirement::AUTHENTICATED),
        )
        .route("/{id}/ban", guarded(patch(toggle_ban), jwt, RouteRequirement::ADMIN))
        .route(
            "/{id}/admin",
            guarded(patch(toggle_admin), jwt, RouteRequirement::ADMIN),
        )
}
