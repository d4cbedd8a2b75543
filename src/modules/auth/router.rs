use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{RouteRequirement, guarded};
use crate::state::AppState;

use super::controller::{get_me, login_user, register_user};

pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    let jwt = &state.jwt_config;

    Router::new()
        .route(
            "/register",
            guarded(post(register_user), jwt, RouteRequirement::PUBLIC),
        )
        .route("/login", guarded(post(login_user), jwt, RouteRequirement::PUBLIC))
        .route("/me", guarded(get(get_me), jwt, RouteRequirement::AUTHENTICATED))
}
