use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::{RouteRequirement, guarded};
use crate::multipart::upload_body_limit;
use crate::state::AppState;

use super::controller::{
    create_space, get_space, get_space_by_name, get_spaces, retire_space, update_space,
};

pub fn init_spaces_router(state: &AppState) -> Router<AppState> {
    let jwt = &state.jwt_config;
    let upload_limit = upload_body_limit(state.upload_config.max_bytes);

    Router::new()
        .route(
            "/",
            guarded(get(get_spaces), jwt, RouteRequirement::PUBLIC).merge(guarded(
                post(create_space).layer(upload_limit),
                jwt,
                RouteRequirement::ADMIN,
            )),
        )
        .route(
            "/by-name",
            guarded(get(get_space_by_name), jwt, RouteRequirement::AUTHENTICATED),
        )
        .route(
            "/{id}",
            guarded(get(get_space), jwt, RouteRequirement::AUTHENTICATED).merge(guarded(
                put(update_space).delete(retire_space),
                jwt,
                RouteRequirement::ADMIN,
            )),
        )
}
