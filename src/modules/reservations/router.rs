use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::middleware::{RouteRequirement, guarded};
use crate::state::AppState;

use super::controller::{
    cancel_reservation, create_reservation, get_my_reservations, get_reservation,
    get_reservations,
};

pub fn init_reservations_router(state: &AppState) -> Router<AppState> {
    let jwt = &state.jwt_config;

    Router::new()
        .route(
            "/",
            guarded(post(create_reservation), jwt, RouteRequirement::AUTHENTICATED).merge(
                guarded(get(get_reservations), jwt, RouteRequirement::ADMIN),
            ),
        )
        .route(
            "/mine",
            guarded(get(get_my_reservations), jwt, RouteRequirement::AUTHENTICATED),
        )
        .route(
            "/{id}",
            guarded(get(get_reservation), jwt, RouteRequirement::AUTHENTICATED),
        )
        .route(
            "/{id}/cancel",
            guarded(patch(cancel_reservation), jwt, RouteRequirement::AUTHENTICATED),
        )
}
