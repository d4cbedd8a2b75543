use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::middleware::{RouteRequirement, guarded};
use crate::state::AppState;

use super::controller::{cancel_order, create_order, get_order, get_orders};

pub fn init_orders_router(state: &AppState) -> Router<AppState> {
    let jwt = &state.jwt_config;

    Router::new()
        .route(
            "/",
            guarded(post(create_order), jwt, RouteRequirement::AUTHENTICATED).merge(guarded(
                get(get_orders),
                jwt,
                RouteRequirement::ADMIN,
            )),
        )
        .route(
            "/{id}",
            guarded(get(get_order), jwt, RouteRequirement::AUTHENTICATED),
        )
        .route(
            "/{id}/cancel",
            guarded(patch(cancel_order), jwt, RouteRequirement::AUTHENTICATED),
        )
}
