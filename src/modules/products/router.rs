use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::{RouteRequirement, guarded};
use crate::multipart::upload_body_limit;
use crate::state::AppState;

use super::controller::{
    create_product, get_product, get_product_by_name, get_products, retire_product,
    update_product,
};

pub fn init_products_router(state: &AppState) -> Router<AppState> {
    let jwt = &state.jwt_config;
    let upload_limit = upload_body_limit(state.upload_config.max_bytes);

    Router::new()
        .route(
            "/",
            guarded(get(get_products), jwt, RouteRequirement::PUBLIC).merge(guarded(
                post(create_product).layer(upload_limit),
                jwt,
                RouteRequirement::ADMIN,
            )),
        )
        .route(
            "/by-name",
            guarded(get(get_product_by_name), jwt, RouteRequirement::PUBLIC),
        )
        .route(
            "/{id}",
            guarded(get(get_product), jwt, RouteRequirement::PUBLIC).merge(guarded(
                put(update_product).delete(retire_product),
                jwt,
                RouteRequirement::ADMIN,
            )),
        )
}
