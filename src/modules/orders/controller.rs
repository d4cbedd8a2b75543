use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use activecenter_core::AppError;
use activecenter_models::{CreateOrderDto, Order, OrderFilterParams};

use crate::extract::{Path, Query};
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::OrderService;

/// Place an order for the authenticated user
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderDto,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Product inactive or out of stock"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Orders",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_order(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateOrderDto>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = OrderService::create_order(state.ledger.as_ref(), caller.id, dto).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List all orders (admin only)
#[utoipa::path(
    get,
    path = "/api/orders",
    params(OrderFilterParams),
    responses(
        (status = 200, description = "One page of orders", body = Vec<Order>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Orders",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_orders(
    State(state): State<AppState>,
    Query(filters): Query<OrderFilterParams>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = OrderService::get_orders(state.orders.as_ref(), &filters).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order details", body = Order),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not your order"),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = OrderService::get_order(state.orders.as_ref(), &caller, id).await?;
    Ok(Json(order))
}

/// Cancel a pending order and return its units to stock
#[utoipa::path(
    patch,
    path = "/api/orders/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Cancelled order", body = Order),
        (status = 400, description = "Order already cancelled"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not your order"),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn cancel_order(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = OrderService::cancel_order(
        state.orders.as_ref(),
        state.ledger.as_ref(),
        &caller,
        id,
    )
    .await?;
    Ok(Json(order))
}
