use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;
use uuid::Uuid;

use activecenter_core::AppError;
use activecenter_models::{CreateReservationDto, Reservation, ReservationFilterParams};

use crate::extract::{Path, Query};
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::ReservationService;

/// Book a space for the authenticated user
#[utoipa::path(
    post,
    path = "/api/reservations",
    request_body = CreateReservationDto,
    responses(
        (status = 201, description = "Space booked", body = Reservation),
        (status = 400, description = "Start in the past, space closed, too many people or slot taken"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Space not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Reservations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_reservation(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateReservationDto>,
) -> Result<(StatusCode, Json<Reservation>), AppError> {
    let reservation = ReservationService::book_space(state.ledger.as_ref(), caller.id, dto).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// List all reservations (admin only)
#[utoipa::path(
    get,
    path = "/api/reservations",
    params(ReservationFilterParams),
    responses(
        (status = 200, description = "One page of reservations", body = Vec<Reservation>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Reservations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_reservations(
    State(state): State<AppState>,
    Query(filters): Query<ReservationFilterParams>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let reservations =
        ReservationService::get_reservations(state.reservations.as_ref(), &filters).await?;
    Ok(Json(reservations))
}

/// List the authenticated user's reservations
#[utoipa::path(
    get,
    path = "/api/reservations/mine",
    params(ReservationFilterParams),
    responses(
        (status = 200, description = "One page of the caller's reservations", body = Vec<Reservation>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Reservations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_my_reservations(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(filters): Query<ReservationFilterParams>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let reservations =
        ReservationService::get_my_reservations(state.reservations.as_ref(), &caller, &filters)
            .await?;
    Ok(Json(reservations))
}

#[utoipa::path(
    get,
    path = "/api/reservations/{id}",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation details", body = Reservation),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not your reservation"),
        (status = 404, description = "Reservation not found")
    ),
    tag = "Reservations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_reservation(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, AppError> {
    let reservation =
        ReservationService::get_reservation(state.reservations.as_ref(), &caller, id).await?;
    Ok(Json(reservation))
}

/// Cancel a confirmed reservation and free its slot
#[utoipa::path(
    patch,
    path = "/api/reservations/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Cancelled reservation", body = Reservation),
        (status = 400, description = "Reservation already cancelled"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not your reservation"),
        (status = 404, description = "Reservation not found")
    ),
    tag = "Reservations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, AppError> {
    let reservation = ReservationService::cancel_reservation(
        state.reservations.as_ref(),
        state.ledger.as_ref(),
        &caller,
        id,
    )
    .await?;
    Ok(Json(reservation))
}
