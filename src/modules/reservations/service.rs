//! Space bookings.
//!
//! A booking must start in the future and fit the space: it has to be open,
//! hold the party and have the slot free. The last two checks run inside the
//! [`Ledger`] so two members cannot take the same slot.

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use activecenter_auth::Principal;
use activecenter_core::{AppError, paginate};
use activecenter_db::{Criteria, Ledger, Repository};
use activecenter_models::{
    CreateReservationDto, Reservation, ReservationFilterParams, ReservationStatus,
};

pub struct ReservationService;

impl ReservationService {
    #[instrument(skip(ledger, dto), fields(space_id = %dto.space_id, hours = dto.hours))]
    pub async fn book_space(
        ledger: &dyn Ledger,
        user_id: Uuid,
        dto: CreateReservationDto,
    ) -> Result<Reservation, AppError> {
        if dto.starts_at <= Utc::now() {
            return Err(AppError::bad_request("A reservation must start in the future"));
        }

        let reservation = ledger.book_space(user_id, &dto).await?;
        tracing::info!(
            reservation_id = %reservation.id,
            total = reservation.total,
            "Space booked"
        );
        Ok(reservation)
    }

    #[instrument(skip(repo))]
    pub async fn get_reservations(
        repo: &dyn Repository<Reservation>,
        filters: &ReservationFilterParams,
    ) -> Result<Vec<Reservation>, AppError> {
        let candidates = repo.find(&filters.filter()).await?;
        Ok(paginate(candidates, filters.pagination.page_request()))
    }

    /// The caller's own bookings; any `user_id` filter is overridden.
    #[instrument(skip(repo))]
    pub async fn get_my_reservations(
        repo: &dyn Repository<Reservation>,
        caller: &Principal,
        filters: &ReservationFilterParams,
    ) -> Result<Vec<Reservation>, AppError> {
        let mut filter = filters.filter();
        filter.user_id = Some(caller.id);
        let candidates = repo.find(&filter).await?;
        Ok(paginate(candidates, filters.pagination.page_request()))
    }

    #[instrument(skip(repo))]
    pub async fn get_reservation(
        repo: &dyn Repository<Reservation>,
        caller: &Principal,
        id: Uuid,
    ) -> Result<Reservation, AppError> {
        let reservation = repo
            .find_one(Criteria::Id(id))
            .await?
            .ok_or_else(|| AppError::not_found("Reservation not found"))?;

        if !caller.can_access(reservation.user_id) {
            return Err(AppError::forbidden(
                "You can only access your own reservations",
            ));
        }

        Ok(reservation)
    }

    #[instrument(skip(reservations, ledger))]
    pub async fn cancel_reservation(
        reservations: &dyn Repository<Reservation>,
        ledger: &dyn Ledger,
        caller: &Principal,
        id: Uuid,
    ) -> Result<Reservation, AppError> {
        let reservation = Self::get_reservation(reservations, caller, id).await?;
        if reservation.status == ReservationStatus::Cancelled {
            return Err(AppError::bad_request("Reservation is already cancelled"));
        }

        let reservation = ledger
            .cancel_reservation(id)
            .await?
            .ok_or_else(|| AppError::bad_request("Reservation is already cancelled"))?;
        tracing::info!(reservation_id = %reservation.id, "Reservation cancelled");
        Ok(reservation)
    }
}
