//! Space reservations.
//!
//! A member books a space for a whole number of hours starting at a given
//! instant. The price is fixed at booking time from the space's hourly rate.
//! Two confirmed reservations of the same space never overlap; a cancelled
//! one frees its slot.

use std::fmt;
use std::str::FromStr;

use activecenter_core::PaginationParams;
use activecenter_core::serde::deserialize_lenient;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::spaces::Space;

/// Longest single booking.
pub const MAX_RESERVATION_HOURS: i32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => f.write_str("confirmed"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown reservation status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: Uuid,
    pub space_id: Uuid,
    pub user_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub people: i32,
    /// Hourly rate at booking time times the booked hours
    pub total: f64,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(space: &Space, user_id: Uuid, dto: &CreateReservationDto) -> Self {
        Self {
            id: Uuid::new_v4(),
            space_id: space.id,
            user_id,
            starts_at: dto.starts_at,
            ends_at: dto.ends_at(),
            people: dto.people,
            total: space.price_hour * f64::from(dto.hours),
            status: ReservationStatus::Confirmed,
            created_at: Utc::now(),
        }
    }

    /// Whether this booking still holds any part of `[starts_at, ends_at)`.
    pub fn blocks(&self, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::Confirmed
            && self.starts_at < ends_at
            && starts_at < self.ends_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReservationDto {
    pub space_id: Uuid,
    /// RFC 3339 start instant, e.g. `2026-11-02T18:00:00Z`
    pub starts_at: DateTime<Utc>,
    #[validate(range(min = 1, max = 12, message = "A reservation lasts between 1 and 12 hours"))]
    pub hours: i32,
    #[validate(range(min = 1, message = "At least one person must attend"))]
    pub people: i32,
}

impl CreateReservationDto {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + Duration::hours(i64::from(self.hours))
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReservationFilterParams {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub space_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub user_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    #[param(value_type = Option<ReservationStatus>)]
    pub status: Option<ReservationStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl ReservationFilterParams {
    pub fn filter(&self) -> ReservationFilter {
        ReservationFilter {
            space_id: self.space_id,
            user_id: self.user_id,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationFilter {
    pub space_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub status: Option<ReservationStatus>,
}

impl ReservationFilter {
    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.space_id.is_none_or(|id| reservation.space_id == id)
            && self.user_id.is_none_or(|id| reservation.user_id == id)
            && self.status.is_none_or(|status| reservation.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spaces::CreateSpaceDto;
    use chrono::TimeZone;

    fn court() -> Space {
        Space::new(CreateSpaceDto {
            title: "Tennis Court".to_string(),
            description: String::new(),
            price_hour: 20.0,
            max_people: Some(4),
            details: None,
            characteristics: vec![],
        })
    }

    fn booking(hour: u32, hours: i32) -> CreateReservationDto {
        CreateReservationDto {
            space_id: Uuid::new_v4(),
            starts_at: Utc.with_ymd_and_hms(2030, 3, 1, hour, 0, 0).unwrap(),
            hours,
            people: 2,
        }
    }

    #[test]
    fn test_total_and_end_follow_the_booked_hours() {
        let reservation = Reservation::new(&court(), Uuid::new_v4(), &booking(18, 2));
        assert_eq!(reservation.total, 40.0);
        assert_eq!(reservation.ends_at, Utc.with_ymd_and_hms(2030, 3, 1, 20, 0, 0).unwrap());
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
    }

    #[test]
    fn test_blocks_overlapping_slots_only() {
        let space = court();
        let mut held = Reservation::new(&space, Uuid::new_v4(), &booking(18, 2));

        let cases = [
            (booking(17, 1), false),
            (booking(17, 2), true),
            (booking(19, 1), true),
            (booking(20, 1), false),
            (booking(16, 6), true),
        ];
        for (other, expected) in cases {
            assert_eq!(
                held.blocks(other.starts_at, other.ends_at()),
                expected,
                "{:?}",
                other.starts_at
            );
        }

        held.status = ReservationStatus::Cancelled;
        let same = booking(18, 2);
        assert!(!held.blocks(same.starts_at, same.ends_at()));
    }

    #[test]
    fn test_create_dto_validation() {
        assert!(booking(10, 1).validate().is_ok());
        assert!(booking(10, 0).validate().is_err());
        assert!(booking(10, MAX_RESERVATION_HOURS + 1).validate().is_err());

        let mut nobody = booking(10, 1);
        nobody.people = 0;
        assert!(nobody.validate().is_err());
    }

    #[test]
    fn test_status_parses_case_insensitively() {
        assert_eq!("Cancelled".parse::<ReservationStatus>(), Ok(ReservationStatus::Cancelled));
        assert!("pending".parse::<ReservationStatus>().is_err());
    }
}
