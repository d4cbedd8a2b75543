//! # Active Center Models
//!
//! Domain entities, request/response DTOs and list filters for the Active
//! Center API.
//!
//! # Modules
//!
//! - [`auth`]: registration and login payloads
//! - [`users`]: club members and administrators
//! - [`products`]: club shop products
//! - [`spaces`]: bookable club facilities
//! - [`orders`]: shop orders
//! - [`reservations`]: space bookings
//!
//! Each listable entity has two filter types: a `*FilterParams` struct that
//! is deserialised from the query string (filters plus `page`/`limit`), and a
//! plain `*Filter` handed to the storage backend.

pub mod auth;
pub mod orders;
pub mod products;
pub mod reservations;
pub mod spaces;
pub mod users;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest};
pub use orders::{
    CreateOrderDto, Order, OrderFilter, OrderFilterParams, OrderItem, OrderLineDto, OrderStatus,
};
pub use products::{
    CreateProductDto, NameQuery, Product, ProductFilter, ProductFilterParams, UpdateProductDto,
};
pub use reservations::{
    CreateReservationDto, MAX_RESERVATION_HOURS, Reservation, ReservationFilter,
    ReservationFilterParams, ReservationStatus,
};
pub use spaces::{CreateSpaceDto, Space, SpaceFilter, SpaceFilterParams, UpdateSpaceDto};
pub use users::{
    BanStatusResponse, RoleResponse, UpdateProfileDto, User, UserFilter, UserFilterParams,
    UserResponse,
};

/// `range` lets NaN through, so prices also carry this check.
pub(crate) fn finite(value: f64) -> Result<(), validator::ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(validator::ValidationError::new("finite"))
    }
}

/// Case-insensitive substring match.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
