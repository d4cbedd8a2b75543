pub mod auth;
pub mod orders;
pub mod products;
pub mod reservations;
pub mod spaces;
pub mod users;
