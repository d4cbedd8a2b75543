//! # Active Center API
//!
//! A REST API for a sports club built with Rust, Axum and PostgreSQL. Members
//! register and log in, browse the shop catalogue and the club facilities,
//! place orders and book facilities; administrators manage the catalogue,
//! facilities and member accounts.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Bearer authentication and per-route guards
//! ├── extract.rs        # Path and Query extractors with JSON rejections
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Registration, login, current user
//! │   ├── users/       # Member administration and profiles
//! │   ├── products/    # Shop catalogue
//! │   ├── spaces/      # Bookable facilities
//! │   ├── orders/      # Shop orders
//! │   └── reservations/ # Space bookings
//! ├── multipart.rs      # Multipart form parsing for image uploads
//! └── validator.rs      # Validated JSON extractor
//! ```
//!
//! Each feature module has the same layout:
//!
//! - `controller.rs`: HTTP handlers with OpenAPI annotations
//! - `service.rs`: business logic over the repository traits
//! - `router.rs`: routes and their access requirements
//!
//! Entities, DTOs and filters live in `activecenter-models`; storage backends
//! in `activecenter-db`.
//!
//! ## Access control
//!
//! | Requirement | Meaning |
//! |-------------|---------|
//! | public | no credential needed, none checked |
//! | authenticated | any valid bearer token |
//! | admin | valid token with the `admin` role |
//!
//! A missing or invalid token on a protected route yields 401; a valid token
//! without the required role yields 403.
//!
//! ## Storage
//!
//! With `DATABASE_URL` set the API runs on PostgreSQL and applies pending
//! migrations at startup. Without it everything is kept in memory.
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod docs;
pub mod extract;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod multipart;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use activecenter_auth;
pub use activecenter_config;
pub use activecenter_core;
pub use activecenter_db;
pub use activecenter_models;
