//! # Active Center Config
//!
//! Configuration types for the Active Center API, loaded from environment
//! variables (a `.env` file is read by the binaries through `dotenvy`).
//!
//! - [`jwt`]: token signing configuration
//! - [`cors`]: allowed origins
//! - [`upload`]: image upload directory, public URL and size limit
//! - [`server`]: listener address
//!
//! Every config exposes `from_env()` and `from_vars(lookup)`; the latter takes
//! any variable source so configuration can be built without touching the
//! process environment.

pub mod cors;
pub mod jwt;
pub mod server;
pub mod upload;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
pub use upload::UploadConfig;

use std::str::FromStr;

pub(crate) fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse().ok())
}
