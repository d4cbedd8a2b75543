//! # Active Center Auth
//!
//! Authentication types for the Active Center API.
//!
//! - [`roles`]: [`Role`] and [`UserStatus`] registries
//! - [`claims`]: access token claims
//! - [`principal`]: the authenticated caller resolved from a token
//! - [`jwt`]: token creation and verification

pub mod claims;
pub mod jwt;
pub mod principal;
pub mod roles;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
pub use principal::Principal;
pub use roles::{Role, UserStatus};
