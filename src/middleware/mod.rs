pub mod auth;
pub mod guard;

pub use auth::AuthUser;
pub use guard::{RouteRequirement, guarded};
