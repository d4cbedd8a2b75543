//! Database seeding for a fresh club installation.
//!
//! - [`spaces`]: the default club facilities, inserted when their title is absent
//! - [`admins`]: administrator accounts
//!
//! Both seeders work against the [`Repository`](activecenter_db::Repository)
//! contract, so they run the same way on PostgreSQL and in memory.

pub mod admins;
pub mod spaces;

pub use admins::create_admin;
pub use spaces::{SeedReport, default_spaces, seed_spaces};
