//! # Active Center CLI
//!
//! Administration and seeding utilities used by the `activecenter-cli` binary.
//!
//! ## Usage
//!
//! ```ignore
//! use activecenter_cli::seeder::{create_admin, seed_spaces};
//!
//! let store = PgStore::new(pool);
//! seed_spaces(&store).await?;
//! create_admin(&store, "Club Admin", "admin@club.test", "changeme123").await?;
//! ```

pub mod seeder;
