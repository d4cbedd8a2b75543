//! # Active Center DB
//!
//! Storage for the Active Center API.
//!
//! - [`store`]: the generic [`Repository`] contract with an in-memory and a
//!   PostgreSQL backend
//! - [`Ledger`]: multi-row writes (stock, bookings) run as one unit
//! - [`init_db_pool`] / [`run_migrations`]: PostgreSQL pool setup
//!
//! # Example
//!
//! ```ignore
//! use activecenter_db::{PgStore, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&database_url).await?;
//! run_migrations(&pool).await?;
//! let store = PgStore::new(pool);
//! ```

pub mod store;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;
pub use store::ledger::{InMemoryLedger, Ledger, ProductChange};
pub use store::memory::InMemoryRepository;
pub use store::postgres::PgStore;
pub use store::{Criteria, Entity, Repository, StoreError, StoreResult};

/// Connects a PostgreSQL pool.
///
/// # Errors
///
/// Returns the driver error if the URL is invalid or the server is unreachable.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Applies the migrations under `migrations/` at the workspace root.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
