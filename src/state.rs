use std::sync::Arc;

use activecenter_config::{CorsConfig, JwtConfig, UploadConfig};
use activecenter_core::{FileStorage, LocalFileStorage};
use activecenter_db::{
    InMemoryLedger, InMemoryRepository, Ledger, PgPool, PgStore, Repository, init_db_pool,
    run_migrations,
};
use activecenter_models::{Order, Product, Reservation, Space, User};
use anyhow::Context;

/// Shared application state.
///
/// Each repository is a trait object so the same handlers run on the
/// PostgreSQL store or the in-memory store. `ledger` writes to the same rows
/// as the repositories; it is what moves stock and takes bookings.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn Repository<User>>,
    pub products: Arc<dyn Repository<Product>>,
    pub spaces: Arc<dyn Repository<Space>>,
    pub orders: Arc<dyn Repository<Order>>,
    pub reservations: Arc<dyn Repository<Reservation>>,
    pub ledger: Arc<dyn Ledger>,
    pub files: Arc<dyn FileStorage>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub upload_config: UploadConfig,
}

impl AppState {
    /// State backed by process-local storage; nothing survives a restart.
    pub fn in_memory(
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        upload_config: UploadConfig,
    ) -> Self {
        let products = InMemoryRepository::<Product>::new();
        let spaces = InMemoryRepository::<Space>::new();
        let orders = InMemoryRepository::<Order>::new();
        let reservations = InMemoryRepository::<Reservation>::new();
        let ledger = InMemoryLedger::new(
            products.clone(),
            orders.clone(),
            spaces.clone(),
            reservations.clone(),
        );

        Self {
            users: Arc::new(InMemoryRepository::<User>::new()),
            products: Arc::new(products),
            spaces: Arc::new(spaces),
            orders: Arc::new(orders),
            reservations: Arc::new(reservations),
            ledger: Arc::new(ledger),
            files: file_storage(&upload_config),
            jwt_config,
            cors_config,
            upload_config,
        }
    }

    pub fn postgres(
        pool: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        upload_config: UploadConfig,
    ) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            users: store.clone(),
            products: store.clone(),
            spaces: store.clone(),
            orders: store.clone(),
            reservations: store.clone(),
            ledger: store,
            files: file_storage(&upload_config),
            jwt_config,
            cors_config,
            upload_config,
        }
    }
}

fn file_storage(upload_config: &UploadConfig) -> Arc<dyn FileStorage> {
    Arc::new(LocalFileStorage::with_max_size(
        upload_config.dir.clone(),
        upload_config.base_url.clone(),
        upload_config.max_bytes,
    ))
}

/// Builds the state from the environment.
///
/// Uses PostgreSQL when `DATABASE_URL` is set (running pending migrations),
/// the in-memory store otherwise.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env();
    let cors_config = CorsConfig::from_env();
    let upload_config = UploadConfig::from_env();

    match std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()) {
        Some(database_url) => {
            let pool = init_db_pool(&database_url)
                .await
                .context("Failed to connect to database")?;
            run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Using PostgreSQL storage");
            Ok(AppState::postgres(pool, jwt_config, cors_config, upload_config))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");
            Ok(AppState::in_memory(jwt_config, cors_config, upload_config))
        }
    }
}
