use activecenter::logging::{LOG_DIR, init_tracing};
use activecenter::router::init_router;
use activecenter::state::init_app_state;
use activecenter_config::ServerConfig;
use anyhow::Context;
use dotenvy::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing(LOG_DIR).context("Failed to initialise logging")?;

    let state = init_app_state().await?;
    let server_config = ServerConfig::from_env();
    let app = init_router(state);

    let address = server_config.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!("Server running on http://{}", address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", address);
    tracing::info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
