use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use folio_api::config::ServerConfig;
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_core::collaborators::InferenceConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "folio_api=debug,folio_db=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let inference = InferenceConfig::from_env()?;
    tracing::info!(
        model = %inference.model,
        enabled = inference.is_enabled(),
        "Inference collaborators configured"
    );

    let pool = folio_db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::info!(
        max_connections = config.database_max_connections,
        "Database connection pool created"
    );

    folio_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    folio_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    let addr = SocketAddr::new(config.host.parse().context("Invalid HOST")?, config.port);

    let state = AppState {
        pool,
        config: Arc::new(config),
        inference: Arc::new(inference),
    };
    let app = build_app_router(state);

    tracing::info!("Starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
