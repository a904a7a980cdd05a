use anyhow::Result;
use fitness_tracker::api::routes::{create_routes, AppState};
use fitness_tracker::auth::JwtService;
use fitness_tracker::config::{run_migrations, AppConfig, DatabaseConfig};
use fitness_tracker::repository::Repositories;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    if config.is_development() {
        info!("Running in development mode");
    }

    let pool = db_config.create_pool().await?;
    run_migrations(&pool).await?;
    info!("Database ready");

    let state = AppState::new(
        Repositories::postgres(pool),
        JwtService::new(&config.jwt_secret),
        config.credential_store(),
    );
    let app = create_routes(state);

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Fitness tracker server starting on http://{}", address);
    info!("Health check available at http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
