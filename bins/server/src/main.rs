//! Tadika API Server
//!
//! Main entry point for the kindergarten billing service.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tadika_api::{AppState, create_router};
use tadika_db::connect;
use tadika_shared::{AppConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tadika=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = connect(&config.database).await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let jwt_service = JwtService::new(&config.jwt);
    info!(
        academic_months = config.billing.academic_months,
        overpayment_policy = ?config.billing.overpayment_policy,
        dashboard_cache_ttl_secs = config.billing.dashboard_cache_ttl_secs,
        "Billing rules loaded"
    );

    let state = AppState::new(db, jwt_service, config.billing);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
