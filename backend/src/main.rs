//! Event Weather Planner - Backend Server

use std::{net::SocketAddr, sync::Arc, time::Duration};

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planner_backend::{
    cache::{SystemClock, TtlCache},
    create_app,
    external::weather::WeatherClient,
    services::weather::WeatherGateway,
    AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "planner_server=debug,planner_backend=debug,tower_http=debug,sqlx=warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Event Weather Planner Server");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    // Weather gateway owns the cache and the clock; both are injected here
    // so tests can substitute a manual clock
    let clock = Arc::new(SystemClock);
    let cache = Arc::new(TtlCache::new(
        chrono::Duration::seconds(config.weather.cache_ttl_seconds),
        clock.clone(),
    ));
    let client = WeatherClient::with_base_urls(
        config.weather.api_key.clone(),
        config.weather.api_endpoint.clone(),
        config.weather.geocoding_endpoint.clone(),
    );
    let gateway = WeatherGateway::new(client, cache, clock, config.weather.forecast_horizon_days);

    // Create application state
    let state = AppState {
        db: db_pool,
        config: Arc::new(config.clone()),
        gateway,
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
