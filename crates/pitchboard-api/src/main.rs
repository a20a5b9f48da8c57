//! Pitchboard API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use pitchboard_core::clock::SystemClock;
use pitchboard_score_store::PgScoreRepository;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use pitchboard_api::error::AppError;
use pitchboard_api::routes;
use pitchboard_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Pitchboard API server");

    // Read configuration from environment.
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| AppError::Config("DATABASE_URL environment variable must be set".into()))?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

    // Create database connection pool and ensure the schema exists.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    let repository = PgScoreRepository::new(pool);
    repository
        .ensure_schema()
        .await
        .map_err(|e| AppError::Config(format!("schema setup failed: {e}")))?;

    // Build application state.
    let app_state = AppState::new(Arc::new(repository), Arc::new(SystemClock));

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::ws::router())
        .nest("/api/v1/scores", routes::scores::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
