use std::sync::{Arc, Mutex};

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use citas::config::AppConfig;
use citas::db;
use citas::handlers;
use citas::services::appointments::sqlite::SqliteAppointments;
use citas::services::session_store::SessionStore;
use citas::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    let conn = db::init_db(&config.database_url)?;

    tracing::info!(
        timezone = %config.timezone,
        session_ttl_minutes = config.session_ttl_minutes,
        "booking assistant configured"
    );

    let state = Arc::new(AppState {
        sessions: SessionStore::new(config.session_ttl()),
        appointments: Box::new(SqliteAppointments::new(Arc::new(Mutex::new(conn)))),
        config: config.clone(),
    });

    let app = handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
