//! Server entrypoint: logging, config, connection pool, routes.

use marquee::{router, AppState, Config};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("marquee=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db.max_connections)
        .idle_timeout(config.db.idle_timeout)
        .acquire_timeout(config.db.acquire_timeout)
        .connect(&config.db.dsn)
        .await?;
    marquee::store::ensure_schema(&pool).await?;
    tracing::info!("database connection pool established");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(env = %config.env, %addr, "starting server");

    let state = AppState::new(config, pool);
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
