//! Lectern Server - REST API for reading holy texts

use anyhow::{Context, Result};
use lectern_server::{routes, state};
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lectern_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Create application state
    let state = state::AppState::new().await?;

    let idle_secs = match std::env::var("LECTERN_SESSION_IDLE_SECS") {
        Ok(secs) => secs.parse().with_context(|| {
            format!("LECTERN_SESSION_IDLE_SECS: '{}' is not a number of seconds", secs)
        })?,
        Err(_) => 1800,
    };
    state.spawn_session_sweeper(Duration::from_secs(idle_secs));

    // Build router
    let app = routes::create_router(state);

    // Start server
    let addr: SocketAddr = match std::env::var("LECTERN_BIND") {
        Ok(bind) => bind
            .parse()
            .with_context(|| format!("LECTERN_BIND: '{}' is not a socket address", bind))?,
        Err(_) => SocketAddr::from(([127, 0, 0, 1], 3000)),
    };
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
