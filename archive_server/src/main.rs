//! Scholarship archive server.
//!
//! Run from repo root: `cargo run -p archive-server`
//! Settings come from the environment (see `ServerConfig::from_env`); a `.env` file is loaded first.

use scholarship_archive::{apply_migrations, app, connect, ensure_database_exists, AppState, ServerConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("scholarship_archive=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    ensure_database_exists(&config.database_url).await?;
    let pool = connect(&config).await?;
    apply_migrations(&pool).await?;

    let listener = TcpListener::bind(config.bind_addr()).await?;
    let state = AppState::new(pool, config);
    tracing::info!("scholarship archive listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
