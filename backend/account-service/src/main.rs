/// Account Service Main Entry Point
///
/// Starts the HTTP server with:
/// - PostgreSQL connection pool (embedded migrations run at boot)
/// - Email gateway (SMTP, or no-op mode without SMTP_HOST)
/// - One identity router mounted per role tier
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::info;

use account_service::{config::Settings, routes, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "account_service=info,info".into()),
        )
        .with_target(false)
        .json()
        .init();

    info!("Starting account service");

    let settings = Settings::from_env().context("Failed to load configuration")?;

    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Database connection pool initialized");

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("Database migrations failed")?;
    info!("Database migrations applied");

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = AppState::new(db, settings).context("Failed to initialize services")?;
    let app = routes::build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}
