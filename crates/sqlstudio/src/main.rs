use std::net::SocketAddr;

use clap::Parser;
use sqlx::mysql::MySqlPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sqlstudio::{
    config::{Args, StudioConfig},
    create_router,
    state::AppState,
};
use sqlstudio_auth::{AuditLog, AuthGate, RateLimitConfig, RateLimiter, SharedSecret};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let log_filter = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("sqlstudio={},tower_http=info", log_filter).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config: StudioConfig = args.into();
    if config.pool_min_connections > config.pool_max_connections {
        anyhow::bail!("pool_min_connections cannot exceed pool_max_connections");
    }

    // The audit file is the gate's only fatal dependency: refuse to start
    // without a working trail rather than silently losing it later.
    let audit = AuditLog::open(&config.audit_log)?;
    let limiter = RateLimiter::new(RateLimitConfig {
        max_attempts: config.login_max_attempts,
        window: config.login_window,
    });
    let gate = AuthGate::new(
        SharedSecret::new(config.admin_secret.clone()),
        limiter,
        audit,
    );

    let pool = MySqlPoolOptions::new()
        .min_connections(config.pool_min_connections)
        .max_connections(config.pool_max_connections)
        .connect_lazy(&config.mysql_url())?;

    // Probe connectivity up front; the console still starts when the
    // server is down and reports it via /health.
    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => tracing::info!("database connection established"),
        Err(err) => tracing::warn!(%err, "database connection test failed"),
    }

    let state = AppState::new(pool, gate, config.clone());
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr()).await?;
    tracing::info!("SQLStudio listening on http://{}", config.listen_addr());
    tracing::info!(audit_log = %config.audit_log.display(), "login audit trail enabled");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
