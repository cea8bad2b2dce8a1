//! Larder API Server
//!
//! Main entry point for the Larder backend service.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use larder_api::{AppState, create_router};
use larder_core::ratelimit::{RateLimitConfig, SlidingWindowLimiter};
use larder_db::{connect, migration::Migrator};
use larder_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    Migrator::up(&db, None).await?;
    info!("Migrations applied");

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        token_expires_days: config.jwt.token_expiry_days,
    });

    let limiter = Arc::new(SlidingWindowLimiter::new(RateLimitConfig {
        max_requests: config.rate_limit.max_requests,
        window: Duration::from_secs(config.rate_limit.window_secs),
    }));
    spawn_eviction(
        Arc::clone(&limiter),
        Duration::from_secs(config.rate_limit.eviction_interval_secs.max(1)),
    );

    let state = AppState::new(db, jwt_service, limiter);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Human-readable logs by default, JSON lines with `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "larder=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Periodically drops limiter keys with no requests left in the window.
fn spawn_eviction(limiter: Arc<SlidingWindowLimiter>, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let removed = limiter.evict_stale();
            if removed > 0 {
                debug!(removed, tracked = limiter.tracked_keys(), "Evicted idle rate limit keys");
            }
        }
    });
}
