//! Collector Backend Service
//!
//! Main entry point for the group expense bot. Connects to Postgres, applies
//! migrations and long-polls Telegram until shutdown.

use collector_backend::bot::{BotPoller, TelegramClient};
use collector_backend::database::{create_pool, run_migrations};
use collector_backend::{AppConfig, AppError, AppResult, AppState};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    // Initialize tracing/logging with config
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("collector_backend={},sqlx=warn", config.log_level).into());
    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Collector backend starting");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);

    // =========================================================================
    // DATABASE SETUP
    // =========================================================================
    info!("Connecting to database...");

    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to create database pool: {}", e);
        AppError::Database(e)
    })?;

    info!("Database connection pool created successfully");
    info!("Max connections: {}", config.database.max_connections);

    info!("Running database migrations...");
    run_migrations(&pool, None).await.map_err(|e| {
        error!("Database migration failed: {}", e);
        AppError::Database(e)
    })?;

    info!("Database migrations completed successfully");

    // =========================================================================
    // SERVICES
    // =========================================================================
    let app_state = AppState::new(pool);
    let handler = Arc::new(app_state.bot_handler());
    info!("✓ Services initialized");

    let client = Arc::new(TelegramClient::new(config.bot.clone())?);
    let poller = BotPoller::new(client, handler).with_poll_timeout(config.bot.poll_timeout());

    let poller_handle = tokio::spawn(async move {
        poller.start().await;
    });
    info!("✓ Bot poller started ({})", config.bot.api_url);
    info!("Press Ctrl+C to shutdown gracefully");

    // =========================================================================
    // SHUTDOWN HANDLING
    // =========================================================================
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down gracefully...");
        }
        _ = poller_handle => {
            error!("Bot poller exited unexpectedly");
        }
    }

    app_state.database.close().await;
    info!("Collector backend shutdown complete");
    Ok(())
}
