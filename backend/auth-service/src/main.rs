/// Auth Gateway - Main entry point
///
/// Starts the REST API with:
/// - PostgreSQL connection pool (local profiles)
/// - Supabase GoTrue client (external identities)
/// - AMQP publisher (sign-up broadcasts)
/// - Dependency health aggregator
use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

use auth_service::{
    config::{load_dotenv, Settings},
    db::{PgProfileStore, MIGRATOR},
    health::{
        BrokerHealthCheck, HealthAggregator, HealthSection, IdentityProviderHealthCheck,
        PostgresHealthCheck,
    },
    routes::start_http_server,
    services::{AuthService, SupabaseClient, UserMessagingService},
    telemetry::init_tracing,
    AppState,
};

/// Broker queue name reported on `/status`
const BROKER_PROBE_NAME: &str = "user";
const IDENTITY_PROBE_NAME: &str = "supabase";

#[tokio::main]
async fn main() -> Result<()> {
    // Before tracing, so RUST_LOG from .env takes effect
    let dotenv = load_dotenv();
    init_tracing();

    info!("Starting Auth Gateway");
    if let Some(path) = dotenv {
        info!(path = %path.display(), "Loaded .env file for development");
    }

    let settings = Settings::load()?;
    info!(env = ?settings.env, "Configuration loaded successfully");

    // Initialize database connection pool
    let connect_options = PgConnectOptions::new()
        .host(&settings.database.host)
        .port(settings.database.port)
        .database(&settings.database.name)
        .username(&settings.database.username)
        .password(&settings.database.password);

    let db_pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(connect_options)
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!(
        "Database pool initialized with {} max connections",
        settings.database.max_connections
    );

    // Run database migrations
    MIGRATOR
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    let identity = Arc::new(
        SupabaseClient::new(&settings.supabase).context("Failed to initialize Supabase client")?,
    );

    // Start-up continues without a broker; publish reconnects
    let publisher = Arc::new(UserMessagingService::new(settings.rabbitmq.uri.clone()));
    publisher.connect().await;

    let profiles = Arc::new(PgProfileStore::new(db_pool.clone()));

    let health = HealthAggregator::new(settings.health.probe_timeout())
        .with_probe(
            HealthSection::Integrations,
            IDENTITY_PROBE_NAME,
            Arc::new(IdentityProviderHealthCheck::new(identity.clone())),
        )
        .with_probe(
            HealthSection::Databases,
            settings.database.name.clone(),
            Arc::new(PostgresHealthCheck::new(db_pool.clone())),
        )
        .with_probe(
            HealthSection::Rabbitmq,
            BROKER_PROBE_NAME,
            Arc::new(BrokerHealthCheck::new(publisher.clone())),
        );

    let state = AppState {
        auth: Arc::new(AuthService::new(identity, profiles, publisher)),
        health: Arc::new(health),
    };

    start_http_server(
        state,
        &settings.server.host,
        settings.server.port,
        shutdown_signal(),
    )
    .await?;

    db_pool.close().await;
    info!("Auth Gateway shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
