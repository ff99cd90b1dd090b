//! Hit store API server entry point.

use std::sync::Arc;

use hitstore_api::config::Config;
use hitstore_api::error::AppError;
use hitstore_api::retention::spawn_retention_sweeper;
use hitstore_api::state::AppState;
use hitstore_api::{routes, telemetry};
use hitstore_core::clock::{Clock, SystemClock};
use hitstore_core::repository::HitEventStore;
use hitstore_core::validation::ConstraintValidator;
use hitstore_history::domain::window::RetentionPolicy;
use hitstore_pg::pg_hit_event_store::PgHitEventStore;
use hitstore_pg::schema::MIGRATOR;
use hitstore_pg::timeout::TimeoutHitEventStore;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting hit store API server");

    let result = run(&config).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "server exited with error");
    }

    telemetry.shutdown();
    result
}

async fn run(config: &Config) -> Result<(), AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.store_timeout)
        .connect(&config.database_url)
        .await?;

    MIGRATOR.run(&pool).await?;
    tracing::info!("database migrations applied");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store: Arc<dyn HitEventStore> = Arc::new(TimeoutHitEventStore::new(
        PgHitEventStore::new(pool),
        config.store_timeout,
    ));
    let app_state = AppState::new(clock.clone(), Arc::new(ConstraintValidator), store.clone());

    let sweeper = config.retention_days.map(|days| {
        spawn_retention_sweeper(
            RetentionPolicy::new(days),
            config.retention_sweep_interval,
            clock,
            store,
        )
    });

    let app = routes::app(app_state);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    tracing::info!("server stopped");

    served?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
