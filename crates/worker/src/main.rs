//! Worker binary: migrates and seeds the store, ensures the current week
//! exists, then runs the reminder/rollover scheduler until shutdown.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rota_core::CategoryTargets;
use rota_engine::{NotificationDispatcher, RotaService, SchedulerConfig};

/// Dispatcher that writes announcements to the log. Stands in until a
/// chat transport is wired up.
struct LogDispatcher;

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn send(&self, text: &str) -> anyhow::Result<()> {
        tracing::info!(message = %text, "Notification");
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rota_worker=debug,rota_engine=debug,rota_db=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let targets = CategoryTargets::from_env().expect("Invalid CATEGORY_TARGETS");
    let scheduler_config = SchedulerConfig::from_env();

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = rota_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    rota_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    rota_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Task catalog ---
    let outcome = rota_db::seed::seed_task_types(&pool)
        .await
        .expect("Failed to seed task types");
    tracing::info!(
        inserted = outcome.inserted,
        skipped = outcome.skipped,
        already_seeded = outcome.already_seeded,
        "Task catalog ready"
    );

    let catalog = rota_db::repositories::TaskTypeRepo::list_all(&pool)
        .await
        .expect("Failed to load task catalog");
    if let Err(e) = targets.validate_against(catalog.iter().map(|t| t.category.as_str())) {
        panic!("Invalid CATEGORY_TARGETS: {e}");
    }

    // --- Engine ---
    let service = RotaService::new(pool, targets);

    let ensured = service
        .ensure_active_week()
        .await
        .expect("Failed to ensure active week");
    tracing::info!(
        year = ensured.week.year,
        week = ensured.week.week_number,
        created = ensured.week_created,
        created_instances = ensured.created_instances,
        "Active week ensured"
    );

    // --- Scheduler ---
    let cancel = CancellationToken::new();
    let scheduler_handle = tokio::spawn(rota_engine::scheduler::run(
        service,
        Arc::new(LogDispatcher),
        scheduler_config,
        cancel.clone(),
    ));

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
    tracing::info!("Shutdown signal received");

    cancel.cancel();
    if let Err(e) = scheduler_handle.await {
        tracing::error!(error = %e, "Scheduler task panicked");
    }
    tracing::info!("Worker stopped");
}
