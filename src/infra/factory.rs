use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::{
    appointment_service::AppointmentService, feedback_service::FeedbackService,
};
use crate::error::AppError;
use crate::state::AppState;
use crate::infra::repositories::{
    sqlite_appointment_repo::SqliteAppointmentRepo, sqlite_contact_repo::SqliteContactRepo,
    sqlite_review_repo::SqliteReviewRepo, sqlite_service_repo::SqliteServiceRepo,
    sqlite_slot_repo::SqliteSlotRepo,
};

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    info!("Initializing SQLite connection with WAL Mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?;

    run_sqlite_migrations(&pool).await?;

    Ok(build_state(pool, config.clone()))
}

/// Wires the repositories and services over an already migrated pool.
pub fn build_state(pool: SqlitePool, config: Config) -> AppState {
    let slot_repo = Arc::new(SqliteSlotRepo::new(pool.clone()));
    let service_repo = Arc::new(SqliteServiceRepo::new(pool.clone()));
    let appointment_repo = Arc::new(SqliteAppointmentRepo::new(pool.clone()));
    let contact_repo = Arc::new(SqliteContactRepo::new(pool.clone()));
    let review_repo = Arc::new(SqliteReviewRepo::new(pool));

    let appointment_service = Arc::new(AppointmentService::new(
        slot_repo.clone(),
        service_repo.clone(),
        appointment_repo.clone(),
        config.clone(),
    ));
    let feedback_service = Arc::new(FeedbackService::new(
        contact_repo.clone(),
        review_repo.clone(),
        config.clone(),
    ));

    AppState {
        config,
        slot_repo,
        service_repo,
        appointment_repo,
        contact_repo,
        review_repo,
        appointment_service,
        feedback_service,
    }
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to run SQLite migrations: {}", e)))
}
