use crate::domain::{models::slot::{DayAvailability, DaySlotRecord}, ports::SlotRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct SqliteSlotRepo {
    pool: SqlitePool,
}

impl SqliteSlotRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl SlotRepository for SqliteSlotRepo {
    async fn upsert(&self, record: &DaySlotRecord) -> Result<DaySlotRecord, AppError> {
        sqlx::query_as::<_, DaySlotRecord>(
            r#"INSERT INTO slots (date, available_times, is_fully_booked, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(date) DO UPDATE SET
               available_times=excluded.available_times,
               is_fully_booked=excluded.is_fully_booked,
               updated_at=excluded.updated_at
               RETURNING *"#
        )
            .bind(record.date)
            .bind(&record.available_times)
            .bind(record.is_fully_booked)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<DaySlotRecord>, AppError> {
        sqlx::query_as::<_, DaySlotRecord>("SELECT * FROM slots WHERE date = ?")
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayAvailability>, AppError> {
        sqlx::query_as::<_, DayAvailability>(
            "SELECT date, is_fully_booked FROM slots WHERE date >= ? AND date <= ? ORDER BY date"
        )
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
