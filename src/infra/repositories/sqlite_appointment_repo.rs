use crate::domain::{models::appointment::AppointmentRequest, ports::AppointmentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    async fn create(&self, appointment: &AppointmentRequest) -> Result<AppointmentRequest, AppError> {
        sqlx::query_as::<_, AppointmentRequest>(
            r#"INSERT INTO appointments (id, client_name, email, phone, service_id, preferred_date, meeting_type, status, notes, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&appointment.id)
            .bind(&appointment.client_name)
            .bind(&appointment.email)
            .bind(&appointment.phone)
            .bind(&appointment.service_id)
            .bind(appointment.preferred_date)
            .bind(appointment.meeting_type)
            .bind(appointment.status)
            .bind(&appointment.notes)
            .bind(appointment.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<AppointmentRequest>, AppError> {
        sqlx::query_as::<_, AppointmentRequest>("SELECT * FROM appointments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
