use crate::domain::{models::service::ServiceOffering, ports::ServiceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteServiceRepo {
    pool: SqlitePool,
}

impl SqliteServiceRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl ServiceRepository for SqliteServiceRepo {
    async fn upsert(&self, service: &ServiceOffering) -> Result<ServiceOffering, AppError> {
        sqlx::query_as::<_, ServiceOffering>(
            r#"INSERT INTO services (id, title, duration_min, price, price_display, description, meeting_type, position, is_active)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
               title=excluded.title,
               duration_min=excluded.duration_min,
               price=excluded.price,
               price_display=excluded.price_display,
               description=excluded.description,
               meeting_type=excluded.meeting_type,
               position=excluded.position,
               is_active=excluded.is_active
               RETURNING *"#
        )
            .bind(&service.id)
            .bind(&service.title)
            .bind(service.duration_min)
            .bind(service.price)
            .bind(&service.price_display)
            .bind(&service.description)
            .bind(service.meeting_type)
            .bind(service.position)
            .bind(service.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ServiceOffering>, AppError> {
        sqlx::query_as::<_, ServiceOffering>("SELECT * FROM services WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_active(&self) -> Result<Vec<ServiceOffering>, AppError> {
        sqlx::query_as::<_, ServiceOffering>(
            "SELECT * FROM services WHERE is_active = 1 ORDER BY position, title"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
