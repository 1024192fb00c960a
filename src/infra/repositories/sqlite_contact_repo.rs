use crate::domain::{models::contact::ContactMessage, ports::ContactMessageRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteContactRepo {
    pool: SqlitePool,
}

impl SqliteContactRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl ContactMessageRepository for SqliteContactRepo {
    async fn create(&self, message: &ContactMessage) -> Result<ContactMessage, AppError> {
        sqlx::query_as::<_, ContactMessage>(
            "INSERT INTO contact_messages (id, name, email, message, status, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&message.id)
            .bind(&message.name)
            .bind(&message.email)
            .bind(&message.message)
            .bind(&message.status)
            .bind(message.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
