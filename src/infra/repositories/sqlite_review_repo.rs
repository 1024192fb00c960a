use crate::domain::{models::review::{RatingSummary, Review}, ports::ReviewRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteReviewRepo {
    pool: SqlitePool,
}

impl SqliteReviewRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl ReviewRepository for SqliteReviewRepo {
    async fn create(&self, review: &Review) -> Result<Review, AppError> {
        sqlx::query_as::<_, Review>(
            r#"INSERT INTO reviews (id, name, rating, content, review_date, approved, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&review.id)
            .bind(&review.name)
            .bind(review.rating)
            .bind(&review.content)
            .bind(review.review_date)
            .bind(review.approved)
            .bind(review.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_approved(&self) -> Result<Vec<Review>, AppError> {
        sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE approved = 1 ORDER BY review_date DESC, created_at DESC"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn rating_summary(&self) -> Result<RatingSummary, AppError> {
        let (count, total): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(rating), 0) FROM reviews WHERE approved = 1"
        )
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(RatingSummary::from_totals(count, total))
    }
}
