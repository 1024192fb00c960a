use std::sync::Arc;
use crate::config::Config;
use crate::domain::{
    models::{
        contact::{ContactForm, ContactMessage},
        review::{RatingSummary, Review, ReviewForm},
    },
    ports::{ContactMessageRepository, ReviewRepository},
};
use crate::error::AppError;
use chrono::Utc;
use tracing::info;

pub struct FeedbackService {
    contact_repo: Arc<dyn ContactMessageRepository>,
    review_repo: Arc<dyn ReviewRepository>,
    config: Config,
}

impl FeedbackService {
    pub fn new(
        contact_repo: Arc<dyn ContactMessageRepository>,
        review_repo: Arc<dyn ReviewRepository>,
        config: Config,
    ) -> Self {
        Self { contact_repo, review_repo, config }
    }

    pub async fn submit_contact_message(&self, form: ContactForm) -> Result<ContactMessage, AppError> {
        let message = form.into_message()?;
        self.config.require_write_token()?;

        let created = self.contact_repo.create(&message).await?;
        info!("Contact message {} stored", created.id);
        Ok(created)
    }

    /// Stores a review for moderation, dated today in the practice time zone.
    pub async fn submit_review(&self, form: ReviewForm) -> Result<Review, AppError> {
        let today = Utc::now().with_timezone(&self.config.practice_timezone).date_naive();
        let review = form.into_review(today)?;
        self.config.require_write_token()?;

        let created = self.review_repo.create(&review).await?;
        info!("Review {} stored, awaiting approval", created.id);
        Ok(created)
    }

    pub async fn approved_reviews(&self) -> Result<Vec<Review>, AppError> {
        self.review_repo.list_approved().await
    }

    pub async fn rating_summary(&self) -> Result<RatingSummary, AppError> {
        self.review_repo.rating_summary().await
    }
}
