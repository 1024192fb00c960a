use crate::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_CONTENT_CHARS: usize = 10;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Review {
    pub id: String,
    pub name: String,
    pub rating: i32,
    pub content: String,
    pub review_date: NaiveDate,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ReviewForm {
    pub name: String,
    pub rating: i32,
    pub content: String,
}

impl ReviewForm {
    /// Builds an unapproved review dated `today`.
    pub fn into_review(self, today: NaiveDate) -> Result<Review, AppError> {
        let name = self.name.trim();
        if name.chars().count() < MIN_NAME_CHARS {
            return Err(AppError::Validation(format!(
                "Please enter your name (at least {} characters)", MIN_NAME_CHARS
            )));
        }

        if !(1..=5).contains(&self.rating) {
            return Err(AppError::Validation("Please choose a rating between 1 and 5 stars".into()));
        }

        let content = self.content.trim();
        if content.chars().count() < MIN_CONTENT_CHARS {
            return Err(AppError::Validation(format!(
                "Please write a review (at least {} characters)", MIN_CONTENT_CHARS
            )));
        }

        Ok(Review {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            rating: self.rating,
            content: content.to_string(),
            review_date: today,
            approved: false,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
}

impl RatingSummary {
    pub fn from_totals(count: i64, total: i64) -> Self {
        let average = if count > 0 { total as f64 / count as f64 } else { 0.0 };
        Self { average, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_review_rules() {
        let good = ReviewForm { name: " Éva ".into(), rating: 5, content: "Nagyon sokat segített!".into() };
        let review = good.into_review(today()).unwrap();
        assert_eq!(review.name, "Éva");
        assert!(!review.approved);
        assert_eq!(review.review_date, today());

        let short_name = ReviewForm { name: "É".into(), rating: 4, content: "Kedves és türelmes.".into() };
        assert!(short_name.into_review(today()).is_err());

        let bad_rating = ReviewForm { name: "Éva".into(), rating: 6, content: "Kedves és türelmes.".into() };
        assert!(bad_rating.into_review(today()).is_err());

        let short_text = ReviewForm { name: "Éva".into(), rating: 3, content: "   ok    ".into() };
        assert!(short_text.into_review(today()).is_err());
    }

    #[test]
    fn test_rating_summary() {
        assert_eq!(RatingSummary::from_totals(0, 0).average, 0.0);
        assert_eq!(RatingSummary::from_totals(4, 18).average, 4.5);
    }
}
