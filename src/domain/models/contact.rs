use crate::domain::models::validation::{require_email, require_non_empty};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn into_message(self) -> Result<ContactMessage, AppError> {
        require_non_empty(&self.name, "Name")?;
        require_email(&self.email)?;
        require_non_empty(&self.message, "Message")?;

        Ok(ContactMessage {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
            status: "new".to_string(),
            created_at: Utc::now(),
        })
    }
}
