use crate::error::AppError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum MeetingType {
    Online,
    InPerson,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::Online => "online",
            MeetingType::InPerson => "in-person",
        }
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeetingType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(MeetingType::Online),
            "in-person" => Ok(MeetingType::InPerson),
            other => Err(AppError::Validation(format!("Unknown meeting type: {}", other))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct ServiceOffering {
    pub id: String,
    pub title: String,
    pub duration_min: i32,
    pub price: i32, // HUF
    pub price_display: Option<String>,
    pub description: Option<String>,
    pub meeting_type: Option<MeetingType>, // None = offered both ways
    pub position: i32,
    pub is_active: bool,
}

impl ServiceOffering {
    pub fn new(id: &str, title: &str, duration_min: i32, price: i32, position: i32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            duration_min,
            price,
            price_display: None,
            description: None,
            meeting_type: None,
            position,
            is_active: true,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Service title is required".into()));
        }
        if self.duration_min <= 0 {
            return Err(AppError::Validation(format!(
                "Service '{}' must have a positive duration", self.title
            )));
        }
        if self.price < 0 {
            return Err(AppError::Validation(format!("Service '{}' has a negative price", self.title)));
        }
        Ok(())
    }

    pub fn supports(&self, meeting_type: MeetingType) -> bool {
        self.meeting_type.is_none_or(|declared| declared == meeting_type)
    }
}
