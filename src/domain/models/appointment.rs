use crate::domain::models::{
    service::MeetingType,
    slot::TimeMarker,
    validation::{require_email, require_non_empty},
};
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AppointmentRequest {
    pub id: String,
    pub client_name: String,
    pub email: String,
    pub phone: String,
    pub service_id: String,
    pub preferred_date: DateTime<Utc>,
    pub meeting_type: MeetingType,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub client_name: String,
    pub email: String,
    pub phone: String,
    pub service_id: String,
    pub preferred_date: DateTime<Utc>,
    pub meeting_type: MeetingType,
    pub notes: Option<String>,
}

impl AppointmentRequest {
    pub fn new(params: NewAppointmentParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_name: params.client_name,
            email: params.email,
            phone: params.phone,
            service_id: params.service_id,
            preferred_date: params.preferred_date,
            meeting_type: params.meeting_type,
            status: AppointmentStatus::Pending,
            notes: params.notes,
            created_at: Utc::now(),
        }
    }
}

/// Everything the booking form collects. Missing fields deserialize to empty
/// values so validation can report them instead of the JSON extractor.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppointmentForm {
    pub service_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeMarker>,
    pub meeting_type: Option<MeetingType>,
    pub notes: Option<String>,
    pub privacy_consent: bool,
}

/// A form that passed `AppointmentForm::validate`.
#[derive(Debug, Clone)]
pub struct ValidatedAppointment {
    pub service_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: TimeMarker,
    pub meeting_type: MeetingType,
    pub notes: Option<String>,
}

impl AppointmentForm {
    pub fn validate(&self) -> Result<ValidatedAppointment, AppError> {
        require_non_empty(&self.service_id, "Service")?;
        require_non_empty(&self.name, "Name")?;
        require_email(&self.email)?;
        require_non_empty(&self.phone, "Phone number")?;

        let date = self.date.ok_or(AppError::Validation("Date is required".into()))?;
        let time = self.time.ok_or(AppError::Validation("Start time is required".into()))?;
        let meeting_type = self.meeting_type
            .ok_or(AppError::Validation("Meeting type is required".into()))?;

        if !self.privacy_consent {
            return Err(AppError::Validation("The privacy policy must be accepted".into()));
        }

        let notes = self.notes.as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(ValidatedAppointment {
            service_id: self.service_id.trim().to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            date,
            time,
            meeting_type,
            notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> AppointmentForm {
        AppointmentForm {
            service_id: "svc-consult".into(),
            name: " Kovács Anna ".into(),
            email: "anna@example.hu".into(),
            phone: "+36 30 123 4567".into(),
            date: NaiveDate::from_ymd_opt(2026, 11, 9),
            time: "09:00".parse().ok(),
            meeting_type: Some(MeetingType::InPerson),
            notes: Some("   ".into()),
            privacy_consent: true,
        }
    }

    #[test]
    fn test_complete_form_validates_and_trims() {
        let v = complete_form().validate().unwrap();
        assert_eq!(v.name, "Kovács Anna");
        assert_eq!(v.time.to_string(), "09:00");
        assert!(v.notes.is_none(), "Blank notes should be dropped");
    }

    #[test]
    fn test_missing_required_fields() {
        let cases: Vec<(&str, AppointmentForm)> = vec![
            ("service", AppointmentForm { service_id: String::new(), ..complete_form() }),
            ("name", AppointmentForm { name: " ".into(), ..complete_form() }),
            ("email", AppointmentForm { email: "nope".into(), ..complete_form() }),
            ("date", AppointmentForm { date: None, ..complete_form() }),
            ("meeting type", AppointmentForm { meeting_type: None, ..complete_form() }),
            ("consent", AppointmentForm { privacy_consent: false, ..complete_form() }),
        ];

        for (label, form) in cases {
            assert!(
                matches!(form.validate(), Err(AppError::Validation(_))),
                "Form missing {} should fail validation", label
            );
        }
    }

    #[test]
    fn test_form_deserializes_with_missing_fields() {
        let form: AppointmentForm = serde_json::from_str(r#"{"name": "Anna"}"#).unwrap();
        assert_eq!(form.name, "Anna");
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_new_appointment_is_pending() {
        let appt = AppointmentRequest::new(NewAppointmentParams {
            client_name: "Anna".into(),
            email: "anna@example.hu".into(),
            phone: "123".into(),
            service_id: "svc".into(),
            preferred_date: Utc::now(),
            meeting_type: MeetingType::Online,
            notes: None,
        });
        assert_eq!(appt.status, AppointmentStatus::Pending);
    }
}
