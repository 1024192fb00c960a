use std::sync::Arc;
use crate::domain::models::{
    appointment::AppointmentForm,
    service::ServiceOffering,
    slot::{DayAvailability, DaySlots},
    submission::SubmissionOutcome,
};
use crate::domain::ports::BookingGateway;
use crate::domain::services::appointment_service::REQUEST_RECEIVED;
use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::warn;

/// In-process gateway reading and writing the store directly.
pub struct StoreGateway {
    state: Arc<AppState>,
}

impl StoreGateway {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl BookingGateway for StoreGateway {
    async fn get_availability(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayAvailability>, AppError> {
        self.state.slot_repo.list_by_range(start, end).await
    }

    async fn get_slots_for_date(&self, date: NaiveDate) -> Result<DaySlots, AppError> {
        self.state.appointment_service.day_slots(date).await
    }

    async fn list_services(&self) -> Result<Vec<ServiceOffering>, AppError> {
        self.state.service_repo.list_active().await
    }

    async fn create_appointment(&self, form: &AppointmentForm) -> Result<SubmissionOutcome, AppError> {
        match self.state.appointment_service.create_appointment(form).await {
            Ok(created) => Ok(SubmissionOutcome::accepted(REQUEST_RECEIVED, created.id)),
            Err(e) => {
                warn!("Appointment submission failed: {}", e);
                Ok(SubmissionOutcome::rejected(e.public_message()))
            }
        }
    }
}
