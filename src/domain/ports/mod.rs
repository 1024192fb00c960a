use crate::domain::models::{
    appointment::{AppointmentForm, AppointmentRequest},
    contact::ContactMessage,
    review::{RatingSummary, Review},
    service::ServiceOffering,
    slot::{DayAvailability, DaySlotRecord, DaySlots},
    submission::SubmissionOutcome,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait SlotRepository: Send + Sync {
    async fn upsert(&self, record: &DaySlotRecord) -> Result<DaySlotRecord, AppError>;
    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<DaySlotRecord>, AppError>;
    async fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayAvailability>, AppError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn upsert(&self, service: &ServiceOffering) -> Result<ServiceOffering, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ServiceOffering>, AppError>;
    async fn list_active(&self) -> Result<Vec<ServiceOffering>, AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &AppointmentRequest) -> Result<AppointmentRequest, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<AppointmentRequest>, AppError>;
}

#[async_trait]
pub trait ContactMessageRepository: Send + Sync {
    async fn create(&self, message: &ContactMessage) -> Result<ContactMessage, AppError>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: &Review) -> Result<Review, AppError>;
    async fn list_approved(&self) -> Result<Vec<Review>, AppError>;
    async fn rating_summary(&self) -> Result<RatingSummary, AppError>;
}

/// Everything the booking wizard needs from the outside world.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    async fn get_availability(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayAvailability>, AppError>;
    async fn get_slots_for_date(&self, date: NaiveDate) -> Result<DaySlots, AppError>;
    async fn list_services(&self) -> Result<Vec<ServiceOffering>, AppError>;
    async fn create_appointment(&self, form: &AppointmentForm) -> Result<SubmissionOutcome, AppError>;
}
