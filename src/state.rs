use std::sync::Arc;
use crate::domain::ports::{
    AppointmentRepository, ContactMessageRepository, ReviewRepository, ServiceRepository,
    SlotRepository,
};
use crate::domain::services::{
    appointment_service::AppointmentService, feedback_service::FeedbackService,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub slot_repo: Arc<dyn SlotRepository>,
    pub service_repo: Arc<dyn ServiceRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub contact_repo: Arc<dyn ContactMessageRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
    pub appointment_service: Arc<AppointmentService>,
    pub feedback_service: Arc<FeedbackService>,
}
