use std::sync::Arc;
use crate::config::Config;
use crate::domain::{
    models::{
        appointment::{AppointmentForm, AppointmentRequest, NewAppointmentParams},
        service::ServiceOffering,
        slot::{DaySlots, TimeMarker},
    },
    ports::{AppointmentRepository, ServiceRepository, SlotRepository},
};
use crate::domain::services::availability::{combine_in_zone, filter_valid_slots, parse_markers};
use crate::error::AppError;
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

pub const REQUEST_RECEIVED: &str =
    "Thank you! Your booking request has been received. We will contact you shortly to confirm the appointment.";

pub struct AppointmentService {
    slot_repo: Arc<dyn SlotRepository>,
    service_repo: Arc<dyn ServiceRepository>,
    appointment_repo: Arc<dyn AppointmentRepository>,
    config: Config,
}

impl AppointmentService {
    pub fn new(
        slot_repo: Arc<dyn SlotRepository>,
        service_repo: Arc<dyn ServiceRepository>,
        appointment_repo: Arc<dyn AppointmentRepository>,
        config: Config,
    ) -> Self {
        Self { slot_repo, service_repo, appointment_repo, config }
    }

    /// Cleaned start markers of one day. A day without a record is `NotFound`.
    pub async fn day_slots(&self, date: NaiveDate) -> Result<DaySlots, AppError> {
        let record = self.slot_repo.find_by_date(date).await?
            .ok_or(AppError::NotFound(format!("No availability published for {}", date)))?;

        Ok(DaySlots {
            date,
            available_start_markers: parse_markers(&record.raw_times(), self.config.slot_granularity_min),
        })
    }

    pub async fn active_service(&self, service_id: &str) -> Result<ServiceOffering, AppError> {
        self.service_repo.find_by_id(service_id).await?
            .filter(|s| s.is_active)
            .ok_or(AppError::NotFound(format!("Service {} not found", service_id)))
    }

    pub async fn valid_start_times(&self, date: NaiveDate, duration_min: i32) -> Result<Vec<TimeMarker>, AppError> {
        let day = self.day_slots(date).await?;
        filter_valid_slots(&day.available_start_markers, duration_min, self.config.slot_granularity_min)
    }

    pub async fn create_appointment(&self, form: &AppointmentForm) -> Result<AppointmentRequest, AppError> {
        let valid = form.validate()?;
        self.config.require_write_token()?;

        let preferred_date = combine_in_zone(valid.date, valid.time, self.config.practice_timezone)?;
        if preferred_date <= Utc::now() {
            warn!("Rejected appointment at {} {}: already past", valid.date, valid.time);
            return Err(AppError::Validation("The selected time is in the past".into()));
        }

        let service = self.active_service(&valid.service_id).await?;
        if !service.supports(valid.meeting_type) {
            return Err(AppError::Validation(format!(
                "{} is not offered {}", service.title, valid.meeting_type
            )));
        }

        let record = self.slot_repo.find_by_date(valid.date).await?
            .ok_or(AppError::Conflict(format!("There are no openings on {}", valid.date)))?;
        if record.is_fully_booked {
            return Err(AppError::Conflict(format!("{} is fully booked", valid.date)));
        }

        let markers = parse_markers(&record.raw_times(), self.config.slot_granularity_min);
        let starts = filter_valid_slots(&markers, service.duration_min, self.config.slot_granularity_min)?;
        if !starts.contains(&valid.time) {
            warn!("Rejected appointment at {} {}: no longer available", valid.date, valid.time);
            return Err(AppError::Conflict(format!(
                "{} on {} is no longer available", valid.time, valid.date
            )));
        }

        let appointment = AppointmentRequest::new(NewAppointmentParams {
            client_name: valid.name,
            email: valid.email,
            phone: valid.phone,
            service_id: service.id,
            preferred_date,
            meeting_type: valid.meeting_type,
            notes: valid.notes,
        });

        let created = self.appointment_repo.create(&appointment).await?;
        info!("Appointment request {} created for {}", created.id, created.preferred_date);
        Ok(created)
    }
}
