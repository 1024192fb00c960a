use crate::domain::models::{service::MeetingType, slot::TimeMarker};
use crate::domain::ports::BookingGateway;
use crate::domain::services::wizard::{BookingWizard, ContactDetails, WizardSettings, WizardView};
use crate::error::AppError;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, instrument};

/// Drives a `BookingWizard` against a gateway. Fetch failures end up in the
/// wizard's error message; only actions the current step rejects return `Err`.
pub struct BookingFlow {
    gateway: Arc<dyn BookingGateway>,
    wizard: BookingWizard,
}

impl BookingFlow {
    /// Loads the current month and the service catalogue. A failed fetch of
    /// either is shown in the wizard; `reload_services` retries the catalogue.
    pub async fn start(
        gateway: Arc<dyn BookingGateway>,
        preselected_service_id: Option<&str>,
        settings: WizardSettings,
    ) -> Result<Self, AppError> {
        let mut flow = Self {
            gateway,
            wizard: BookingWizard::awaiting_services(preselected_service_id, settings),
        };

        let ticket = flow.wizard.open()?;
        let result = flow.gateway.get_availability(ticket.start, ticket.end).await;
        flow.wizard.complete_month_fetch(ticket.token, result);

        flow.reload_services().await;
        info!("Starting booking flow with {} services", flow.wizard.services().len());

        Ok(flow)
    }

    #[instrument(skip(self))]
    pub async fn reload_services(&mut self) {
        let token = self.wizard.request_services();
        let result = self.gateway.list_services().await;
        self.wizard.complete_services_fetch(token, result);
    }

    pub fn wizard(&self) -> &BookingWizard {
        &self.wizard
    }

    pub fn view(&self) -> WizardView {
        self.wizard.view()
    }

    #[instrument(skip(self))]
    pub async fn show_month(&mut self, year: i32, month: u32) -> Result<(), AppError> {
        let ticket = self.wizard.change_month(year, month)?;
        let result = self.gateway.get_availability(ticket.start, ticket.end).await;
        self.wizard.complete_month_fetch(ticket.token, result);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn pick_day(&mut self, date: NaiveDate) -> Result<(), AppError> {
        let ticket = self.wizard.select_date(date)?;
        let result = self.gateway.get_slots_for_date(ticket.date).await;
        self.wizard.complete_day_fetch(ticket.token, result);
        Ok(())
    }

    pub fn pick_service(&mut self, service_id: &str) -> Result<(), AppError> {
        self.wizard.select_service(service_id)
    }

    pub fn pick_meeting_type(&mut self, meeting_type: MeetingType) -> Result<(), AppError> {
        self.wizard.select_meeting_type(meeting_type)
    }

    pub fn pick_slot(&mut self, slot: TimeMarker) -> Result<(), AppError> {
        self.wizard.select_slot(slot)
    }

    pub fn back(&mut self) -> bool {
        self.wizard.go_back()
    }

    pub fn choose_another_day(&mut self) {
        self.wizard.choose_another_day()
    }

    #[instrument(skip_all)]
    pub async fn submit(&mut self, contact: ContactDetails) -> Result<(), AppError> {
        let ticket = self.wizard.begin_submission(contact)?;
        let result = self.gateway.create_appointment(&ticket.form).await;
        self.wizard.complete_submission(ticket.token, result);
        Ok(())
    }
}
