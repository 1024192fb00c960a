use crate::domain::models::{
    appointment::AppointmentForm,
    service::{MeetingType, ServiceOffering},
    slot::{DayAvailability, DaySlots, TimeMarker},
    submission::SubmissionOutcome,
};
use crate::domain::services::availability::{filter_valid_slots, month_bounds};
use crate::error::AppError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Calendar,
    Service,
    Mode,
    Slots,
    Form,
}

impl WizardStep {
    pub const SEQUENCE: [WizardStep; 5] = [
        WizardStep::Calendar,
        WizardStep::Service,
        WizardStep::Mode,
        WizardStep::Slots,
        WizardStep::Form,
    ];

    pub fn previous(self) -> Option<WizardStep> {
        match self {
            WizardStep::Calendar => None,
            WizardStep::Service => Some(WizardStep::Calendar),
            WizardStep::Mode => Some(WizardStep::Service),
            WizardStep::Slots => Some(WizardStep::Mode),
            WizardStep::Form => Some(WizardStep::Slots),
        }
    }
}

/// Identifies one outstanding fetch. Only the latest token of each concern is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Copy)]
pub struct MonthTicket {
    pub token: RequestToken,
    pub year: i32,
    pub month: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy)]
pub struct DayTicket {
    pub token: RequestToken,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub token: RequestToken,
    pub form: AppointmentForm,
}

#[derive(Debug, Clone, Copy)]
pub struct WizardSettings {
    pub granularity_min: i32,
    pub today: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: Option<String>,
    pub privacy_consent: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingSelectionState {
    pub current_step: WizardStep,
    pub displayed_month: (i32, u32),
    pub selected_date: Option<NaiveDate>,
    pub selected_service_id: Option<String>,
    pub meeting_type: Option<MeetingType>,
    pub selected_slot: Option<TimeMarker>,
    pub available_days_in_month: BTreeSet<NaiveDate>,
    pub raw_slots_for_selected_date: Vec<TimeMarker>,
    pub valid_slots_for_selected_date: Vec<TimeMarker>,
    pub error_message: Option<String>,
    pub confirmation: Option<SubmissionOutcome>,
}

/// Snapshot handed to the presentation layer after every event.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub current_step: WizardStep,
    pub valid_slots: Vec<TimeMarker>,
    pub error_message: Option<String>,
    pub is_loading: bool,
    pub no_capacity: bool,
    pub confirmation: Option<String>,
}

pub struct BookingWizard {
    settings: WizardSettings,
    services: Vec<ServiceOffering>,
    preselected_service_id: Option<String>,
    services_error: Option<String>,
    state: BookingSelectionState,
    next_token: u64,
    pending_services: Option<RequestToken>,
    pending_month: Option<(RequestToken, NaiveDate, NaiveDate)>,
    pending_day: Option<DayTicket>,
    pending_submit: Option<RequestToken>,
}

impl BookingWizard {
    pub fn new(
        services: Vec<ServiceOffering>,
        preselected_service_id: Option<&str>,
        settings: WizardSettings,
    ) -> Self {
        let mut wizard = Self::awaiting_services(preselected_service_id, settings);
        wizard.apply_services(services);
        wizard
    }

    /// A wizard whose service catalogue is still to be fetched with `request_services`.
    pub fn awaiting_services(preselected_service_id: Option<&str>, settings: WizardSettings) -> Self {
        Self {
            settings,
            services: Vec::new(),
            preselected_service_id: preselected_service_id.map(str::to_string),
            services_error: None,
            state: BookingSelectionState {
                current_step: WizardStep::Calendar,
                displayed_month: (settings.today.year(), settings.today.month()),
                selected_date: None,
                selected_service_id: None,
                meeting_type: None,
                selected_slot: None,
                available_days_in_month: BTreeSet::new(),
                raw_slots_for_selected_date: Vec::new(),
                valid_slots_for_selected_date: Vec::new(),
                error_message: None,
                confirmation: None,
            },
            next_token: 0,
            pending_services: None,
            pending_month: None,
            pending_day: None,
            pending_submit: None,
        }
    }

    fn apply_services(&mut self, services: Vec<ServiceOffering>) {
        self.services = services.into_iter()
            .filter(|s| match s.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!("Skipping service {}: {}", s.id, e);
                    false
                }
            })
            .collect();

        if let Some(id) = self.preselected_service_id.take() {
            if self.services.iter().any(|s| s.id == id) {
                self.state.selected_service_id = Some(id);
            } else {
                warn!("Ignoring unknown preselected service {}", id);
            }
        }

        if let Some(id) = self.state.selected_service_id.clone()
            && !self.services.iter().any(|s| s.id == id) {
            warn!("Selected service {} is no longer offered", id);
            self.state.selected_service_id = None;
            self.state.selected_slot = None;
        }
        self.recompute_valid_slots();
    }

    pub fn state(&self) -> &BookingSelectionState {
        &self.state
    }

    pub fn services(&self) -> &[ServiceOffering] {
        &self.services
    }

    pub fn current_step(&self) -> WizardStep {
        self.state.current_step
    }

    pub fn valid_slots(&self) -> &[TimeMarker] {
        &self.state.valid_slots_for_selected_date
    }

    pub fn error_message(&self) -> Option<&str> {
        self.state.error_message.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_services.is_some()
            || self.pending_month.is_some()
            || self.pending_day.is_some()
            || self.pending_submit.is_some()
    }

    /// The chosen day has openings, but none long enough for the chosen service.
    pub fn has_no_capacity(&self) -> bool {
        self.state.current_step == WizardStep::Slots && self.state.valid_slots_for_selected_date.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.state.confirmation.as_ref().is_some_and(|c| c.success)
    }

    pub fn selected_service(&self) -> Option<&ServiceOffering> {
        let id = self.state.selected_service_id.as_deref()?;
        self.services.iter().find(|s| s.id == id)
    }

    pub fn view(&self) -> WizardView {
        WizardView {
            current_step: self.state.current_step,
            valid_slots: self.state.valid_slots_for_selected_date.clone(),
            error_message: self.state.error_message.clone(),
            is_loading: self.is_loading(),
            no_capacity: self.has_no_capacity(),
            confirmation: self.state.confirmation.as_ref().map(|c| c.message.clone()),
        }
    }

    fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        RequestToken(self.next_token)
    }

    fn require_step(&self, expected: WizardStep) -> Result<(), AppError> {
        if self.state.current_step != expected {
            return Err(AppError::Validation(format!(
                "This action belongs to the {:?} step, the wizard is at {:?}",
                expected, self.state.current_step
            )));
        }
        Ok(())
    }

    fn recompute_valid_slots(&mut self) {
        let duration = self.selected_service().map(|s| s.duration_min);

        self.state.valid_slots_for_selected_date = match duration {
            Some(duration) => {
                match filter_valid_slots(&self.state.raw_slots_for_selected_date, duration, self.settings.granularity_min) {
                    Ok(valid) => valid,
                    Err(e) => {
                        self.state.error_message = Some(e.public_message());
                        Vec::new()
                    }
                }
            }
            None => Vec::new(),
        };

        if let Some(slot) = self.state.selected_slot
            && !self.state.valid_slots_for_selected_date.contains(&slot) {
            debug!("Selected slot {} no longer fits, clearing it", slot);
            self.state.selected_slot = None;
        }
    }

    /// Starts (or retries) loading the service catalogue.
    pub fn request_services(&mut self) -> RequestToken {
        let token = self.issue_token();
        self.pending_services = Some(token);
        token
    }

    pub fn complete_services_fetch(
        &mut self,
        token: RequestToken,
        result: Result<Vec<ServiceOffering>, AppError>,
    ) -> bool {
        if self.pending_services != Some(token) {
            debug!("Discarding stale service catalogue response {:?}", token);
            return false;
        }
        self.pending_services = None;

        match result {
            Ok(services) => {
                self.apply_services(services);
                // Only a catalogue error is cleared; a month or day error stays visible.
                if let Some(previous) = self.services_error.take()
                    && self.state.error_message.as_deref() == Some(previous.as_str()) {
                    self.state.error_message = None;
                }
                info!("Loaded {} services", self.services.len());
            }
            Err(e) => {
                warn!("Failed to load services: {}", e);
                let message = e.public_message();
                self.services_error = Some(message.clone());
                self.state.error_message = Some(message);
            }
        }
        true
    }

    /// Starts loading the month containing today.
    pub fn open(&mut self) -> Result<MonthTicket, AppError> {
        let today = self.settings.today;
        self.change_month(today.year(), today.month())
    }

    /// Switches the calendar to another month. Days of the previous month are
    /// dropped immediately and any response still in flight for it is ignored.
    pub fn change_month(&mut self, year: i32, month: u32) -> Result<MonthTicket, AppError> {
        let (start, end) = month_bounds(year, month)?;
        let token = self.issue_token();

        self.state.displayed_month = (year, month);
        self.state.available_days_in_month.clear();
        self.state.error_message = None;
        self.pending_month = Some((token, start, end));
        if let Some(day) = self.pending_day.take() {
            debug!("Dropping outstanding slots request for {}", day.date);
        }

        debug!("Requesting availability for {}-{:02}", year, month);
        Ok(MonthTicket { token, year, month, start, end })
    }

    /// Applies a month availability response. Returns false when the response was stale.
    pub fn complete_month_fetch(
        &mut self,
        token: RequestToken,
        result: Result<Vec<DayAvailability>, AppError>,
    ) -> bool {
        let Some((expected, start, end)) = self.pending_month else {
            debug!("Discarding month availability with no request outstanding");
            return false;
        };
        if expected != token {
            debug!("Discarding stale month availability response {:?}", token);
            return false;
        }
        self.pending_month = None;

        match result {
            Ok(days) => {
                let today = self.settings.today;
                self.state.available_days_in_month = days.into_iter()
                    .filter(|d| !d.is_fully_booked && d.date >= start && d.date <= end && d.date >= today)
                    .map(|d| d.date)
                    .collect();
                info!(
                    "Month {}-{:02} has {} bookable days",
                    self.state.displayed_month.0, self.state.displayed_month.1,
                    self.state.available_days_in_month.len()
                );
            }
            Err(e) => {
                warn!("Failed to load month availability: {}", e);
                self.state.error_message = Some(e.public_message());
            }
        }
        true
    }

    /// Picks a day. The wizard stays on the calendar until the day's markers arrive.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<DayTicket, AppError> {
        self.require_step(WizardStep::Calendar)?;

        if !self.state.available_days_in_month.contains(&date) {
            return Err(AppError::Validation(format!("There are no openings on {}", date)));
        }

        let ticket = DayTicket { token: self.issue_token(), date };
        self.pending_day = Some(ticket);
        self.state.error_message = None;

        debug!("Requesting slots for {}", date);
        Ok(ticket)
    }

    pub fn complete_day_fetch(&mut self, token: RequestToken, result: Result<DaySlots, AppError>) -> bool {
        let Some(pending) = self.pending_day else {
            debug!("Discarding day slots with no request outstanding");
            return false;
        };
        if pending.token != token {
            debug!("Discarding stale day slots response {:?}", token);
            return false;
        }
        self.pending_day = None;

        match result {
            Ok(day) if day.date != pending.date => {
                warn!("Slots response for {} does not match requested {}", day.date, pending.date);
                self.state.error_message = Some("Could not load the openings for this day".to_string());
            }
            Ok(day) => {
                let mut markers = day.available_start_markers;
                markers.sort();
                markers.dedup();

                if self.state.selected_date != Some(pending.date) {
                    self.state.selected_slot = None;
                }
                self.state.selected_date = Some(pending.date);
                self.state.raw_slots_for_selected_date = markers;
                self.recompute_valid_slots();

                self.state.current_step = if self.selected_service().is_some() {
                    WizardStep::Mode
                } else {
                    WizardStep::Service
                };
                info!("Day {} selected, moving to {:?}", pending.date, self.state.current_step);
            }
            Err(e) => {
                warn!("Failed to load slots for {}: {}", pending.date, e);
                self.state.error_message = Some(e.public_message());
            }
        }
        true
    }

    /// Chooses or changes the service. Changing it at or after the slot step
    /// invalidates the chosen start time and returns to the slot list.
    pub fn select_service(&mut self, service_id: &str) -> Result<(), AppError> {
        if !self.services.iter().any(|s| s.id == service_id) {
            return Err(AppError::NotFound(format!("Service {} not found", service_id)));
        }

        let changed = self.state.selected_service_id.as_deref() != Some(service_id);
        self.state.selected_service_id = Some(service_id.to_string());
        self.state.error_message = None;

        if changed {
            self.state.selected_slot = None;
            if let Some(mt) = self.state.meeting_type
                && self.selected_service().is_some_and(|s| !s.supports(mt)) {
                self.state.meeting_type = None;
            }
        }
        self.recompute_valid_slots();

        self.state.current_step = match self.state.current_step {
            WizardStep::Service => WizardStep::Mode,
            WizardStep::Slots | WizardStep::Form if changed && self.state.meeting_type.is_some() => WizardStep::Slots,
            WizardStep::Slots | WizardStep::Form if changed => WizardStep::Mode,
            step => step,
        };

        info!("Service {} selected, wizard at {:?}", service_id, self.state.current_step);
        Ok(())
    }

    pub fn select_meeting_type(&mut self, meeting_type: MeetingType) -> Result<(), AppError> {
        self.require_step(WizardStep::Mode)?;

        let service = self.selected_service()
            .ok_or(AppError::Validation("Choose a service first".into()))?;
        if !service.supports(meeting_type) {
            return Err(AppError::Validation(format!(
                "{} is not offered {}", service.title, meeting_type
            )));
        }

        self.state.meeting_type = Some(meeting_type);
        self.state.error_message = None;
        self.state.current_step = WizardStep::Slots;
        self.recompute_valid_slots();

        if self.has_no_capacity() {
            info!("No sufficiently long opening on {:?}", self.state.selected_date);
        }
        Ok(())
    }

    pub fn select_slot(&mut self, slot: TimeMarker) -> Result<(), AppError> {
        self.require_step(WizardStep::Slots)?;

        if !self.state.valid_slots_for_selected_date.contains(&slot) {
            return Err(AppError::Validation(format!("{} is not an available start time", slot)));
        }

        self.state.selected_slot = Some(slot);
        self.state.error_message = None;
        self.state.current_step = WizardStep::Form;
        Ok(())
    }

    /// Steps back through the fixed sequence. Returns false on the first step.
    pub fn go_back(&mut self) -> bool {
        match self.state.current_step.previous() {
            Some(previous) => {
                self.state.current_step = previous;
                self.state.error_message = None;
                true
            }
            None => false,
        }
    }

    /// Path out of the slot step when a day has no suitable opening.
    pub fn choose_another_day(&mut self) {
        self.state.current_step = WizardStep::Calendar;
        self.state.selected_slot = None;
        self.state.error_message = None;
    }

    /// Validates the collected form. On failure the error is shown inline and nothing is sent.
    pub fn begin_submission(&mut self, contact: ContactDetails) -> Result<SubmitTicket, AppError> {
        self.require_step(WizardStep::Form)?;

        if self.pending_submit.is_some() {
            return Err(AppError::Conflict("A submission is already in progress".into()));
        }
        if self.is_complete() {
            return Err(AppError::Conflict("This booking request was already sent".into()));
        }

        let form = AppointmentForm {
            service_id: self.state.selected_service_id.clone().unwrap_or_default(),
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            date: self.state.selected_date,
            time: self.state.selected_slot,
            meeting_type: self.state.meeting_type,
            notes: contact.notes,
            privacy_consent: contact.privacy_consent,
        };

        if let Err(e) = form.validate() {
            self.state.error_message = Some(e.public_message());
            return Err(e);
        }

        let token = self.issue_token();
        self.pending_submit = Some(token);
        self.state.error_message = None;
        Ok(SubmitTicket { token, form })
    }

    pub fn complete_submission(&mut self, token: RequestToken, result: Result<SubmissionOutcome, AppError>) -> bool {
        if self.pending_submit != Some(token) {
            debug!("Discarding stale submission response {:?}", token);
            return false;
        }
        self.pending_submit = None;

        match result {
            Ok(outcome) if outcome.success => {
                info!("Booking request accepted: {:?}", outcome.reference_id);
                self.state.error_message = None;
                self.state.confirmation = Some(outcome);
            }
            Ok(outcome) => {
                warn!("Booking request rejected: {}", outcome.message);
                self.state.error_message = Some(if outcome.message.is_empty() {
                    "The booking request could not be sent. Please try again.".to_string()
                } else {
                    outcome.message
                });
            }
            Err(e) => {
                warn!("Booking request failed: {}", e);
                self.state.error_message = Some(e.public_message());
            }
        }
        true
    }
}
