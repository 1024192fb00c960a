use chrono::NaiveDate;
use serde::Serialize;
use crate::domain::models::slot::TimeMarker;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ValidSlotsResponse {
    pub date: NaiveDate,
    pub duration_min: i32,
    pub valid_start_times: Vec<TimeMarker>,
}
