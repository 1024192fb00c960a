use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::domain::models::{appointment::AppointmentForm, submission::SubmissionOutcome};
use crate::domain::services::appointment_service::REQUEST_RECEIVED;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(form): Json<AppointmentForm>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_appointment: service {} on {:?}", form.service_id, form.date);

    let created = state.appointment_service.create_appointment(&form).await?;

    Ok((StatusCode::CREATED, Json(SubmissionOutcome::accepted(REQUEST_RECEIVED, created.id))))
}
