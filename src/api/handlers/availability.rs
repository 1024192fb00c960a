use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::api::dtos::{
    requests::{parse_date, AvailabilityQuery, ValidSlotsQuery},
    responses::ValidSlotsResponse,
};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

const MAX_RANGE_DAYS: i64 = 62;

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let start = parse_date(params.start.as_deref().ok_or(AppError::Validation("start is required".into()))?)?;
    let end = parse_date(params.end.as_deref().ok_or(AppError::Validation("end is required".into()))?)?;

    if end < start {
        return Err(AppError::Validation("end must not be before start".into()));
    }
    if (end - start).num_days() > MAX_RANGE_DAYS {
        return Err(AppError::Validation(format!("Range is limited to {} days", MAX_RANGE_DAYS)));
    }

    let days = state.slot_repo.list_by_range(start, end).await?;
    Ok(Json(days))
}

pub async fn get_slots_for_date(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&date)?;
    let day = state.appointment_service.day_slots(date).await?;
    Ok(Json(day))
}

/// Start times on `date` that fit a service (`service_id`) or a raw `duration`.
pub async fn get_valid_slots(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
    Query(params): Query<ValidSlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&date)?;

    let duration_min = match (params.service_id.as_deref(), params.duration) {
        (Some(id), _) => state.appointment_service.active_service(id).await?.duration_min,
        (None, Some(duration)) => duration,
        (None, None) => return Err(AppError::Validation("service_id or duration is required".into())),
    };

    let valid_start_times = state.appointment_service.valid_start_times(date, duration_min).await?;
    info!("{} valid start times on {} for {} minutes", valid_start_times.len(), date, duration_min);

    Ok(Json(ValidSlotsResponse { date, duration_min, valid_start_times }))
}
