use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::domain::models::{contact::ContactForm, review::ReviewForm, submission::SubmissionOutcome};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ContactForm>,
) -> Result<impl IntoResponse, AppError> {
    let message = state.feedback_service.submit_contact_message(form).await?;

    Ok((StatusCode::CREATED, Json(SubmissionOutcome::accepted(
        "Thank you for your message! We will get back to you soon.",
        message.id,
    ))))
}

pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.feedback_service.approved_reviews().await?))
}

pub async fn rating_summary(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.feedback_service.rating_summary().await?))
}

pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ReviewForm>,
) -> Result<impl IntoResponse, AppError> {
    let review = state.feedback_service.submit_review(form).await?;

    Ok((StatusCode::CREATED, Json(SubmissionOutcome::accepted(
        "Thank you for your review! It will appear after moderation.",
        review.id,
    ))))
}
