use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{appointment, availability, feedback, health, service};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Availability
        .route("/api/v1/availability", get(availability::get_availability))
        .route("/api/v1/slots/{date}", get(availability::get_slots_for_date))
        .route("/api/v1/slots/{date}/valid", get(availability::get_valid_slots))
        .route("/api/v1/services", get(service::list_services))

        // Submissions
        .route("/api/v1/appointments", post(appointment::create_appointment))
        .route("/api/v1/contact", post(feedback::submit_contact))

        // Reviews
        .route("/api/v1/reviews", get(feedback::list_reviews).post(feedback::submit_review))
        .route("/api/v1/reviews/summary", get(feedback::rating_summary))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
