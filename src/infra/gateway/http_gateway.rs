use crate::domain::models::{
    appointment::AppointmentForm,
    service::ServiceOffering,
    slot::{DayAvailability, DaySlots},
    submission::SubmissionOutcome,
};
use crate::domain::ports::BookingGateway;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{error, warn};

/// Booking gateway that talks to a remote instance of this service's HTTP API.
pub struct HttpBookingGateway {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpBookingGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, AppError> {
        let status = res.status();

        if status.is_success() {
            return res.json::<T>().await.map_err(|e| {
                error!("Malformed response from booking API: {}", e);
                AppError::Upstream("The booking service sent an unreadable response".into())
            });
        }

        let text = res.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.error)
            .unwrap_or_else(|_| format!("Booking service failed with status {}", status));
        warn!("Booking API returned {}: {}", status, message);

        if status == StatusCode::NOT_FOUND {
            Err(AppError::NotFound(message))
        } else {
            Err(AppError::Upstream(message))
        }
    }

    fn connection_error(e: reqwest::Error) -> AppError {
        error!("Booking API connection error: {}", e);
        AppError::Upstream("The booking service is unreachable".into())
    }
}

#[async_trait]
impl BookingGateway for HttpBookingGateway {
    async fn get_availability(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayAvailability>, AppError> {
        let res = self.client.get(self.url("/api/v1/availability"))
            .query(&[("start", start.to_string()), ("end", end.to_string())])
            .send()
            .await
            .map_err(Self::connection_error)?;
        Self::decode(res).await
    }

    async fn get_slots_for_date(&self, date: NaiveDate) -> Result<DaySlots, AppError> {
        let res = self.client.get(self.url(&format!("/api/v1/slots/{}", date)))
            .send()
            .await
            .map_err(Self::connection_error)?;
        Self::decode(res).await
    }

    async fn list_services(&self) -> Result<Vec<ServiceOffering>, AppError> {
        let res = self.client.get(self.url("/api/v1/services"))
            .send()
            .await
            .map_err(Self::connection_error)?;
        Self::decode(res).await
    }

    async fn create_appointment(&self, form: &AppointmentForm) -> Result<SubmissionOutcome, AppError> {
        let res = self.client.post(self.url("/api/v1/appointments"))
            .json(form)
            .send()
            .await
            .map_err(Self::connection_error)?;
        Self::decode(res).await
    }
}
