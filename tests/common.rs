#![allow(dead_code)]

use practice_booking::{
    api::router::create_router,
    config::Config,
    domain::models::{service::{MeetingType, ServiceOffering}, slot::DaySlotRecord},
    domain::ports::{ServiceRepository, SlotRepository},
    infra::factory::{build_state, run_sqlite_migrations},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use chrono::NaiveDate;
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::Value;

pub const WRITE_TOKEN: &str = "test-write-token";

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_write_token(Some(WRITE_TOKEN)).await
    }

    pub async fn with_write_token(token: Option<&str>) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            store_write_token: token.map(str::to_string),
            practice_timezone: chrono_tz::Europe::Budapest,
            slot_granularity_min: 30,
        };

        let state = Arc::new(build_state(pool.clone(), config));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn seed_day(&self, date: NaiveDate, times: &[&str], is_fully_booked: bool) {
        self.state.slot_repo
            .upsert(&DaySlotRecord::new(date, times, is_fully_booked))
            .await
            .expect("Failed to seed day");
    }

    pub async fn seed_service(&self, service: ServiceOffering) {
        self.state.service_repo.upsert(&service).await.expect("Failed to seed service");
    }

    /// A 90 minute first consultation offered both ways, a 30 minute
    /// online-only follow-up and an inactive package.
    pub async fn seed_catalogue(&self) {
        let mut first = ServiceOffering::new("svc-first", "First consultation", 90, 25000, 1);
        first.price_display = Some("25 000 Ft".into());
        self.seed_service(first).await;

        let mut follow_up = ServiceOffering::new("svc-online", "Online follow-up", 30, 9000, 2);
        follow_up.meeting_type = Some(MeetingType::Online);
        self.seed_service(follow_up).await;

        let mut retired = ServiceOffering::new("svc-retired", "Retired package", 60, 15000, 0);
        retired.is_active = false;
        self.seed_service(retired).await;
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        ).await.unwrap();

        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn post_json(&self, uri: &str, payload: Value) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn count_rows(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
