use crate::error::AppError;
use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_DAY: u32 = 1440;

/// A time-of-day at minute precision at which a session could start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeMarker(NaiveTime);

impl TimeMarker {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn from_minutes(minute_of_day: u32) -> Option<Self> {
        if minute_of_day >= MINUTES_PER_DAY {
            return None;
        }
        Self::from_hm(minute_of_day / 60, minute_of_day % 60)
    }

    pub fn minute_of_day(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    pub fn is_aligned(&self, granularity_min: i32) -> bool {
        granularity_min > 0 && self.minute_of_day() % granularity_min as u32 == 0
    }
}

impl FromStr for TimeMarker {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| AppError::Validation(format!("Invalid time marker '{}' (expected HH:MM)", s)))
    }
}

impl fmt::Display for TimeMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for TimeMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeMarker {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One calendar day's bookable configuration as maintained by the administrator.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct DaySlotRecord {
    pub date: NaiveDate,
    pub available_times: String, // JSON array of "HH:MM" strings
    pub is_fully_booked: bool,
    pub updated_at: DateTime<Utc>,
}

impl DaySlotRecord {
    pub fn new(date: NaiveDate, times: &[&str], is_fully_booked: bool) -> Self {
        let times: Vec<&str> = times.to_vec();
        Self {
            date,
            available_times: serde_json::to_string(&times).unwrap_or_else(|_| "[]".to_string()),
            is_fully_booked,
            updated_at: Utc::now(),
        }
    }

    /// Stored marker strings, unvalidated and in storage order.
    pub fn raw_times(&self) -> Vec<String> {
        serde_json::from_str(&self.available_times).unwrap_or_default()
    }
}

/// Month-view projection of a `DaySlotRecord`.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub is_fully_booked: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DaySlots {
    pub date: NaiveDate,
    pub available_start_markers: Vec<TimeMarker>,
}
