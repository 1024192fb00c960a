use crate::error::AppError;
use chrono_tz::Tz;
use std::env;

pub const DEFAULT_GRANULARITY_MIN: i32 = 30;
pub const DEFAULT_TIMEZONE: &str = "Europe/Budapest";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub store_write_token: Option<String>, // Required for any document creation
    pub practice_timezone: Tz,
    pub slot_granularity_min: i32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::Configuration("DATABASE_URL must be set".into()))?;

        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("PORT must be a number".into()))?;

        let store_write_token = env::var("STORE_WRITE_TOKEN").ok().filter(|t| !t.trim().is_empty());

        let tz_name = env::var("PRACTICE_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());
        let practice_timezone = parse_timezone(&tz_name)?;

        let slot_granularity_min = match env::var("SLOT_GRANULARITY_MIN") {
            Ok(raw) => parse_granularity(&raw)?,
            Err(_) => DEFAULT_GRANULARITY_MIN,
        };

        Ok(Self {
            database_url,
            port,
            store_write_token,
            practice_timezone,
            slot_granularity_min,
        })
    }

    /// The write credential, or the configuration error every submission surfaces without it.
    pub fn require_write_token(&self) -> Result<&str, AppError> {
        self.store_write_token.as_deref()
            .ok_or_else(|| AppError::Configuration("Missing STORE_WRITE_TOKEN".into()))
    }
}

fn parse_timezone(name: &str) -> Result<Tz, AppError> {
    name.parse()
        .map_err(|_| AppError::Configuration(format!("Unknown PRACTICE_TIMEZONE: {}", name)))
}

fn parse_granularity(raw: &str) -> Result<i32, AppError> {
    match raw.trim().parse::<i32>() {
        Ok(g) if g > 0 && 1440 % g == 0 => Ok(g),
        _ => Err(AppError::Configuration(format!(
            "SLOT_GRANULARITY_MIN must be a positive divisor of 1440, got {}", raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_parsing() {
        assert_eq!(parse_granularity("30").unwrap(), 30);
        assert_eq!(parse_granularity(" 15 ").unwrap(), 15);
        assert!(parse_granularity("0").is_err());
        assert!(parse_granularity("-30").is_err());
        assert!(parse_granularity("7").is_err());
        assert!(parse_granularity("half-hour").is_err());
    }

    #[test]
    fn test_timezone_parsing() {
        assert_eq!(parse_timezone("Europe/Budapest").unwrap(), chrono_tz::Europe::Budapest);
        assert!(parse_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn test_missing_write_token_is_configuration_error() {
        let config = Config {
            database_url: "sqlite::memory:".into(),
            port: 0,
            store_write_token: None,
            practice_timezone: chrono_tz::UTC,
            slot_granularity_min: 30,
        };
        assert!(matches!(config.require_write_token(), Err(AppError::Configuration(_))));
    }
}
