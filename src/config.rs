use std::env;

use chrono::FixedOffset;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub mock_request_count: usize,
    pub max_request_count: usize,
    pub mock_seed: Option<u64>,
    pub event_buffer_size: usize,
    pub display_utc_offset_minutes: i32,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let config = Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            mock_request_count: parse_or_default("MOCK_REQUEST_COUNT", 20)?,
            max_request_count: parse_or_default("MAX_REQUEST_COUNT", 1000)?,
            mock_seed: parse_optional("MOCK_SEED")?,
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            display_utc_offset_minutes: parse_or_default("DISPLAY_UTC_OFFSET_MINUTES", 0)?,
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
        };

        config.display_offset()?;
        if config.mock_request_count > config.max_request_count {
            return Err(AppError::Internal(format!(
                "invalid MOCK_REQUEST_COUNT: {} exceeds MAX_REQUEST_COUNT {}",
                config.mock_request_count, config.max_request_count
            )));
        }
        Ok(config)
    }

    pub fn display_offset(&self) -> Result<FixedOffset, AppError> {
        FixedOffset::east_opt(self.display_utc_offset_minutes * 60).ok_or_else(|| {
            AppError::Internal(format!(
                "invalid DISPLAY_UTC_OFFSET_MINUTES: {} is out of range",
                self.display_utc_offset_minutes
            ))
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 3000,
            log_level: "info".to_string(),
            mock_request_count: 20,
            max_request_count: 1000,
            mock_seed: None,
            event_buffer_size: 1024,
            display_utc_offset_minutes: 0,
            static_dir: "static".to_string(),
        }
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_optional(key)?.unwrap_or(default))
}

fn parse_optional<T>(key: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn default_offset_is_utc() {
        let offset = Config::default().display_offset().unwrap();
        assert_eq!(offset.local_minus_utc(), 0);
    }

    #[test]
    fn offset_beyond_a_day_is_rejected() {
        let config = Config {
            display_utc_offset_minutes: 24 * 60,
            ..Config::default()
        };
        assert!(config.display_offset().is_err());
    }
}
