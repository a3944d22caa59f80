use std::str::FromStr;

use chrono_tz::Tz;

use crate::live::LookaheadPolicy;
use crate::utils::{AppError, AppResult};

/// Console configuration
///
/// # Environment variables
///
/// Every field can be overridden from the environment (a `.env` file is
/// honored):
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Working directory (logs, blobs) |
/// | ENVIRONMENT | development | Runtime environment |
/// | PAGE_SIZE | 10 | Items per page of every paged view |
/// | TIMEZONE | UTC | Business time zone for statistics |
/// | POPULAR_TOP_N | 6 | Best sellers flagged as popular |
/// | LOOKAHEAD_POLICY | every_snapshot | `every_snapshot` or `when_cursor_moves` |
/// | BLOB_DIR | {WORK_DIR}/blobs | Image storage directory |
/// | BLOB_BASE_URL | http://localhost:3000/images | Public URL prefix of images |
/// | LOG_LEVEL | info | Default log filter |
/// | LOG_DIR | (none) | Daily rolling log directory |
/// | LOG_JSON | false | JSON log lines |
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    /// development | staging | production
    pub environment: String,
    pub page_size: usize,
    pub timezone: Tz,
    pub popular_top_n: usize,
    pub lookahead: LookaheadPolicy,
    pub blob_dir: String,
    pub blob_base_url: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub log_json: bool,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Unparseable values fall back to their defaults; use [`validate`](Self::validate)
    /// to reject values that parse but make no sense.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let timezone = std::env::var("TIMEZONE")
            .ok()
            .and_then(|tz| {
                tz.parse::<Tz>()
                    .map_err(|e| tracing::warn!("Invalid TIMEZONE '{}': {}, using UTC", tz, e))
                    .ok()
            })
            .unwrap_or(Tz::UTC);

        Self {
            blob_dir: std::env::var("BLOB_DIR").unwrap_or_else(|_| format!("{}/blobs", work_dir)),
            work_dir,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            page_size: env_or("PAGE_SIZE", 10),
            timezone,
            popular_top_n: env_or("POPULAR_TOP_N", 6),
            lookahead: env_or("LOOKAHEAD_POLICY", LookaheadPolicy::EverySnapshot),
            blob_base_url: std::env::var("BLOB_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/images".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            log_json: env_or("LOG_JSON", false),
        }
    }

    /// Override the values tests care about
    pub fn with_overrides(work_dir: impl Into<String>, page_size: usize, timezone: Tz) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.blob_dir = format!("{}/blobs", config.work_dir);
        config.page_size = page_size;
        config.timezone = timezone;
        config
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.page_size == 0 {
            return Err(AppError::config("PAGE_SIZE must be at least 1"));
        }
        if self.popular_top_n == 0 {
            return Err(AppError::config("POPULAR_TOP_N must be at least 1"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_overrides() {
        let config = Config::with_overrides("/tmp/console", 5, chrono_tz::Asia::Ho_Chi_Minh);
        assert_eq!(config.page_size, 5);
        assert_eq!(config.blob_dir, "/tmp/console/blobs");
        assert_eq!(config.timezone, chrono_tz::Asia::Ho_Chi_Minh);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::with_overrides("/tmp/console", 0, Tz::UTC);
        assert!(config.validate().is_err());
        config.page_size = 1;
        config.popular_top_n = 0;
        assert!(config.validate().is_err());
    }
}
