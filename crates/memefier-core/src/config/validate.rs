//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api.base_url.as_str();
        if base.trim() != base {
            return Err(ConfigError::ValidationError(
                "api.base_url must not have surrounding whitespace".into(),
            ));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::ValidationError(
                "api.base_url must be an http(s) URL".into(),
            ));
        }
        if self.api.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "api.request_timeout_ms must be > 0".into(),
            ));
        }
        if self.api.caption_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "api.caption_timeout_ms must be > 0".into(),
            ));
        }
        if self.upload.allowed_content_types.is_empty() {
            return Err(ConfigError::ValidationError(
                "upload.allowed_content_types must not be empty".into(),
            ));
        }
        if self.upload.max_image_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "upload.max_image_size_mb must be > 0".into(),
            ));
        }
        if self.stats.top_words == 0 {
            return Err(ConfigError::ValidationError(
                "stats.top_words must be > 0".into(),
            ));
        }
        if self.stats.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ConfigError::ValidationError(format!(
                "stats.timezone is not a known time zone: {}",
                self.stats.timezone
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}
