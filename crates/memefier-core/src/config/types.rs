//! Sub-configuration structs and their defaults.

use serde::{Deserialize, Serialize};

/// Default pipeline service host.
pub const DEFAULT_API_BASE: &str = "https://api.almostcrackd.ai";

/// Pipeline service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the pipeline service (no trailing path)
    pub base_url: String,

    /// Timeout for upload-URL, upload and registration calls, in milliseconds
    pub request_timeout_ms: u64,

    /// Timeout for each caption-generation attempt, in milliseconds
    pub caption_timeout_ms: u64,

    /// Extra caption attempts after a gateway timeout (504)
    pub caption_retry_attempts: u32,

    /// Fixed delay between caption attempts, in milliseconds
    pub caption_retry_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            request_timeout_ms: 30_000,
            caption_timeout_ms: 120_000,
            caption_retry_attempts: 2,
            caption_retry_delay_ms: 2_000,
        }
    }
}

/// Session credential settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Bearer token, either literal or a `${ENV_VAR}` reference
    pub access_token: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token: "${MEMEFIER_ACCESS_TOKEN}".to_string(),
        }
    }
}

/// Upload restrictions applied before any network call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// MIME types accepted for upload (matched case-insensitively)
    pub allowed_content_types: Vec<String>,

    /// Maximum decoded image size in megabytes
    pub max_image_size_mb: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_content_types: [
                "image/jpeg",
                "image/jpg",
                "image/png",
                "image/webp",
                "image/gif",
                "image/heic",
                "image/heif",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_image_size_mb: 10,
        }
    }
}

impl UploadConfig {
    /// Size cap in bytes.
    pub fn max_image_bytes(&self) -> u64 {
        self.max_image_size_mb.saturating_mul(1024 * 1024)
    }
}

/// Taste statistics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// How many top words to report
    pub top_words: usize,

    /// Words shorter than this are ignored
    pub min_word_length: usize,

    /// Words never counted
    pub stop_words: Vec<String>,

    /// IANA time zone used for day bucketing
    pub timezone: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            top_words: 5,
            min_word_length: 4,
            stop_words: ["this", "that", "with", "from", "have", "what"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timezone: "America/New_York".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
