//! Error types for the Memefier caption pipeline.
//!
//! Errors are organized by stage so a failure message always says which
//! capability broke (upload URL, upload, registration, captioning) and why.

use crate::types::Stage;
use thiserror::Error;

/// Top-level error type for Memefier operations.
#[derive(Error, Debug)]
pub enum MemefierError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] StageError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// What went wrong inside a single pipeline step.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No session token, or an empty one
    #[error("Not authenticated")]
    Unauthenticated,

    /// Content type outside the upload allow-list
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Call abandoned after its deadline
    #[error("Timeout in {stage} stage after {timeout_ms}ms")]
    Timeout { stage: Stage, timeout_ms: u64 },

    /// Upstream answered with a non-2xx status
    #[error("HTTP {status} in {stage} stage: {body}")]
    UpstreamHttp {
        stage: Stage,
        status: u16,
        body: String,
    },

    /// Upstream answered 2xx but the body is missing required fields
    #[error("Malformed response in {stage} stage: {message}")]
    MalformedResponse { stage: Stage, message: String },

    /// Caption call succeeded but no record carried usable text
    #[error("No captions found")]
    NoCaptionsFound,

    /// Connection, DNS or TLS failure before any status was received
    #[error("Request failed in {stage} stage: {message}")]
    Transport { stage: Stage, message: String },

    /// The data URL payload is not valid base64
    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    /// Decoded payload exceeds the configured upload cap
    #[error("Image too large ({size_bytes} bytes > {max_bytes} bytes)")]
    ImageTooLarge { size_bytes: u64, max_bytes: u64 },

    /// A step faulted in a way none of the above describe
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// HTTP status carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PipelineError::UpstreamHttp { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A [`PipelineError`] attributed to the stage that produced it.
///
/// The display form is the message handed back to callers, prefixed by the
/// capability that failed.
#[derive(Debug)]
pub struct StageError {
    pub stage: Stage,
    pub error: PipelineError,
}

impl StageError {
    pub fn new(stage: Stage, error: PipelineError) -> Self {
        Self { stage, error }
    }

    /// Caller-facing message for this failure.
    pub fn message(&self) -> String {
        if matches!(self.error, PipelineError::Unauthenticated) {
            return self.error.to_string();
        }
        match self.stage.failure_prefix() {
            Some(prefix) => format!("{prefix}: {}", self.error),
            None => self.error.to_string(),
        }
    }
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Convenience type alias for Memefier results.
pub type Result<T> = std::result::Result<T, MemefierError>;

/// Convenience type alias for pipeline-step results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_prefixes_capability() {
        let err = StageError::new(
            Stage::RequestingUrl,
            PipelineError::UnsupportedContentType("image/bmp".into()),
        );
        assert_eq!(
            err.to_string(),
            "Failed to get upload URL: Unsupported content type: image/bmp"
        );

        let err = StageError::new(
            Stage::Registering,
            PipelineError::MalformedResponse {
                stage: Stage::Registering,
                message: "missing imageId".into(),
            },
        );
        assert!(err.to_string().starts_with("Failed to register image: "));
    }

    #[test]
    fn test_unauthenticated_is_not_prefixed() {
        let err = StageError::new(Stage::Authenticating, PipelineError::Unauthenticated);
        assert_eq!(err.to_string(), "Not authenticated");

        let err = StageError::new(Stage::Uploading, PipelineError::Unauthenticated);
        assert_eq!(err.to_string(), "Not authenticated");
    }

    #[test]
    fn test_status_code() {
        let err = PipelineError::UpstreamHttp {
            stage: Stage::GeneratingCaptions,
            status: 504,
            body: String::new(),
        };
        assert_eq!(err.status_code(), Some(504));
        assert_eq!(PipelineError::NoCaptionsFound.status_code(), None);
    }
}
