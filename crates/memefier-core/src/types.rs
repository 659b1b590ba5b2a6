//! Core data types for the caption pipeline.
//!
//! These types flow between pipeline steps and back out to callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A step of the caption pipeline, used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Authenticating,
    RequestingUrl,
    Uploading,
    Registering,
    GeneratingCaptions,
}

impl Stage {
    /// Prefix shown to callers when this stage fails.
    pub fn failure_prefix(&self) -> Option<&'static str> {
        match self {
            Stage::Authenticating => None,
            Stage::RequestingUrl => Some("Failed to get upload URL"),
            Stage::Uploading => Some("Failed to upload image"),
            Stage::Registering => Some("Failed to register image"),
            Stage::GeneratingCaptions => Some("Failed to generate captions"),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Authenticating => "authenticate",
            Stage::RequestingUrl => "upload-url",
            Stage::Uploading => "upload",
            Stage::Registering => "register",
            Stage::GeneratingCaptions => "captions",
        };
        f.write_str(name)
    }
}

/// Where a single pipeline invocation currently is.
///
/// `Idle → RequestingUrl → Uploading → Registering → GeneratingCaptions → {Done | Failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running(Stage),
    Done,
    Failed(Stage),
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Idle => f.write_str("idle"),
            PipelineState::Running(stage) => write!(f, "{stage}"),
            PipelineState::Done => f.write_str("done"),
            PipelineState::Failed(stage) => write!(f, "failed at {stage}"),
        }
    }
}

/// One-time write URL plus the public URL the bytes will be readable at.
///
/// Only the upload-URL step can create a ticket, so the uploader can never be
/// pointed at a URL that did not come from the pipeline service.
#[derive(Debug, PartialEq, Eq)]
pub struct UploadTicket {
    presigned_url: String,
    cdn_url: String,
}

impl UploadTicket {
    pub(crate) fn new(presigned_url: String, cdn_url: String) -> Self {
        Self {
            presigned_url,
            cdn_url,
        }
    }

    /// Single-use write URL.
    pub fn presigned_url(&self) -> &str {
        &self.presigned_url
    }

    /// Public read URL.
    pub fn cdn_url(&self) -> &str {
        &self.cdn_url
    }

    /// Spend the ticket, keeping only the public URL.
    pub(crate) fn into_cdn_url(self) -> String {
        self.cdn_url
    }
}

/// An image the pipeline service has accepted for processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredImage {
    pub image_id: String,
}

/// A single generated caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionCandidate {
    pub text: String,
}

/// All-or-nothing result handed back to callers.
///
/// Serializes as `{"success": true, "captions": [...]}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Success(Vec<String>),
    Failure(String),
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success(_))
    }

    pub fn captions(&self) -> Option<&[String]> {
        match self {
            PipelineOutcome::Success(captions) => Some(captions),
            PipelineOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PipelineOutcome::Success(_) => None,
            PipelineOutcome::Failure(message) => Some(message),
        }
    }

    pub fn into_result(self) -> Result<Vec<String>, String> {
        match self {
            PipelineOutcome::Success(captions) => Ok(captions),
            PipelineOutcome::Failure(message) => Err(message),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct OutcomeBody {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    captions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Serialize for PipelineOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = OutcomeBody {
            success: self.is_success(),
            captions: self.captions().map(<[String]>::to_vec),
            error: self.error().map(String::from),
        };
        body.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PipelineOutcome {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let body = OutcomeBody::deserialize(deserializer)?;
        if body.success {
            Ok(PipelineOutcome::Success(body.captions.unwrap_or_default()))
        } else {
            Ok(PipelineOutcome::Failure(body.error.unwrap_or_default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_success_shape() {
        let outcome = PipelineOutcome::Success(vec!["A".into(), "B".into()]);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "captions": ["A", "B"]}));
    }

    #[test]
    fn test_outcome_failure_shape() {
        let outcome = PipelineOutcome::Failure("Not authenticated".into());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Not authenticated"})
        );
    }

    #[test]
    fn test_outcome_from_json() {
        let outcome: PipelineOutcome =
            serde_json::from_str(r#"{"success":false,"error":"boom"}"#).unwrap();
        assert_eq!(outcome.error(), Some("boom"));
        assert!(outcome.captions().is_none());
    }

    #[test]
    fn test_stage_prefixes() {
        assert_eq!(Stage::Authenticating.failure_prefix(), None);
        assert_eq!(
            Stage::Uploading.failure_prefix(),
            Some("Failed to upload image")
        );
    }

    #[test]
    fn test_state_display() {
        assert_eq!(PipelineState::Idle.to_string(), "idle");
        assert_eq!(
            PipelineState::Failed(Stage::Registering).to_string(),
            "failed at register"
        );
    }
}
