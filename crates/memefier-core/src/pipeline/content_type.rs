//! Upload content-type allow-list.

use crate::error::{PipelineError, PipelineResult};
use std::fmt;

/// A content type that passed the upload allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType(String);

impl ContentType {
    /// Accept `raw` only if it matches an entry of `allowed` (case-insensitive).
    ///
    /// The stored value is the lowercased, trimmed form.
    pub fn parse(raw: &str, allowed: &[String]) -> PipelineResult<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        if !normalized.is_empty() && allowed.iter().any(|a| a.eq_ignore_ascii_case(&normalized)) {
            Ok(Self(normalized))
        } else {
            Err(PipelineError::UnsupportedContentType(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Guess a MIME type from a file extension.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}
