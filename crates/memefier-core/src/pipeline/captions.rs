//! Caption generation for a registered image.
//!
//! The caption endpoint is slow (it fronts an AI backend) and its record
//! shape is not stable: the text may live under any of a few field names.

use super::call::{malformed, StepContext};
use super::retry;
use crate::error::{PipelineError, PipelineResult};
use crate::transport::HttpResponse;
use crate::types::{CaptionCandidate, RegisteredImage, Stage};
use serde::Deserialize;
use serde_json::Value;

pub(crate) const CAPTIONS_PATH: &str = "/pipeline/generate-captions";

/// One upstream caption record. Fields are tried in declaration order.
#[derive(Deserialize)]
struct CaptionRecord {
    caption: Option<Value>,
    text: Option<Value>,
    content: Option<Value>,
    #[serde(rename = "captionText")]
    caption_text: Option<Value>,
}

impl CaptionRecord {
    fn into_text(self) -> Option<String> {
        [self.caption, self.text, self.content, self.caption_text]
            .into_iter()
            .flatten()
            .find_map(|value| match value {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                _ => None,
            })
    }
}

/// Generate captions for `image`, retrying only on gateway timeouts.
pub(crate) async fn generate_captions(
    ctx: &StepContext<'_>,
    image: &RegisteredImage,
) -> PipelineResult<Vec<CaptionCandidate>> {
    let options = ctx.options;
    let body = serde_json::json!({ "imageId": image.image_id });

    let mut last_error = None;
    for attempt in 0..=options.caption_retry_attempts {
        if attempt > 0 {
            let delay = retry::retry_delay(options.caption_retry_delay_ms);
            tracing::warn!(
                "Caption endpoint timed out upstream, retry {attempt}/{} after {delay:?}",
                options.caption_retry_attempts
            );
            tokio::time::sleep(delay).await;
        }

        match ctx
            .post_json(
                Stage::GeneratingCaptions,
                CAPTIONS_PATH,
                body.clone(),
                options.caption_timeout(),
            )
            .await
        {
            Ok(resp) => return parse_captions(&resp),
            Err(e) => {
                if !retry::is_retryable(&e) {
                    return Err(e);
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| PipelineError::Internal("caption attempts exhausted".into())))
}

/// Extract caption text from a caption-endpoint response body.
///
/// The body must be a JSON array. Records without a usable text field are
/// dropped; if none survive the result is [`PipelineError::NoCaptionsFound`].
pub(crate) fn parse_captions(resp: &HttpResponse) -> PipelineResult<Vec<CaptionCandidate>> {
    let value: Value = resp
        .json()
        .map_err(|e| malformed(Stage::GeneratingCaptions, format!("invalid JSON: {e}")))?;

    let records = match value {
        Value::Array(records) => records,
        _ => {
            return Err(malformed(
                Stage::GeneratingCaptions,
                "expected an array of caption records",
            ))
        }
    };

    let total = records.len();
    let captions: Vec<CaptionCandidate> = records
        .into_iter()
        .filter_map(|record| serde_json::from_value::<CaptionRecord>(record).ok())
        .filter_map(CaptionRecord::into_text)
        .map(|text| CaptionCandidate { text })
        .collect();

    if captions.len() < total {
        tracing::debug!(
            "Dropped {} caption records without text",
            total - captions.len()
        );
    }

    if captions.is_empty() {
        return Err(PipelineError::NoCaptionsFound);
    }
    Ok(captions)
}
