//! Data-URL payload encoding and decoding.

use crate::error::{PipelineError, PipelineResult};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

/// Standard alphabet, padding optional on decode.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a `data:<mime>;base64,<payload>` string (or a bare base64 payload) to bytes.
///
/// Any MIME type in the prefix is accepted; it does not have to match the
/// declared upload type. Whitespace inside the payload is ignored.
pub fn decode_data_url(input: &str) -> PipelineResult<Vec<u8>> {
    let input = input.trim();
    let payload = if let Some(rest) = input.strip_prefix("data:") {
        match rest.split_once(',') {
            Some((header, data)) if header.ends_with(";base64") => data,
            Some(_) => {
                return Err(PipelineError::InvalidImageData(
                    "data URL is not base64-encoded".into(),
                ))
            }
            None => {
                return Err(PipelineError::InvalidImageData(
                    "data URL has no payload".into(),
                ))
            }
        }
    } else {
        input
    };

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(PipelineError::InvalidImageData("empty image payload".into()));
    }

    LENIENT
        .decode(compact.as_bytes())
        .map_err(|e| PipelineError::InvalidImageData(e.to_string()))
}

/// Encode raw bytes as a data URL.
pub fn encode_data_url(bytes: &[u8], content_type: &str) -> String {
    format!(
        "data:{};base64,{}",
        content_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}
