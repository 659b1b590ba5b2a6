//! Image registration: tells the pipeline service the uploaded image is
//! readable at its public URL.

use super::call::{malformed, StepContext};
use crate::error::PipelineResult;
use crate::transport::HttpResponse;
use crate::types::{RegisteredImage, Stage};
use serde::Deserialize;

pub(crate) const REGISTER_PATH: &str = "/pipeline/upload-image-from-url";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterResponse {
    image_id: Option<String>,
}

/// Register `image_url` for private (not common-use) processing.
///
/// Assumes the object is already readable; there is no polling here.
pub(crate) async fn register_image(
    ctx: &StepContext<'_>,
    image_url: &str,
) -> PipelineResult<RegisteredImage> {
    let body = serde_json::json!({ "imageUrl": image_url, "isCommonUse": false });
    let resp = ctx
        .post_json(
            Stage::Registering,
            REGISTER_PATH,
            body,
            ctx.options.request_timeout(),
        )
        .await?;
    parse_registration(&resp)
}

fn parse_registration(resp: &HttpResponse) -> PipelineResult<RegisteredImage> {
    let parsed: RegisterResponse = resp
        .json()
        .map_err(|e| malformed(Stage::Registering, format!("invalid JSON: {e}")))?;
    let image_id = parsed
        .image_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| malformed(Stage::Registering, "missing imageId"))?;
    Ok(RegisteredImage { image_id })
}
