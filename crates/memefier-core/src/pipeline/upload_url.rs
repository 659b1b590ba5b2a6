//! Upload-URL request: asks the pipeline service for a presigned write URL
//! and the public URL the image will be served from.

use super::call::{malformed, StepContext};
use super::content_type::ContentType;
use crate::error::PipelineResult;
use crate::transport::HttpResponse;
use crate::types::{Stage, UploadTicket};
use serde::Deserialize;

pub(crate) const PRESIGN_PATH: &str = "/pipeline/generate-presigned-url";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresignResponse {
    presigned_url: Option<String>,
    cdn_url: Option<String>,
}

/// Request a single-use [`UploadTicket`] for an image of `content_type`.
pub(crate) async fn request_upload_ticket(
    ctx: &StepContext<'_>,
    content_type: &ContentType,
) -> PipelineResult<UploadTicket> {
    let body = serde_json::json!({ "contentType": content_type.as_str() });
    let resp = ctx
        .post_json(
            Stage::RequestingUrl,
            PRESIGN_PATH,
            body,
            ctx.options.request_timeout(),
        )
        .await?;
    parse_ticket(&resp)
}

fn parse_ticket(resp: &HttpResponse) -> PipelineResult<UploadTicket> {
    let parsed: PresignResponse = resp
        .json()
        .map_err(|e| malformed(Stage::RequestingUrl, format!("invalid JSON: {e}")))?;

    let presigned_url = parsed
        .presigned_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| malformed(Stage::RequestingUrl, "missing presignedUrl"))?;
    let cdn_url = parsed
        .cdn_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| malformed(Stage::RequestingUrl, "missing cdnUrl"))?;

    Ok(UploadTicket::new(presigned_url, cdn_url))
}
