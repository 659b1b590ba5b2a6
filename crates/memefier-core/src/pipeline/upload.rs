//! Binary upload: decodes the data-URL payload and PUTs the bytes to the
//! presigned URL.

use super::call::{bounded, ensure_success, StepContext};
use super::content_type::ContentType;
use super::data_url::decode_data_url;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{Stage, UploadTicket};

/// Upload the image and consume the ticket, returning the public URL.
///
/// No retry: a non-2xx answer or a timeout ends the step.
pub(crate) async fn upload_image(
    ctx: &StepContext<'_>,
    ticket: UploadTicket,
    data_url: &str,
    content_type: &ContentType,
) -> PipelineResult<String> {
    let bytes = decode_data_url(data_url)?;
    let size_bytes = bytes.len() as u64;
    let max_bytes = ctx.options.max_image_bytes;
    if size_bytes > max_bytes {
        return Err(PipelineError::ImageTooLarge {
            size_bytes,
            max_bytes,
        });
    }

    tracing::debug!(size_bytes, %content_type, "PUT presigned upload");
    let timeout = ctx.options.request_timeout();
    let call = ctx
        .transport
        .put_bytes(ticket.presigned_url(), content_type.as_str(), bytes, timeout);
    let resp = bounded(Stage::Uploading, timeout, call).await?;
    ensure_success(Stage::Uploading, resp)?;

    Ok(ticket.into_cdn_url())
}
