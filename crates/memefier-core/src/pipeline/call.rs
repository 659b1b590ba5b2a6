//! Shared plumbing for pipeline HTTP calls: endpoint resolution, deadlines
//! and status checks.

use super::orchestrator::PipelineOptions;
use crate::auth::BearerToken;
use crate::error::{PipelineError, PipelineResult};
use crate::transport::{HttpResponse, HttpTransport, TransportError};
use crate::types::Stage;
use std::future::Future;
use std::time::Duration;

/// Upstream error bodies are cut to this many characters.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Everything a step needs to reach the pipeline service.
pub(crate) struct StepContext<'a> {
    pub transport: &'a dyn HttpTransport,
    pub base_url: &'a str,
    pub token: &'a BearerToken,
    pub options: &'a PipelineOptions,
}

impl StepContext<'_> {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// POST a JSON body to a pipeline endpoint and require a 2xx answer.
    pub async fn post_json(
        &self,
        stage: Stage,
        path: &str,
        body: serde_json::Value,
        timeout: Duration,
    ) -> PipelineResult<HttpResponse> {
        let url = self.endpoint(path);
        tracing::debug!(%stage, %url, "POST");
        let call = self
            .transport
            .post_json(&url, self.token.as_str(), &body, timeout);
        let resp = bounded(stage, timeout, call).await?;
        ensure_success(stage, resp)
    }
}

/// Await `call`, abandoning it once `timeout` elapses.
pub(crate) async fn bounded<F>(
    stage: Stage,
    timeout: Duration,
    call: F,
) -> PipelineResult<HttpResponse>
where
    F: Future<Output = Result<HttpResponse, TransportError>>,
{
    let timeout_ms = timeout.as_millis() as u64;
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(resp)) => Ok(resp),
        Ok(Err(TransportError::Timeout)) | Err(_) => {
            Err(PipelineError::Timeout { stage, timeout_ms })
        }
        Ok(Err(TransportError::Failed(message))) => {
            Err(PipelineError::Transport { stage, message })
        }
    }
}

/// Turn a non-2xx response into [`PipelineError::UpstreamHttp`].
pub(crate) fn ensure_success(stage: Stage, resp: HttpResponse) -> PipelineResult<HttpResponse> {
    if resp.is_success() {
        return Ok(resp);
    }
    let body: String = resp.text().chars().take(MAX_ERROR_BODY_CHARS).collect();
    tracing::debug!(%stage, status = resp.status, %body, "upstream error");
    Err(PipelineError::UpstreamHttp {
        stage,
        status: resp.status,
        body,
    })
}

/// Build a malformed-response error for `stage`.
pub(crate) fn malformed(stage: Stage, message: impl Into<String>) -> PipelineError {
    PipelineError::MalformedResponse {
        stage,
        message: message.into(),
    }
}
