//! Caption pipeline orchestrator.
//!
//! Runs token → upload URL → upload → register → captions strictly in order.
//! The first failing step ends the run; every failure, including a panic
//! inside a step, comes back as a [`PipelineOutcome::Failure`].

use super::call::StepContext;
use super::captions::generate_captions;
use super::content_type::ContentType;
use super::register::register_image;
use super::upload::upload_image;
use super::upload_url::request_upload_ticket;
use crate::auth::{BearerToken, ConfigTokenProvider, TokenProvider};
use crate::config::Config;
use crate::error::{PipelineError, StageError};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{PipelineOutcome, PipelineState, Stage};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

/// Message returned when a step faults outside the error taxonomy.
const UNEXPECTED_FAILURE: &str = "An error occurred while processing the image";

/// Tunables for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Deadline for upload-URL, upload and registration calls, in milliseconds
    pub request_timeout_ms: u64,
    /// Deadline for each caption attempt, in milliseconds
    pub caption_timeout_ms: u64,
    /// Extra caption attempts after a 504
    pub caption_retry_attempts: u32,
    /// Fixed delay between caption attempts, in milliseconds
    pub caption_retry_delay_ms: u64,
    /// Upload allow-list
    pub allowed_content_types: Vec<String>,
    /// Largest decoded image accepted for upload
    pub max_image_bytes: u64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self {
            request_timeout_ms: config.api.request_timeout_ms,
            caption_timeout_ms: config.api.caption_timeout_ms,
            caption_retry_attempts: config.api.caption_retry_attempts,
            caption_retry_delay_ms: config.api.caption_retry_delay_ms,
            allowed_content_types: config.upload.allowed_content_types.clone(),
            max_image_bytes: config.upload.max_image_bytes(),
        }
    }
}

impl PipelineOptions {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn caption_timeout(&self) -> Duration {
        Duration::from_millis(self.caption_timeout_ms)
    }
}

/// Per-invocation state tracker. Never shared between runs.
struct Run {
    state: PipelineState,
}

impl Run {
    fn new() -> Self {
        Self {
            state: PipelineState::Idle,
        }
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!(from = %self.state, to = %stage, "pipeline transition");
        self.state = PipelineState::Running(stage);
    }

    fn fail(&mut self, error: PipelineError) -> StageError {
        let stage = match self.state {
            PipelineState::Running(stage) | PipelineState::Failed(stage) => stage,
            PipelineState::Idle | PipelineState::Done => Stage::Authenticating,
        };
        self.state = PipelineState::Failed(stage);
        tracing::warn!(%stage, "pipeline failed: {error}");
        StageError::new(stage, error)
    }

    fn finish(&mut self) {
        tracing::debug!(from = %self.state, "pipeline done");
        self.state = PipelineState::Done;
    }
}

/// Turns an uploaded image into AI-generated captions.
///
/// Holds only immutable settings and shared collaborators, so one instance can
/// serve any number of concurrent runs.
pub struct CaptionPipeline {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenProvider>,
    base_url: String,
    options: PipelineOptions,
}

impl CaptionPipeline {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<dyn TokenProvider>,
        base_url: impl Into<String>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            transport,
            tokens,
            base_url: base_url.into().trim().to_string(),
            options,
        }
    }

    /// Build a pipeline that talks to the configured service over reqwest and
    /// reads its token from config.
    ///
    /// The config is validated first, so values changed after loading (CLI
    /// overrides) are checked too.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self::new(
            Arc::new(ReqwestTransport::with_user_agent()?),
            Arc::new(ConfigTokenProvider::new(&config.auth)),
            config.api.base_url.clone(),
            PipelineOptions::from(config),
        ))
    }

    /// Replace the token source.
    pub fn with_token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run the pipeline and fold every failure into a [`PipelineOutcome`].
    pub async fn run(&self, data_url: &str, content_type: &str) -> PipelineOutcome {
        let result = AssertUnwindSafe(self.try_run(data_url, content_type))
            .catch_unwind()
            .await;
        match result {
            Ok(Ok(captions)) => PipelineOutcome::Success(captions),
            Ok(Err(e)) => PipelineOutcome::Failure(e.to_string()),
            Err(_) => {
                tracing::error!("Caption pipeline panicked");
                PipelineOutcome::Failure(UNEXPECTED_FAILURE.to_string())
            }
        }
    }

    /// Run the pipeline, keeping the typed error of the failing stage.
    pub async fn try_run(
        &self,
        data_url: &str,
        content_type: &str,
    ) -> Result<Vec<String>, StageError> {
        let mut run = Run::new();

        let token = self
            .tokens
            .access_token()
            .await
            .and_then(BearerToken::new)
            .ok_or_else(|| run.fail(PipelineError::Unauthenticated))?;

        let ctx = StepContext {
            transport: self.transport.as_ref(),
            base_url: &self.base_url,
            token: &token,
            options: &self.options,
        };

        run.enter(Stage::RequestingUrl);
        let content_type = ContentType::parse(content_type, &self.options.allowed_content_types)
            .map_err(|e| run.fail(e))?;
        let ticket = request_upload_ticket(&ctx, &content_type)
            .await
            .map_err(|e| run.fail(e))?;

        run.enter(Stage::Uploading);
        let image_url = upload_image(&ctx, ticket, data_url, &content_type)
            .await
            .map_err(|e| run.fail(e))?;

        run.enter(Stage::Registering);
        let image = register_image(&ctx, &image_url)
            .await
            .map_err(|e| run.fail(e))?;
        tracing::info!(image_id = %image.image_id, "Image registered");

        run.enter(Stage::GeneratingCaptions);
        let captions = generate_captions(&ctx, &image)
            .await
            .map_err(|e| run.fail(e))?;

        run.finish();
        tracing::info!(count = captions.len(), "Captions generated");
        Ok(captions.into_iter().map(|c| c.text).collect())
    }
}
