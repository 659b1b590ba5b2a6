//! The `memefier caption` command.

use anyhow::Context;
use clap::{Args, ValueEnum};
use memefier_core::pipeline::{encode_data_url, mime_for_extension};
use memefier_core::{CaptionPipeline, Config, PipelineOutcome, StaticTokenProvider};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments for the `caption` command.
#[derive(Args, Debug)]
pub struct CaptionArgs {
    /// Image file to caption
    #[arg(required = true)]
    pub image: PathBuf,

    /// Content type of the image (inferred from the extension when omitted)
    #[arg(long)]
    pub content_type: Option<String>,

    /// Access token (overrides `[auth] access_token`)
    #[arg(long)]
    pub token: Option<String>,

    /// Pipeline service base URL (overrides `[api] base_url`)
    #[arg(long, env = "MEMEFIER_API_URL")]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// One caption per line
    Text,
    /// The full outcome object
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Execute the caption command.
pub async fn execute(args: CaptionArgs, mut config: Config) -> anyhow::Result<()> {
    let path = expand_path(&args.image);
    let content_type = match args.content_type {
        Some(ct) => ct,
        None => infer_content_type(&path)?.to_string(),
    };

    let bytes = std::fs::read(&path)
        .with_context(|| format!("Failed to read image: {}", path.display()))?;
    tracing::info!(
        "Captioning {} ({} bytes, {content_type})",
        path.display(),
        bytes.len()
    );
    let data_url = encode_data_url(&bytes, &content_type);

    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url.trim().to_string();
    }
    let mut pipeline = CaptionPipeline::from_config(&config)?;
    if let Some(token) = args.token {
        pipeline = pipeline.with_token_provider(Arc::new(StaticTokenProvider::new(token)));
    }

    let outcome = pipeline.run(&data_url, &content_type).await;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => {
            if let PipelineOutcome::Success(captions) = &outcome {
                for caption in captions {
                    println!("{caption}");
                }
            }
        }
    }

    if let PipelineOutcome::Failure(message) = outcome {
        anyhow::bail!(message);
    }
    Ok(())
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

fn infer_content_type(path: &Path) -> anyhow::Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    mime_for_extension(ext).with_context(|| {
        format!(
            "Cannot infer content type for {}; pass --content-type",
            path.display()
        )
    })
}
