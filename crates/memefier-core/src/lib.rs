//! Memefier Core - caption pipeline client and site logic.
//!
//! Memefier turns an uploaded image into AI-generated meme captions by driving
//! an external pipeline service, and carries the small pieces of site logic
//! (vote toggling, caption feeds, taste statistics) that need no data store.
//!
//! # Architecture
//!
//! The caption pipeline is strictly sequential:
//!
//! ```text
//! Token → Upload URL → PUT image → Register → Generate captions → [String]
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use memefier_core::{CaptionPipeline, Config};
//!
//! #[tokio::main]
//! async fn main() -> memefier_core::Result<()> {
//!     let config = Config::load()?;
//!     let pipeline = CaptionPipeline::from_config(&config)?;
//!
//!     let outcome = pipeline.run("data:image/png;base64,...", "image/png").await;
//!     println!("{}", serde_json::to_string(&outcome)?);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod auth;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod site;
pub mod transport;
pub mod types;

// Re-exports for convenient access
pub use auth::{ConfigTokenProvider, StaticTokenProvider, TokenProvider};
pub use config::Config;
pub use error::{ConfigError, MemefierError, PipelineError, PipelineResult, Result, StageError};
pub use pipeline::{CaptionPipeline, PipelineOptions};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use types::{
    CaptionCandidate, PipelineOutcome, PipelineState, RegisteredImage, Stage, UploadTicket,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
