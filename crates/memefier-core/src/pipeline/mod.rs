//! Caption pipeline components.
//!
//! This module contains the steps of the caption pipeline:
//! - **content_type**: Upload allow-list
//! - **data_url**: Data-URL payload decoding
//! - **upload_url**: Presigned upload URL request
//! - **upload**: Binary PUT to the presigned URL
//! - **register**: Image registration with the pipeline service
//! - **captions**: Caption generation and response parsing
//! - **retry**: Gateway-timeout retry policy
//! - **orchestrator**: Runs the steps in order

mod call;
mod captions;
pub mod content_type;
pub mod data_url;
pub mod orchestrator;
mod register;
pub mod retry;
mod upload;
mod upload_url;

// Re-exports for convenient access
pub use content_type::{mime_for_extension, ContentType};
pub use data_url::{decode_data_url, encode_data_url};
pub use orchestrator::{CaptionPipeline, PipelineOptions};
