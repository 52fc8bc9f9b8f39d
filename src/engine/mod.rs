pub mod ytdlp;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::ExtractionPlan;

pub use ytdlp::YtDlp;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("extraction engine binary not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Extraction(String),
    #[error("failed to run extraction engine: {0}")]
    Io(#[from] std::io::Error),
    #[error("unreadable engine output: {0}")]
    Parse(String),
}

/// Metadata-only probe result.
#[derive(Debug, Clone)]
pub struct MediaInfo {
    pub title: String,
}

/// What the engine reports after a download. `output_path` is the exact file
/// the engine produced after post-processing, when it could be determined;
/// callers fall back to scanning the output directory otherwise.
#[derive(Debug, Clone)]
pub struct EngineOutput {
    pub ext: String,
    pub output_path: Option<PathBuf>,
}

/// External extraction engine. Two operations: probe metadata without
/// downloading, and download according to a resolved plan. Both may fail on
/// network errors, unsupported URLs, or engine-internal errors.
#[async_trait]
pub trait ExtractionEngine: Send + Sync {
    async fn probe(&self, url: &str) -> Result<MediaInfo, EngineError>;

    async fn download(
        &self,
        url: &str,
        plan: &ExtractionPlan,
        output_template: &Path,
    ) -> Result<EngineOutput, EngineError>;
}
