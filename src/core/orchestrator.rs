use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::{ExtractionPlan, MediaFormat, Platform, Resolution};
use crate::engine::ExtractionEngine;
use crate::utils::sanitize_title;

/// One incoming request, immutable for its lifetime. `resolution` defaults
/// to `best` when the caller leaves it out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    pub format: MediaFormat,
    #[serde(default)]
    pub resolution: Resolution,
}

/// Outcome of one handled request. The underlying file stays on disk after
/// the response is sent; there is no cleanup policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResult {
    pub file_name: String,
    pub file_path: PathBuf,
    pub title: String,
    pub platform: Platform,
}

/// Composes classifier, resolver and sanitizer around the external engine
/// and pins down which file the engine actually produced.
pub struct Orchestrator {
    engine: Arc<dyn ExtractionEngine>,
    output_dir: PathBuf,
}

impl Orchestrator {
    pub fn new(engine: Arc<dyn ExtractionEngine>, output_dir: impl Into<PathBuf>) -> Self {
        Self { engine, output_dir: output_dir.into() }
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub async fn handle(&self, request: &DownloadRequest) -> Result<DownloadResult> {
        // Metadata failure never blocks the download; a generated identifier
        // stands in for the title.
        let title = match self.engine.probe(&request.url).await {
            Ok(info) => info.title,
            Err(e) => {
                warn!(error = %e, url = %request.url, "metadata probe failed, using generated title");
                Uuid::new_v4().to_string()
            }
        };

        let base = sanitize_title(&title);
        let platform = Platform::classify(&request.url);
        let plan = ExtractionPlan::resolve(request.format, request.resolution, platform);

        info!(
            url = %request.url,
            %platform,
            format = %request.format,
            selector = %plan.format_selector,
            "starting download"
        );

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("creating output directory {}", self.output_dir.display()))?;

        let template = self.output_dir.join(format!("{base}.%(ext)s"));
        let output = self.engine.download(&request.url, &plan, &template).await?;

        // Audio requests always end up in the requested container; for video
        // the post-processing chain may have changed it, so trust the engine.
        let ext = if request.format.is_audio() || output.ext.is_empty() {
            request.format.as_str().to_string()
        } else {
            output.ext
        };

        let file_path = self.locate_output(output.output_path, &base, &ext).await?;
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("output path has no file name")?;

        info!(file = %file_path.display(), "download finished");

        Ok(DownloadResult { file_name, file_path, title, platform })
    }

    /// Prefer the exact path the engine reported. Fall back to the expected
    /// `{base}.{ext}` name, then to a prefix scan of the output directory
    /// (lexicographically first match, so the fallback is deterministic).
    async fn locate_output(
        &self,
        reported: Option<PathBuf>,
        base: &str,
        ext: &str,
    ) -> Result<PathBuf> {
        if let Some(path) = reported {
            if path.exists() {
                return Ok(path);
            }
        }

        let expected = self.output_dir.join(format!("{base}.{ext}"));
        if expected.exists() {
            return Ok(expected);
        }

        let prefix = format!("{base}.");
        let mut matches = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.output_dir)
            .await
            .with_context(|| format!("reading output directory {}", self.output_dir.display()))?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(&prefix) {
                matches.push(entry.path());
            }
        }
        matches.sort();

        matches
            .into_iter()
            .next()
            .with_context(|| format!("no output file found for '{base}'"))
    }
}
