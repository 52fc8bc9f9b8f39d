//! Bridge to the `yt-dlp` binary.
//!
//! The engine owns all network I/O, stream selection and ffmpeg work; this
//! module only translates an [`ExtractionPlan`] into an argument vector and
//! reads the engine's answers back.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

use super::{EngineError, EngineOutput, ExtractionEngine, MediaInfo};
use crate::core::{ExtractionPlan, PostProcessingStep};

/// Well-known install locations, checked before falling back to `PATH`.
const KNOWN_PATHS: &[&str] = &[
    "/opt/homebrew/bin/yt-dlp",
    "/usr/local/bin/yt-dlp",
    "/usr/bin/yt-dlp",
];

pub struct YtDlp {
    binary: String,
}

impl YtDlp {
    /// Use an explicitly configured binary path.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }

    /// Locate the binary in well-known locations, falling back to `PATH`.
    pub fn discover() -> Self {
        let binary = KNOWN_PATHS
            .iter()
            .find(|p| Path::new(p).exists())
            .map(|p| p.to_string())
            .unwrap_or_else(|| "yt-dlp".to_string());
        Self { binary }
    }

    fn base_args(url: &str) -> Vec<String> {
        vec![
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            url.to_string(),
        ]
    }

    /// Translate a plan into yt-dlp flags.
    fn plan_args(plan: &ExtractionPlan, output_template: &Path) -> Vec<String> {
        let mut args = vec!["-f".to_string(), plan.format_selector.clone()];

        if let Some(container) = plan.merge_container {
            args.push("--merge-output-format".to_string());
            args.push(container.to_string());
        }

        for step in &plan.post_processing {
            match step {
                PostProcessingStep::ExtractAudio { codec, quality } => {
                    args.push("-x".to_string());
                    args.push("--audio-format".to_string());
                    args.push(codec.as_str().to_string());
                    args.push("--audio-quality".to_string());
                    args.push(quality.to_string());
                }
                PostProcessingStep::RemuxVideo { container } => {
                    args.push("--remux-video".to_string());
                    args.push(container.to_string());
                }
                PostProcessingStep::ConvertVideo { container } => {
                    args.push("--recode-video".to_string());
                    args.push(container.to_string());
                }
            }
        }

        if let Some(browser) = plan.cookies_from_browser {
            args.push("--cookies-from-browser".to_string());
            args.push(browser.to_string());
        }

        args.push("-o".to_string());
        args.push(output_template.to_string_lossy().into_owned());

        // Make the engine report the exact file it produced, after any
        // remux/convert step has renamed it.
        args.push("--no-simulate".to_string());
        args.push("--print".to_string());
        args.push("after_move:filepath".to_string());

        args
    }

    async fn run(&self, args: &[String]) -> Result<Output, EngineError> {
        debug!(binary = %self.binary, ?args, "invoking extraction engine");

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => EngineError::NotFound(self.binary.clone()),
                _ => EngineError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Extraction(stderr.trim().to_string()));
        }

        Ok(output)
    }
}

#[async_trait]
impl ExtractionEngine for YtDlp {
    async fn probe(&self, url: &str) -> Result<MediaInfo, EngineError> {
        let mut args = vec!["--dump-json".to_string()];
        args.extend(Self::base_args(url));

        let output = self.run(&args).await?;

        let json: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| EngineError::Parse(format!("invalid metadata JSON: {e}")))?;

        let title = json["title"]
            .as_str()
            .ok_or_else(|| EngineError::Parse("metadata has no title".to_string()))?
            .to_string();

        Ok(MediaInfo { title })
    }

    async fn download(
        &self,
        url: &str,
        plan: &ExtractionPlan,
        output_template: &Path,
    ) -> Result<EngineOutput, EngineError> {
        let mut args = Self::plan_args(plan, output_template);
        args.extend(Self::base_args(url));

        let output = self.run(&args).await?;

        // Stdout carries the printed filepath, one line per downloaded entry;
        // with --no-playlist that is a single line.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let path = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(PathBuf::from);

        let ext = path
            .as_ref()
            .and_then(|p| p.extension())
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(EngineOutput { ext, output_path: path })
    }
}
