use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api;
use crate::config::Config;
use crate::core::{DownloadRequest, MediaFormat, Orchestrator, Resolution};
use crate::engine::YtDlp;

#[derive(Parser)]
#[command(name = "mediagrab")]
#[command(about = "Download media from popular platforms via an external extraction engine")]
#[command(version)]
pub struct Cli {
    /// URL to download
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Run the HTTP API server instead of a one-shot download
    #[arg(long)]
    pub serve: bool,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "mp4")]
    pub format: MediaFormat,

    /// Resolution tier (best, 2160, 1440, 1080, 720, 480, 360, 240, 144)
    #[arg(short, long, default_value = "best")]
    pub resolution: Resolution,

    /// Port for the API server
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        let mut config = Config::load();
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }

        let engine = match &config.ytdlp_path {
            Some(path) => YtDlp::with_binary(path),
            None => YtDlp::discover(),
        };
        let orchestrator = Arc::new(Orchestrator::new(Arc::new(engine), config.output_dir.clone()));

        if self.serve {
            return api::serve(&config, orchestrator).await;
        }

        let Some(url) = &self.url else {
            println!("Usage: mediagrab <URL>");
            return Ok(());
        };

        println!("Downloading: {url}");
        println!("Output directory: {}", config.output_dir.display());
        println!("Format: {}", self.format);

        let request = DownloadRequest {
            url: url.clone(),
            format: self.format,
            resolution: self.resolution,
        };

        let result = orchestrator.handle(&request).await?;

        println!("Title: {}", result.title);
        println!("Platform: {}", result.platform);
        println!("Saved to: {}", result.file_path.display());

        Ok(())
    }
}
