use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration. Everything comes from the environment with sane
/// defaults; CLI flags override on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub output_dir: PathBuf,
    pub bind_address: String,
    pub port: u16,
    /// Origins allowed to call the API cross-origin.
    pub allowed_origins: Vec<String>,
    /// Explicit extraction engine binary; discovered on PATH when unset.
    pub ytdlp_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("downloads"),
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            ytdlp_path: None,
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Supported variables: `ALLOWED_ORIGINS` (comma-separated),
    /// `MEDIAGRAB_OUTPUT_DIR`, `MEDIAGRAB_PORT`, `MEDIAGRAB_YTDLP`.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
            let parsed: Vec<String> = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !parsed.is_empty() {
                config.allowed_origins = parsed;
            }
        }

        if let Ok(dir) = std::env::var("MEDIAGRAB_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                config.output_dir = PathBuf::from(dir);
            }
        }

        if let Ok(port) = std::env::var("MEDIAGRAB_PORT") {
            if let Ok(parsed) = port.parse::<u16>() {
                config.port = parsed;
            }
        }

        if let Ok(path) = std::env::var("MEDIAGRAB_YTDLP") {
            if !path.trim().is_empty() {
                config.ytdlp_path = Some(path);
            }
        }

        config
    }
}
