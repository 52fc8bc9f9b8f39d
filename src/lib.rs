pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod utils;

pub use self::core::{
    DownloadRequest, DownloadResult, ExtractionPlan, MediaFormat, Orchestrator, Platform,
    Resolution,
};
pub use engine::{ExtractionEngine, YtDlp};
