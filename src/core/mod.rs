pub mod orchestrator;
pub mod plan;
pub mod platform;

pub use orchestrator::{DownloadRequest, DownloadResult, Orchestrator};
pub use plan::{ExtractionPlan, MediaFormat, PostProcessingStep, Resolution};
pub use platform::Platform;
