//! The training loop and its observable output: episode records, rolling
//! metrics, and the end-of-run summary.

pub mod episode;
pub mod metrics;
pub mod trainer;

pub use episode::{EpisodeRecord, RunReport, TraceStep};
pub use metrics::{RunSummary, TrainingMetrics};
pub use trainer::{Trainer, TrainerConfig};
