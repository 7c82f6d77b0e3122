pub mod pipeline;
pub mod config;
pub mod sources;
pub mod sinks;
pub mod transform;
pub mod observability;
pub mod sample_data;

pub use pipeline::{Pipeline, PipelineError, RunOutcome};
