//! Narration generation: the job state machine, the sequential
//! orchestrator, and ordered segment merging.

mod job;
mod merger;
mod orchestrator;

pub use job::{GenerationJob, JobStatus, ProgressEvent};
pub use merger::{SegmentBuffer, merge_job};
pub use orchestrator::Orchestrator;
