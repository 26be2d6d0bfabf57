//! Generation job: ordered segments, aggregate status, cancellation flag,
//! and progress fan-out.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::transcript::{Segment, SegmentStatus};

/// Aggregate lifecycle of a narration run.
///
/// `Idle -> Running -> Completed | Cancelled | Failed`. A `Failed` or
/// `Cancelled` job may be handed to `start` again, which resumes at the
/// first non-completed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// Progress notification emitted after each completed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Index of the segment that just completed.
    pub index: usize,
    /// Monotonic count of completed segments.
    pub completed: usize,
    pub total: usize,
    /// Time since this `start` call began.
    pub elapsed: Duration,
}

/// One end-to-end narration run over an ordered segment sequence.
///
/// The job carries no UI dependency: consumers observe it through
/// [`GenerationJob::subscribe`] or by polling [`GenerationJob::completed_count`].
pub struct GenerationJob {
    pub(crate) segments: Vec<Segment>,
    pub(crate) status: JobStatus,
    pub(crate) cancel: Arc<AtomicBool>,
    pub(crate) completed: usize,
    subscribers: Vec<mpsc::UnboundedSender<ProgressEvent>>,
}

impl GenerationJob {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            status: JobStatus::Idle,
            cancel: Arc::new(AtomicBool::new(false)),
            completed: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn total(&self) -> usize {
        self.segments.len()
    }

    /// Monotonic completed-segment count, safe to poll from any thread that
    /// holds the job.
    pub fn completed_count(&self) -> usize {
        self.completed
    }

    /// Request cooperative cancellation. The flag is honored at the next
    /// segment boundary; an in-flight synthesis call is never interrupted.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Shareable handle to the cancellation flag, for signal handlers or
    /// control paths running on another worker.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Subscribe to progress events. Any number of consumers may subscribe;
    /// disconnected receivers are dropped silently on the next emit.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ProgressEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub(crate) fn emit(&mut self, event: ProgressEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    /// Indices and statuses, handy for reporting.
    pub fn segment_statuses(&self) -> Vec<SegmentStatus> {
        self.segments.iter().map(|s| s.status).collect()
    }
}
