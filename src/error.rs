//! Error types for the narration engine.
//!
//! Each failure domain gets its own enum so callers can match on exactly the
//! cases they can act on. Every variant carries the offending segment index
//! or speaker label where one exists.

use thiserror::Error;

use crate::transcript::SegmentStatus;

/// Transcript parsing failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input contained no text (or only whitespace).
    #[error("transcript is empty")]
    EmptyTranscript,

    /// Annotated mode requires at least one `[Speaker]` tag.
    #[error("annotated transcript contains no [Speaker] tags")]
    NoSpeakerTags,

    /// An untagged line appeared before the first `[Speaker]` tag, so there
    /// is no speaker for it to inherit.
    #[error("line {line} appears before the first [Speaker] tag")]
    MissingLeadingTag { line: usize },
}

/// A named speaker matched neither a preset nor a Voice Library entry.
/// Matching is exact and case-sensitive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no preset or library voice matches speaker \"{label}\"")]
pub struct UnresolvedSpeakerError {
    pub label: String,
}

/// Voice Library Store failures.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("a voice named \"{0}\" already exists")]
    DuplicateName(String),

    #[error("no voice named \"{0}\"")]
    NotFound(String),

    #[error("voice library I/O failed")]
    Io(#[from] std::io::Error),

    #[error("voice library index is malformed")]
    Format(#[from] serde_json::Error),
}

/// Opaque failure reported by the synthesis engine. The engine's failure
/// mode is not interpreted at this layer; the detail string is preserved
/// for the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("synthesis failed: {detail}")]
pub struct SynthesisError {
    pub detail: String,
}

impl SynthesisError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }
}

/// Failures while driving a generation job.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// `start` rejects any job with an unbound segment; no work is done.
    #[error("segment {index} has no resolved voice")]
    UnresolvedVoice { index: usize },

    /// The engine failed on one segment. Processing stopped there; earlier
    /// completed segments are preserved on the job.
    #[error("segment {index} failed to synthesize")]
    Synthesis {
        index: usize,
        #[source]
        source: SynthesisError,
    },
}

/// Failures while assembling the final artifact.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// Merge was requested before every segment completed.
    #[error("segment {index} is {status:?}, not Completed")]
    IncompleteJob { index: usize, status: SegmentStatus },

    /// Segment buffers disagree on sample rate; the merged artifact must
    /// have a single fixed rate.
    #[error("segment {index} sample rate {got} Hz differs from {expected} Hz")]
    SampleRateMismatch { index: usize, expected: u32, got: u32 },
}
