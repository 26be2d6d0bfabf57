//! Segment data model.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::synth::AudioBuffer;
use crate::voice::VoiceRef;

/// Transcript parsing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Sentence-split text, one voice for the whole narration.
    Single,
    /// Sentence-split text, a caller-supplied voice per segment.
    Manual,
    /// Line-oriented `[Speaker]` grammar with automatic resolution.
    Annotated,
}

/// Lifecycle of a single segment. Transitions are monotonic within a run:
/// `Pending -> Generating -> Completed | Failed`. A resume resets `Failed`
/// back to `Pending` before regenerating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentStatus {
    Pending,
    Generating,
    Completed,
    Failed,
}

/// One unit of transcript text bound to one voice for synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Position in the transcript. Unique and contiguous from zero.
    pub index: usize,
    /// The text to synthesize.
    pub text: String,
    /// Speaker label from an annotated transcript, if any.
    pub speaker: Option<String>,
    /// Resolved voice identity. Absent until resolution; `start` rejects
    /// jobs containing unbound segments.
    pub voice: Option<VoiceRef>,
    pub status: SegmentStatus,
    /// Audio returned by the engine once the segment completes.
    pub audio: Option<AudioBuffer>,
    /// Engine error detail recorded when the segment fails.
    pub error: Option<String>,
}

impl Segment {
    pub(crate) fn new(index: usize, text: impl Into<String>, speaker: Option<String>) -> Self {
        Self {
            index,
            text: text.into(),
            speaker,
            voice: None,
            status: SegmentStatus::Pending,
            audio: None,
            error: None,
        }
    }

    /// One-line preview for listings: `[Speaker] text…`, truncated to
    /// `max_len` characters of text.
    pub fn preview(&self, max_len: usize) -> String {
        let mut text: String = self.text.chars().take(max_len).collect();
        if self.text.chars().count() > max_len {
            text.push('…');
        }
        match &self.speaker {
            Some(speaker) => format!("[{}] {}", speaker, text),
            None => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_and_prefixes_speaker() {
        let seg = Segment::new(0, "hello there, narrator", Some("Ryan".to_string()));
        assert_eq!(seg.preview(5), "[Ryan] hello…");

        let unnamed = Segment::new(1, "short", None);
        assert_eq!(unnamed.preview(80), "short");
    }
}
