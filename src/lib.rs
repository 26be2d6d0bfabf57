//! Multi-voice narration engine.
//!
//! Turns a raw transcript plus a mode selector into an ordered sequence of
//! speech-synthesis jobs against a single shared inference engine, tracks
//! per-segment progress, supports cooperative cancellation and resumption
//! after partial failure, and deterministically reassembles the results
//! into one continuous audio artifact.
//!
//! Pipeline: transcript + mode -> [`transcript::parse`] -> ordered segments
//! -> [`voice`] resolution -> [`narration::Orchestrator`] drives the
//! injected [`synth::SynthesisEngine`] -> [`narration::merge_job`] -> final
//! artifact.

pub mod config;
pub mod error;
pub mod narration;
pub mod synth;
pub mod transcript;
pub mod voice;

pub use error::{
    GenerationError, LibraryError, MergeError, ParseError, SynthesisError, UnresolvedSpeakerError,
};
pub use narration::{GenerationJob, JobStatus, Orchestrator, ProgressEvent, merge_job};
pub use synth::{AudioBuffer, GenerationParams, SynthesisEngine, ToneEngine};
pub use transcript::{Mode, Segment, SegmentStatus, parse};
pub use voice::{ProfileKind, VoiceKind, VoiceLibrary, VoiceProfile, VoiceRef};
