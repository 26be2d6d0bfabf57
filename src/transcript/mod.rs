//! Transcript parsing into ordered narration segments.
//!
//! The parser turns raw UTF-8 text plus a mode selector into the ordered
//! segment list that the rest of the engine operates on. Segment order is
//! fixed here and is canonical for both generation and merge.

mod parser;
mod segment;

pub use parser::{TranscriptStats, detect_speakers, parse, stats};
pub use segment::{Mode, Segment, SegmentStatus};
