//! Synthesis engine interface.
//!
//! The actual inference model is an external collaborator; the engine is a
//! single shared heavyweight resource reached through [`SynthesisEngine`],
//! an opaque blocking call with no partial-result contract. The orchestrator
//! owns the handle and never issues concurrent calls.

mod tone;

pub use tone::ToneEngine;

use serde::{Deserialize, Serialize};

use crate::error::SynthesisError;
use crate::voice::VoiceRef;

/// Raw decoded samples returned by the engine for one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Sampling parameters forwarded to the engine per call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling threshold.
    pub top_p: f32,
    /// Output-length cap, in model tokens.
    pub max_new_tokens: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self { temperature: 0.7, top_p: 0.9, max_new_tokens: 2048 }
    }
}

/// Blocking speech synthesis backend.
///
/// Implementations wrap the real inference model (or a stand-in). A call is
/// treated as opaque and of unbounded but finite duration; it is never
/// interrupted mid-flight.
pub trait SynthesisEngine: Send {
    /// Synthesize one segment of text with the given resolved voice.
    ///
    /// # Errors
    /// An opaque [`SynthesisError`] carrying whatever detail the backend
    /// provides.
    fn synthesize(
        &mut self,
        text: &str,
        voice: &VoiceRef,
        params: &GenerationParams,
    ) -> Result<AudioBuffer, SynthesisError>;

    /// Output sample rate of this engine.
    fn sample_rate(&self) -> u32;
}
