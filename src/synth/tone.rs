//! Deterministic offline engine for pipeline checks.
//!
//! Renders each segment as a short sine tone whose pitch is derived from the
//! voice identity and whose length tracks the text length. Useful for
//! exercising the whole parse/resolve/generate/merge path without a model,
//! and as the engine behind the CLI's dry-run narration.

use std::f32::consts::TAU;
use std::hash::{DefaultHasher, Hash, Hasher};

use tracing::debug;

use super::{AudioBuffer, GenerationParams, SynthesisEngine};
use crate::error::SynthesisError;
use crate::voice::VoiceRef;

const SAMPLE_RATE: u32 = 24_000;
/// Samples rendered per character of input text (~40 ms at 24 kHz).
const SAMPLES_PER_CHAR: usize = 960;

/// Sine-tone stand-in for the real synthesis model.
pub struct ToneEngine {
    sample_rate: u32,
}

impl ToneEngine {
    pub fn new() -> Self {
        Self { sample_rate: SAMPLE_RATE }
    }

    /// Pitch for a voice, stable across calls: each voice id maps onto one
    /// of twelve steps above 180 Hz.
    fn pitch(voice: &VoiceRef) -> f32 {
        let mut hasher = DefaultHasher::new();
        voice.id.hash(&mut hasher);
        180.0 + (hasher.finish() % 12) as f32 * 30.0
    }
}

impl Default for ToneEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SynthesisEngine for ToneEngine {
    fn synthesize(
        &mut self,
        text: &str,
        voice: &VoiceRef,
        _params: &GenerationParams,
    ) -> Result<AudioBuffer, SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::new("empty segment text"));
        }

        let freq = Self::pitch(voice);
        let len = text.chars().count() * SAMPLES_PER_CHAR;
        debug!("Rendering {} samples at {:.0} Hz for voice {}", len, freq, voice);

        let samples = (0..len)
            .map(|i| 0.2 * (TAU * freq * i as f32 / self.sample_rate as f32).sin())
            .collect();

        Ok(AudioBuffer::new(samples, self.sample_rate))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
