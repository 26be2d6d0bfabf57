//! Ordered segment assembly.
//!
//! Buffers may arrive in any order (a multi-engine deployment could fill
//! them in parallel), but assembly is always ascending by segment index.
//! Boundaries are hard cuts: no silence or crossfade is inserted, so the
//! merged length equals the exact sum of the segment lengths.

use std::collections::BTreeMap;

use tracing::debug;

use super::GenerationJob;
use crate::error::MergeError;
use crate::synth::AudioBuffer;
use crate::transcript::SegmentStatus;

/// Collects per-segment audio keyed by index until all `total` slots are
/// filled.
pub struct SegmentBuffer {
    buffers: BTreeMap<usize, AudioBuffer>,
    total: usize,
}

impl SegmentBuffer {
    pub fn new(total: usize) -> Self {
        Self { buffers: BTreeMap::new(), total }
    }

    /// Store one segment's audio. Re-appending an index replaces the
    /// previous buffer.
    pub fn append(&mut self, index: usize, audio: AudioBuffer) {
        debug_assert!(index < self.total, "segment index {index} out of range");
        self.buffers.insert(index, audio);
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Concatenate all buffers ascending by index into one stream.
    ///
    /// # Errors
    /// `MergeError::IncompleteJob` for the first missing index;
    /// `MergeError::SampleRateMismatch` if buffers disagree on rate.
    pub fn merge(self) -> Result<AudioBuffer, MergeError> {
        for index in 0..self.total {
            if !self.buffers.contains_key(&index) {
                return Err(MergeError::IncompleteJob { index, status: SegmentStatus::Pending });
            }
        }

        let sample_rate = self.buffers.values().next().map(|b| b.sample_rate).unwrap_or(0);
        let mut samples = Vec::with_capacity(self.buffers.values().map(AudioBuffer::len).sum());

        // BTreeMap iteration is ascending by index.
        for (index, buffer) in &self.buffers {
            if buffer.sample_rate != sample_rate {
                return Err(MergeError::SampleRateMismatch {
                    index: *index,
                    expected: sample_rate,
                    got: buffer.sample_rate,
                });
            }
            samples.extend_from_slice(&buffer.samples);
        }

        debug!("Merged {} segments into {} samples", self.total, samples.len());
        Ok(AudioBuffer::new(samples, sample_rate))
    }
}

/// Merge a job's completed segments into the final continuous artifact.
///
/// # Errors
/// `MergeError::IncompleteJob` naming the first segment that is not
/// `Completed`.
pub fn merge_job(job: &GenerationJob) -> Result<AudioBuffer, MergeError> {
    let mut buffer = SegmentBuffer::new(job.total());

    for seg in job.segments() {
        match (&seg.status, &seg.audio) {
            (SegmentStatus::Completed, Some(audio)) => buffer.append(seg.index, audio.clone()),
            _ => return Err(MergeError::IncompleteJob { index: seg.index, status: seg.status }),
        }
    }

    buffer.merge()
}
