//! Sequential generation state machine.
//!
//! Drives a job's segments one at a time through the injected synthesis
//! engine. The engine is a single shared heavyweight resource, so at most
//! one synthesis call is ever in flight; sequential order also gives
//! cancellation a clean boundary between segments.

use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::{GenerationJob, JobStatus, ProgressEvent};
use crate::error::GenerationError;
use crate::synth::{GenerationParams, SynthesisEngine};
use crate::transcript::SegmentStatus;

/// Owns the synthesis engine handle and the per-call generation parameters.
pub struct Orchestrator<E> {
    engine: E,
    params: GenerationParams,
}

impl<E: SynthesisEngine> Orchestrator<E> {
    pub fn new(engine: E, params: GenerationParams) -> Self {
        Self { engine, params }
    }

    /// Run (or resume) a job to completion, cancellation, or failure.
    ///
    /// Starting a `Completed` job is a no-op returning the cached result.
    /// Starting a `Failed` or `Cancelled` job resumes at the first
    /// non-completed segment; completed segments are never regenerated.
    ///
    /// # Errors
    /// `GenerationError::UnresolvedVoice` before any work if a segment has
    /// no bound voice; `GenerationError::Synthesis` when the engine fails,
    /// leaving the job `Failed` with all prior completions intact.
    pub fn start(&mut self, job: &mut GenerationJob) -> Result<JobStatus, GenerationError> {
        if job.status == JobStatus::Completed {
            debug!("Job already completed, returning cached result");
            return Ok(JobStatus::Completed);
        }

        // Every segment must carry a resolved voice before any engine call.
        if let Some(seg) = job.segments.iter().find(|s| s.voice.is_none()) {
            return Err(GenerationError::UnresolvedVoice { index: seg.index });
        }

        let total = job.segments.len();
        let resuming = job.completed > 0;
        if resuming {
            info!("Resuming narration: {}/{} segments already completed", job.completed, total);
        } else {
            info!("Starting narration: {} segments", total);
        }

        job.cancel.store(false, Ordering::SeqCst);
        job.status = JobStatus::Running;
        let started = Instant::now();

        for i in 0..total {
            if job.segments[i].status == SegmentStatus::Completed {
                continue;
            }

            // Cooperative cancellation, checked only between segments.
            if job.cancel.load(Ordering::SeqCst) {
                info!("Narration cancelled at segment {}/{}", i + 1, total);
                job.status = JobStatus::Cancelled;
                return Ok(JobStatus::Cancelled);
            }

            let (text, voice) = {
                let seg = &mut job.segments[i];
                if seg.status == SegmentStatus::Failed {
                    seg.status = SegmentStatus::Pending;
                    seg.error = None;
                }
                seg.status = SegmentStatus::Generating;
                let Some(voice) = seg.voice.clone() else {
                    return Err(GenerationError::UnresolvedVoice { index: i });
                };
                (seg.text.clone(), voice)
            };

            debug!("Synthesizing segment {}/{} with voice {}", i + 1, total, voice);

            match self.engine.synthesize(&text, &voice, &self.params) {
                Ok(audio) => {
                    debug!("Segment {} completed ({} samples)", i, audio.len());
                    let seg = &mut job.segments[i];
                    seg.audio = Some(audio);
                    seg.status = SegmentStatus::Completed;
                    job.completed += 1;
                    job.emit(ProgressEvent {
                        index: i,
                        completed: job.completed,
                        total,
                        elapsed: started.elapsed(),
                    });
                }
                Err(e) => {
                    // No automatic retry: the engine's failure mode is
                    // opaque at this layer. Completed segments stay intact
                    // for inspection or resumption.
                    warn!("Segment {}/{} failed: {}", i + 1, total, e);
                    let seg = &mut job.segments[i];
                    seg.status = SegmentStatus::Failed;
                    seg.error = Some(e.to_string());
                    job.status = JobStatus::Failed;
                    return Err(GenerationError::Synthesis { index: i, source: e });
                }
            }
        }

        info!("Narration completed: {} segments in {:.1?}", total, started.elapsed());
        job.status = JobStatus::Completed;
        Ok(JobStatus::Completed)
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthesisError;
    use crate::synth::AudioBuffer;
    use crate::transcript::{Mode, parse};
    use crate::voice::{VoiceRef, assign_voice};

    /// Scripted engine: fails on chosen call indices, counts invocations.
    struct ScriptedEngine {
        calls: usize,
        fail_on: Vec<usize>,
    }

    impl ScriptedEngine {
        fn new(fail_on: Vec<usize>) -> Self {
            Self { calls: 0, fail_on }
        }
    }

    impl SynthesisEngine for ScriptedEngine {
        fn synthesize(
            &mut self,
            text: &str,
            _voice: &VoiceRef,
            _params: &GenerationParams,
        ) -> Result<AudioBuffer, SynthesisError> {
            let call = self.calls;
            self.calls += 1;
            if self.fail_on.contains(&call) {
                return Err(SynthesisError::new("device fault"));
            }
            Ok(AudioBuffer::new(vec![0.1; text.len()], 24_000))
        }

        fn sample_rate(&self) -> u32 {
            24_000
        }
    }

    fn job_with(n: usize) -> GenerationJob {
        let text: String = (0..n).map(|i| format!("Sentence {i}. ")).collect();
        let mut segments = parse(&text, Mode::Single).unwrap();
        assert_eq!(segments.len(), n);
        assign_voice(&mut segments, VoiceRef::preset("Ryan"));
        GenerationJob::new(segments)
    }

    #[test]
    fn completes_all_segments_in_order() {
        let mut orch = Orchestrator::new(ScriptedEngine::new(vec![]), GenerationParams::default());
        let mut job = job_with(3);
        let mut progress = job.subscribe();

        let status = orch.start(&mut job).unwrap();
        assert_eq!(status, JobStatus::Completed);
        assert_eq!(job.completed_count(), 3);
        assert!(job.segments().iter().all(|s| s.status == SegmentStatus::Completed));

        let events: Vec<ProgressEvent> = std::iter::from_fn(|| progress.try_recv().ok()).collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events.iter().map(|e| e.index).collect::<Vec<_>>(), [0, 1, 2]);
        assert!(events.windows(2).all(|w| w[0].completed < w[1].completed));
    }

    #[test]
    fn rejects_unresolved_voice_before_any_work() {
        let segments = parse("One. Two.", Mode::Manual).unwrap();
        let mut job = GenerationJob::new(segments);
        let mut orch = Orchestrator::new(ScriptedEngine::new(vec![]), GenerationParams::default());

        let err = orch.start(&mut job).unwrap_err();
        assert!(matches!(err, GenerationError::UnresolvedVoice { index: 0 }));
        assert_eq!(job.status(), JobStatus::Idle);
        assert!(job.segments().iter().all(|s| s.status == SegmentStatus::Pending));
    }

    #[test]
    fn failure_halts_and_preserves_prior_completions() {
        let mut orch = Orchestrator::new(ScriptedEngine::new(vec![2]), GenerationParams::default());
        let mut job = job_with(4);

        let err = orch.start(&mut job).unwrap_err();
        assert!(matches!(err, GenerationError::Synthesis { index: 2, .. }));
        assert_eq!(job.status(), JobStatus::Failed);

        let statuses = job.segment_statuses();
        assert_eq!(statuses[0], SegmentStatus::Completed);
        assert_eq!(statuses[1], SegmentStatus::Completed);
        assert_eq!(statuses[2], SegmentStatus::Failed);
        assert_eq!(statuses[3], SegmentStatus::Pending);
        assert!(job.segments()[2].error.as_deref().unwrap().contains("device fault"));
    }

    #[test]
    fn resume_after_failure_skips_completed_segments() {
        // Fails on the third engine call, succeeds afterwards.
        let engine = ScriptedEngine::new(vec![2]);
        let mut orch = Orchestrator::new(engine, GenerationParams::default());
        let mut job = job_with(4);

        assert!(orch.start(&mut job).is_err());
        let status = orch.start(&mut job).unwrap();
        assert_eq!(status, JobStatus::Completed);
        assert!(job.segments().iter().all(|s| s.status == SegmentStatus::Completed));
        assert_eq!(job.completed_count(), 4);
        // 4 successes + 1 failure; segments 0 and 1 were never regenerated.
        assert_eq!(orch.engine.calls, 5);
    }

    #[test]
    fn cancellation_at_segment_boundary() {
        let mut orch = Orchestrator::new(ScriptedEngine::new(vec![]), GenerationParams::default());
        let mut job = job_with(5);

        // Flag raised mid-run: cancel after the second completion by
        // subscribing and flipping the flag from the progress stream.
        let flag = job.cancel_flag();
        let mut progress = job.subscribe();
        struct CancelAfter {
            inner: ScriptedEngine,
            flag: std::sync::Arc<std::sync::atomic::AtomicBool>,
            after: usize,
        }
        impl SynthesisEngine for CancelAfter {
            fn synthesize(
                &mut self,
                text: &str,
                voice: &VoiceRef,
                params: &GenerationParams,
            ) -> Result<AudioBuffer, SynthesisError> {
                let out = self.inner.synthesize(text, voice, params)?;
                if self.inner.calls == self.after {
                    self.flag.store(true, Ordering::SeqCst);
                }
                Ok(out)
            }
            fn sample_rate(&self) -> u32 {
                self.inner.sample_rate()
            }
        }

        let mut orch2 = Orchestrator::new(
            CancelAfter { inner: ScriptedEngine::new(vec![]), flag, after: 2 },
            GenerationParams::default(),
        );
        let status = orch2.start(&mut job).unwrap();
        assert_eq!(status, JobStatus::Cancelled);

        let statuses = job.segment_statuses();
        assert_eq!(&statuses[..2], &[SegmentStatus::Completed, SegmentStatus::Completed]);
        assert!(statuses[2..].iter().all(|s| *s == SegmentStatus::Pending));
        assert_eq!(job.completed_count(), 2);

        // Resume finishes the remainder without regenerating 0..2.
        let status = orch.start(&mut job).unwrap();
        assert_eq!(status, JobStatus::Completed);
        assert_eq!(orch.engine.calls, 3);
        drop(progress);
    }

    #[test]
    fn completed_job_start_is_a_cached_no_op() {
        let mut orch = Orchestrator::new(ScriptedEngine::new(vec![]), GenerationParams::default());
        let mut job = job_with(2);

        orch.start(&mut job).unwrap();
        let audio_before: Vec<_> =
            job.segments().iter().map(|s| s.audio.clone().unwrap()).collect();

        let status = orch.start(&mut job).unwrap();
        assert_eq!(status, JobStatus::Completed);
        // No second engine invocation, identical buffers.
        assert_eq!(orch.engine.calls, 2);
        let audio_after: Vec<_> = job.segments().iter().map(|s| s.audio.clone().unwrap()).collect();
        assert_eq!(audio_before, audio_after);
    }
}
