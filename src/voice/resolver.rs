//! Speaker-to-voice resolution.
//!
//! Binds speaker labels (or explicit caller choices) to concrete
//! [`VoiceRef`]s before any generation work starts. Matching is exact and
//! case-sensitive: presets first, then the Voice Library.

use std::collections::HashMap;

use tracing::debug;

use super::{ProfileKind, VoiceKind, VoiceLibrary, VoiceRef, get_preset};
use crate::error::UnresolvedSpeakerError;
use crate::transcript::{Segment, detect_speakers};

/// Resolve a single speaker label against presets, then the library.
///
/// # Errors
/// `UnresolvedSpeakerError` naming the label when nothing matches.
pub fn resolve(label: &str, library: &VoiceLibrary) -> Result<VoiceRef, UnresolvedSpeakerError> {
    if get_preset(label).is_some() {
        return Ok(VoiceRef::preset(label));
    }

    if let Some(profile) = library.lookup(label) {
        let kind = match profile.kind {
            ProfileKind::Cloned => VoiceKind::LibraryCloned,
            ProfileKind::Designed => VoiceKind::LibraryDesigned,
        };
        return Ok(VoiceRef { kind, id: profile.name });
    }

    Err(UnresolvedSpeakerError { label: label.to_string() })
}

/// Resolve every detected speaker of an annotated transcript and bind the
/// result to each segment. Resolution is all-or-nothing: if any speaker is
/// unknown, no segment is touched.
///
/// # Errors
/// `UnresolvedSpeakerError` naming the first unknown speaker in appearance
/// order.
pub fn resolve_annotated(
    segments: &mut [Segment],
    library: &VoiceLibrary,
) -> Result<(), UnresolvedSpeakerError> {
    let speakers = detect_speakers(segments);
    debug!("Resolving {} distinct speakers", speakers.len());

    let mut resolved: HashMap<String, VoiceRef> = HashMap::new();
    for label in &speakers {
        resolved.insert(label.clone(), resolve(label, library)?);
    }

    for seg in segments.iter_mut() {
        if let Some(speaker) = &seg.speaker {
            seg.voice = resolved.get(speaker).cloned();
        }
    }

    Ok(())
}

/// Bind one explicit voice choice to every segment (`single` mode).
pub fn assign_voice(segments: &mut [Segment], voice: VoiceRef) {
    for seg in segments.iter_mut() {
        seg.voice = Some(voice.clone());
    }
}

/// Bind per-segment explicit choices by index (`manual` mode). Indices
/// absent from the map are left unbound; the orchestrator rejects such jobs
/// at start.
pub fn assign_voices(segments: &mut [Segment], choices: &HashMap<usize, VoiceRef>) {
    for seg in segments.iter_mut() {
        if let Some(voice) = choices.get(&seg.index) {
            seg.voice = Some(voice.clone());
        }
    }
}
