//! Voice identities: the built-in preset table, the persistent Voice
//! Library, and the resolver that binds speaker labels to concrete voices.

mod library;
mod presets;
mod resolver;

pub use library::{ProfileKind, VoiceLibrary, VoiceProfile};
pub use presets::{Preset, all_presets, get_preset};
pub use resolver::{assign_voice, assign_voices, resolve, resolve_annotated};

use serde::{Deserialize, Serialize};

/// Which backing model family a resolved voice runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceKind {
    /// Built-in speaker shipped with the synthesis model.
    Preset,
    /// Library voice cloned from reference audio.
    LibraryCloned,
    /// Library voice designed from a text description.
    LibraryDesigned,
}

/// Resolved voice identity attached to a segment before generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceRef {
    pub kind: VoiceKind,
    /// Preset speaker name or library voice name.
    pub id: String,
}

impl VoiceRef {
    pub fn preset(name: impl Into<String>) -> Self {
        Self { kind: VoiceKind::Preset, id: name.into() }
    }
}

impl std::fmt::Display for VoiceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            VoiceKind::Preset => write!(f, "{}", self.id),
            VoiceKind::LibraryCloned => write!(f, "{} (cloned)", self.id),
            VoiceKind::LibraryDesigned => write!(f, "{} (designed)", self.id),
        }
    }
}
