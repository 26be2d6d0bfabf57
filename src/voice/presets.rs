//! Built-in preset speakers.
//!
//! These are the speakers shipped with the synthesis model's custom-voice
//! variant. Only the fields the engine needs are kept (name, description,
//! language); they exist so the resolver and the CLI can list and match
//! them without touching the model.

/// Metadata for one built-in speaker.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub language: &'static str,
}

/// All presets as a compile-time constant slice (sorted by name for binary
/// search).
const PRESETS: &[Preset] = &[
    Preset { name: "Aiden", description: "Sunny American male voice with a clear midrange", language: "English" },
    Preset { name: "Dylan", description: "Youthful Beijing male voice with a clear, natural timbre", language: "Chinese (Beijing)" },
    Preset { name: "Eric", description: "Lively Chengdu male voice with a slightly husky brightness", language: "Chinese (Sichuan)" },
    Preset { name: "Ono_Anna", description: "Playful Japanese female voice with a light, nimble timbre", language: "Japanese" },
    Preset { name: "Ryan", description: "Dynamic male voice with strong rhythmic drive", language: "English" },
    Preset { name: "Serena", description: "Warm, gentle young female voice", language: "Chinese" },
    Preset { name: "Sohee", description: "Warm Korean female voice with rich emotion", language: "Korean" },
    Preset { name: "Uncle_Fu", description: "Seasoned male voice with a low, mellow timbre", language: "Chinese" },
    Preset { name: "Vivian", description: "Bright, slightly edgy young female voice", language: "Chinese" },
];

/// Look up a preset by exact, case-sensitive name using binary search.
pub fn get_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.binary_search_by_key(&name, |p| p.name).ok().map(|idx| &PRESETS[idx])
}

/// All built-in presets, sorted by name.
pub fn all_presets() -> &'static [Preset] {
    PRESETS
}
