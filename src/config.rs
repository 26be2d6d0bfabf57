//! CLI configuration and argument parsing.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::synth::GenerationParams;
use crate::transcript::Mode;
use crate::voice::ProfileKind;

/// Narration engine command-line interface.
#[derive(Parser, Debug)]
#[command(name = "narravox")]
#[command(author, version, about = "Multi-voice narration engine", long_about = None)]
pub struct Cli {
    /// Path to the voice library index file
    #[arg(long, env = "NARRAVOX_LIBRARY", default_value_os_t = default_library_path())]
    pub library: PathBuf,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a transcript and show segments, detected speakers, and stats
    Parse {
        /// Transcript file (UTF-8 text)
        file: PathBuf,

        /// Parsing mode
        #[arg(long, value_enum, default_value = "annotated")]
        mode: Mode,
    },

    /// List preset voices and library profiles
    Voices {
        /// Case-insensitive name filter for library voices
        #[arg(long, default_value = "")]
        query: String,

        /// Filter library voices by tag (repeatable)
        #[arg(long)]
        tag: Vec<String>,

        /// Filter library voices by kind
        #[arg(long, value_enum)]
        kind: Option<ProfileKind>,
    },

    /// Register a voice profile in the library
    Register {
        /// Unique, case-sensitive voice name
        name: String,

        #[arg(long, value_enum)]
        kind: ProfileKind,

        /// Path to the serialized prompt or reference recording
        #[arg(long)]
        artifact: PathBuf,

        /// Tags for categorization (repeatable)
        #[arg(long)]
        tag: Vec<String>,
    },

    /// Remove a voice and delete its artifact irreversibly
    Remove { name: String },

    /// Narrate a transcript and write the merged WAV artifact
    Narrate(NarrateArgs),
}

#[derive(Args, Debug)]
pub struct NarrateArgs {
    /// Transcript file (UTF-8 text)
    pub file: PathBuf,

    /// Parsing mode
    #[arg(long, value_enum, default_value = "annotated")]
    pub mode: Mode,

    /// Voice for single mode (preset or library name)
    #[arg(long)]
    pub voice: Option<String>,

    /// Per-segment assignment for manual mode, as INDEX=NAME (repeatable)
    #[arg(long = "assign", value_parser = parse_assignment)]
    pub assignments: Vec<(usize, String)>,

    /// Output WAV path
    #[arg(long, short = 'o', default_value = "narration.wav")]
    pub out: PathBuf,

    /// Also write one WAV per completed segment next to the merged artifact
    #[arg(long)]
    pub keep_segments: bool,

    /// Sampling temperature (0.0-2.0)
    #[arg(long, default_value = "0.7", value_parser = parse_temperature)]
    pub temperature: f32,

    /// Nucleus sampling threshold (0.0-1.0)
    #[arg(long, default_value = "0.9")]
    pub top_p: f32,

    /// Output-length cap in model tokens
    #[arg(long, default_value = "2048")]
    pub max_new_tokens: usize,
}

impl NarrateArgs {
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.temperature,
            top_p: self.top_p,
            max_new_tokens: self.max_new_tokens,
        }
    }

    /// Validate argument combinations before doing any work.
    pub fn validate(&self) -> Result<()> {
        if self.mode == Mode::Single && self.voice.is_none() {
            anyhow::bail!("--voice is required in single mode");
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            anyhow::bail!("top-p must be between 0.0 and 1.0");
        }
        Ok(())
    }
}

/// Parse one `INDEX=NAME` manual assignment.
fn parse_assignment(s: &str) -> Result<(usize, String), String> {
    let (index, name) = s.split_once('=').ok_or_else(|| format!("'{}' is not INDEX=NAME", s))?;
    let index = index.parse().map_err(|_| format!("'{}' is not a valid segment index", index))?;
    if name.is_empty() {
        return Err(format!("'{}' has an empty voice name", s));
    }
    Ok((index, name.to_string()))
}

/// Parse and validate temperature value (0.0-2.0).
fn parse_temperature(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|_| format!("'{}' is not a valid float", s))?;
    if (0.0..=2.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("temperature must be between 0.0 and 2.0, got {}", value))
    }
}

/// Default library index (~/.narravox/library.json).
fn default_library_path() -> PathBuf {
    if let Some(home_dir) = dirs::home_dir() {
        home_dir.join(".narravox").join("library.json")
    } else {
        PathBuf::from("library.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_parsing() {
        assert_eq!(parse_assignment("3=Ryan").unwrap(), (3, "Ryan".to_string()));
        assert!(parse_assignment("Ryan").is_err());
        assert!(parse_assignment("x=Ryan").is_err());
        assert!(parse_assignment("3=").is_err());
    }
}
