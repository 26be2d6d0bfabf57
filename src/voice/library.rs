//! Persistent Voice Library Store.
//!
//! A name-keyed registry of saved voice profiles backed by a JSON index
//! file, with each profile pointing at its synthesis artifact (a serialized
//! clone prompt or reference recording). Register/remove are serialized
//! behind one lock so concurrent calls on the same name cannot break the
//! uniqueness invariant; reads clone out of the lock.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::error::LibraryError;

/// How a saved voice was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// Cloned from reference audio.
    Cloned,
    /// Designed from a text description.
    Designed,
}

/// Persisted voice metadata plus a reference to its synthesis artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// Unique display name, case-sensitive.
    pub name: String,
    pub kind: ProfileKind,
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    /// Path to the serialized prompt or reference recording. Deleted
    /// irreversibly when the profile is removed.
    pub artifact: PathBuf,
}

impl VoiceProfile {
    pub fn new(
        name: impl Into<String>,
        kind: ProfileKind,
        tags: Vec<String>,
        artifact: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            tags,
            created: OffsetDateTime::now_utc(),
            artifact: artifact.into(),
        }
    }
}

/// Persistent registry of named voice profiles.
pub struct VoiceLibrary {
    index_path: PathBuf,
    profiles: Mutex<Vec<VoiceProfile>>,
}

impl VoiceLibrary {
    /// Open (or create) a library backed by the given JSON index file.
    ///
    /// # Errors
    /// Returns an error if the index exists but cannot be read or parsed.
    pub fn open(index_path: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let index_path = index_path.into();

        let profiles: Vec<VoiceProfile> = match fs::read_to_string(&index_path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!("Voice library loaded: {} profiles from {}", profiles.len(), index_path.display());
        Ok(Self { index_path, profiles: Mutex::new(profiles) })
    }

    /// Register a new profile.
    ///
    /// # Errors
    /// `LibraryError::DuplicateName` when a profile with the same
    /// (case-sensitive) name exists; I/O errors from persisting the index.
    pub fn register(&self, profile: VoiceProfile) -> Result<(), LibraryError> {
        let mut profiles = self.profiles.lock();

        if profiles.iter().any(|p| p.name == profile.name) {
            return Err(LibraryError::DuplicateName(profile.name));
        }

        info!("Registering {:?} voice \"{}\"", profile.kind, profile.name);
        profiles.push(profile);
        self.persist(&profiles)
    }

    /// Look up a profile by exact name.
    pub fn lookup(&self, name: &str) -> Option<VoiceProfile> {
        self.profiles.lock().iter().find(|p| p.name == name).cloned()
    }

    /// Remove a profile and delete its artifact irreversibly.
    ///
    /// # Errors
    /// `LibraryError::NotFound` when no profile has the given name.
    pub fn remove(&self, name: &str) -> Result<(), LibraryError> {
        let mut profiles = self.profiles.lock();

        let pos = profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| LibraryError::NotFound(name.to_string()))?;
        let removed = profiles.remove(pos);
        self.persist(&profiles)?;

        // An already-missing artifact is fine; anything else is reported
        // but the metadata removal stands.
        match fs::remove_file(&removed.artifact) {
            Ok(()) => debug!("Deleted artifact {}", removed.artifact.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Could not delete artifact {}: {}", removed.artifact.display(), e),
        }

        info!("Voice \"{}\" removed", name);
        Ok(())
    }

    /// All profiles, in registration order.
    pub fn list(&self) -> Vec<VoiceProfile> {
        self.profiles.lock().clone()
    }

    /// Filter profiles by case-insensitive name substring, tag overlap, and
    /// kind. Empty query and tag list match everything.
    pub fn search(&self, query: &str, tags: &[String], kind: Option<ProfileKind>) -> Vec<VoiceProfile> {
        let query = query.to_lowercase();
        self.profiles
            .lock()
            .iter()
            .filter(|p| query.is_empty() || p.name.to_lowercase().contains(&query))
            .filter(|p| tags.is_empty() || p.tags.iter().any(|t| tags.contains(t)))
            .filter(|p| kind.is_none_or(|k| p.kind == k))
            .cloned()
            .collect()
    }

    fn persist(&self, profiles: &[VoiceProfile]) -> Result<(), LibraryError> {
        if let Some(parent) = self.index_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(profiles)?;
        fs::write(&self.index_path, raw)?;
        debug!("Voice library saved ({} profiles)", profiles.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn profile(name: &str, kind: ProfileKind, dir: &Path) -> VoiceProfile {
        let artifact = dir.join(format!("{name}.bin"));
        fs::write(&artifact, b"prompt").unwrap();
        VoiceProfile::new(name, kind, vec!["test".to_string()], artifact)
    }

    #[test]
    fn register_then_lookup_roundtrips() {
        let dir = TempDir::new().unwrap();
        let lib = VoiceLibrary::open(dir.path().join("library.json")).unwrap();

        lib.register(profile("Narrator", ProfileKind::Cloned, dir.path())).unwrap();
        let found = lib.lookup("Narrator").unwrap();
        assert_eq!(found.kind, ProfileKind::Cloned);
        assert!(lib.lookup("narrator").is_none());
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let lib = VoiceLibrary::open(dir.path().join("library.json")).unwrap();

        lib.register(profile("Echo", ProfileKind::Designed, dir.path())).unwrap();
        let err = lib.register(profile("Echo", ProfileKind::Cloned, dir.path())).unwrap_err();
        assert!(matches!(err, LibraryError::DuplicateName(name) if name == "Echo"));
    }

    #[test]
    fn remove_deletes_metadata_and_artifact() {
        let dir = TempDir::new().unwrap();
        let lib = VoiceLibrary::open(dir.path().join("library.json")).unwrap();

        let p = profile("Ghost", ProfileKind::Cloned, dir.path());
        let artifact = p.artifact.clone();
        lib.register(p).unwrap();

        lib.remove("Ghost").unwrap();
        assert!(lib.lookup("Ghost").is_none());
        assert!(!artifact.exists());

        let err = lib.remove("Ghost").unwrap_err();
        assert!(matches!(err, LibraryError::NotFound(_)));
    }

    #[test]
    fn profiles_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let index = dir.path().join("library.json");

        {
            let lib = VoiceLibrary::open(&index).unwrap();
            lib.register(profile("Keeper", ProfileKind::Designed, dir.path())).unwrap();
        }

        let reopened = VoiceLibrary::open(&index).unwrap();
        assert_eq!(reopened.list().len(), 1);
        assert_eq!(reopened.lookup("Keeper").unwrap().kind, ProfileKind::Designed);
    }

    #[test]
    fn search_filters_by_query_tags_and_kind() {
        let dir = TempDir::new().unwrap();
        let lib = VoiceLibrary::open(dir.path().join("library.json")).unwrap();

        lib.register(profile("Deep Narrator", ProfileKind::Cloned, dir.path())).unwrap();
        lib.register(profile("Bright Host", ProfileKind::Designed, dir.path())).unwrap();

        assert_eq!(lib.search("narrator", &[], None).len(), 1);
        assert_eq!(lib.search("", &[], Some(ProfileKind::Designed)).len(), 1);
        assert_eq!(lib.search("", &["test".to_string()], None).len(), 2);
        assert!(lib.search("absent", &[], None).is_empty());
    }
}
