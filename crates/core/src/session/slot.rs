//! Durable slot holding the signed-in subject across restarts.
//!
//! A slot stores at most one JSON-serialised [`Subject`] under a well-known key. An empty slot
//! means the session starts anonymous.
//!
//! File-backed slots live in a directory:
//!
//! ```text
//! .hms/
//! └── hospital_user.json
//! ```

use crate::constants::SESSION_SLOT_KEY;
use crate::error::{AccessError, AccessResult};
use crate::subject::Subject;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Storage for a single serialised subject.
pub trait SessionSlot {
    /// Returns the stored subject, or `None` when the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns `AccessError` if the slot exists but cannot be read or decoded.
    fn load(&self) -> AccessResult<Option<Subject>>;

    /// Replaces the slot contents with `subject`.
    fn store(&mut self, subject: &Subject) -> AccessResult<()>;

    /// Empties the slot. Clearing an empty slot succeeds.
    fn clear(&mut self) -> AccessResult<()>;
}

/// In-process slot. Contents are kept in serialised form so they round-trip the same way a
/// file-backed slot does.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    json: Option<String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.json.is_none()
    }
}

impl SessionSlot for MemorySlot {
    fn load(&self) -> AccessResult<Option<Subject>> {
        self.json
            .as_deref()
            .map(|json| serde_json::from_str(json).map_err(AccessError::Deserialization))
            .transpose()
    }

    fn store(&mut self, subject: &Subject) -> AccessResult<()> {
        self.json = Some(serde_json::to_string(subject).map_err(AccessError::Serialization)?);
        Ok(())
    }

    fn clear(&mut self) -> AccessResult<()> {
        self.json = None;
        Ok(())
    }
}

/// Slot backed by `<dir>/hospital_user.json`.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Creates a slot rooted at `dir`. The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{SESSION_SLOT_KEY}.json"))
    }
}

impl SessionSlot for FileSlot {
    fn load(&self) -> AccessResult<Option<Subject>> {
        let path = self.path();
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AccessError::SlotRead(e)),
        };

        let subject = serde_json::from_str(&contents).map_err(AccessError::Deserialization)?;
        Ok(Some(subject))
    }

    fn store(&mut self, subject: &Subject) -> AccessResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(AccessError::SlotDirCreation)?;

        let json = serde_json::to_string_pretty(subject).map_err(AccessError::Serialization)?;

        // Each write gets its own temp file in the slot directory, then is renamed into place.
        let mut temp = NamedTempFile::new_in(&self.dir).map_err(AccessError::SlotWrite)?;
        temp.write_all(json.as_bytes()).map_err(AccessError::SlotWrite)?;
        temp.persist(self.path()).map_err(|e| AccessError::SlotWrite(e.error))?;

        tracing::debug!(path = %self.path().display(), "stored session slot");
        Ok(())
    }

    fn clear(&mut self) -> AccessResult<()> {
        match std::fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AccessError::SlotRemove(e)),
        }
    }
}
