use crate::models::Note;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Version tag written into every persisted envelope
pub const SCHEMA_VERSION: u32 = 1;

/// Key used when the configuration does not name one
pub const DEFAULT_NOTES_KEY: &str = "notes";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key {0:?}: use letters, digits, '_', '-' or '.'")]
    InvalidKey(String),

    #[error("failed to encode notes: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(
        "stored notes use format version {found}, newer than the supported {supported}; \
         refusing to overwrite them"
    )]
    NewerSchema { found: u32, supported: u32 },
}

/// Name of the slot a value lives under in a [`KeyValueStore`]
///
/// Keys double as file names for [`FileKeyValueStore`], so only a safe subset
/// of characters is accepted and a leading dot is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(key: impl Into<String>) -> Result<Self, StorageError> {
        let key = key.into();
        let valid_chars = key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

        if key.is_empty() || key.starts_with('.') || !valid_chars {
            return Err(StorageError::InvalidKey(key));
        }

        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StorageKey {
    fn default() -> Self {
        Self(DEFAULT_NOTES_KEY.to_string())
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Durable string slots addressed by key
pub trait KeyValueStore: fmt::Debug {
    /// Returns the raw value, or `None` when nothing was ever written
    fn get(&self, key: &StorageKey) -> Result<Option<String>, StorageError>;

    /// Replaces whatever is stored under `key`
    fn set(&mut self, key: &StorageKey, value: &str) -> Result<(), StorageError>;

    /// Where values end up, for display purposes
    fn location(&self, key: &StorageKey) -> String;
}

/// Key-value store backed by one file per key inside a directory
#[derive(Debug)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.root.join(format!("{}.json", key.as_str()))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &StorageKey) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &StorageKey, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp_path = self.root.join(format!(".{}.json.tmp", key.as_str()));

        // Rename is atomic on the same filesystem, so readers never see a torn value
        fs::write(&tmp_path, value)?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                warn!(path = %tmp_path.display(), error = %cleanup, "failed to remove temp file");
            }
            return Err(e.into());
        }
        Ok(())
    }

    fn location(&self, key: &StorageKey) -> String {
        self.path_for(key).display().to_string()
    }
}

/// In-memory key-value store
///
/// Clones share the same map, which lets a test hand one handle to a store
/// and inspect or pre-seed the raw values through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &StorageKey) -> Option<String> {
        self.entries.borrow().get(key.as_str()).cloned()
    }

    pub fn seed(&self, key: &StorageKey, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.as_str().to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &StorageKey, value: &str) -> Result<(), StorageError> {
        self.seed(key, value);
        Ok(())
    }

    fn location(&self, key: &StorageKey) -> String {
        format!("memory://{key}")
    }
}

#[derive(Debug, Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    notes: &'a [Note],
}

#[derive(Debug, Deserialize)]
struct Envelope {
    version: u32,
    notes: Vec<Note>,
}

/// Just the version tag of a stored envelope
#[derive(Debug, Deserialize)]
struct StoredVersion {
    version: u32,
}

/// Persisted shapes accepted on load
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredNotes {
    Versioned(Envelope),
    Legacy(Vec<Note>),
}

/// Durable mirror of the note collection under a single key
///
/// The store never holds notes itself; every `save` rewrites the whole
/// collection and every `load` decodes it afresh.
#[derive(Debug)]
pub struct NoteStore {
    backend: Box<dyn KeyValueStore>,
    key: StorageKey,
}

impl NoteStore {
    pub fn new(backend: Box<dyn KeyValueStore>, key: StorageKey) -> Self {
        Self { backend, key }
    }

    pub fn key(&self) -> &StorageKey {
        &self.key
    }

    pub fn location(&self) -> String {
        self.backend.location(&self.key)
    }

    /// Loads the persisted collection
    ///
    /// Missing, unreadable or malformed values all come back as an empty
    /// collection; the cause is logged.
    pub fn load(&self) -> Vec<Note> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no stored notes");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read stored notes, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<StoredNotes>(&raw) {
            Ok(StoredNotes::Versioned(envelope)) => {
                if envelope.version > SCHEMA_VERSION {
                    warn!(
                        key = %self.key,
                        version = envelope.version,
                        supported = SCHEMA_VERSION,
                        "stored notes were written by a newer version; saving is disabled"
                    );
                }
                debug!(key = %self.key, count = envelope.notes.len(), "loaded notes");
                self.without_duplicate_ids(envelope.notes)
            }
            Ok(StoredNotes::Legacy(notes)) => {
                info!(key = %self.key, count = notes.len(), "loaded unversioned notes");
                self.without_duplicate_ids(notes)
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "stored notes are malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Ids are the only key for deletion, so a hand-edited value holding the
    /// same id twice keeps just the first note with it
    fn without_duplicate_ids(&self, notes: Vec<Note>) -> Vec<Note> {
        let mut seen = HashSet::new();
        notes
            .into_iter()
            .filter(|note| {
                let first = seen.insert(note.id.clone());
                if !first {
                    warn!(key = %self.key, id = %note.id, "dropping note with duplicate id");
                }
                first
            })
            .collect()
    }

    /// Overwrites the persisted collection with `notes`
    ///
    /// A value written by a newer format version is left alone, since
    /// rewriting it as this version would drop whatever it added.
    pub fn save(&mut self, notes: &[Note]) -> Result<(), StorageError> {
        if let Some(raw) = self.backend.get(&self.key)? {
            if let Ok(StoredVersion { version }) = serde_json::from_str(&raw) {
                if version > SCHEMA_VERSION {
                    return Err(StorageError::NewerSchema {
                        found: version,
                        supported: SCHEMA_VERSION,
                    });
                }
            }
        }

        let envelope = EnvelopeRef {
            version: SCHEMA_VERSION,
            notes,
        };
        let content = serde_json::to_string_pretty(&envelope)?;

        self.backend.set(&self.key, &content)?;
        debug!(key = %self.key, count = notes.len(), "saved notes");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: format!("content of {title}"),
            date: "1/2/2024, 9:00:00 AM".to_string(),
        }
    }

    fn memory_store() -> (MemoryKeyValueStore, NoteStore) {
        let backend = MemoryKeyValueStore::new();
        let store = NoteStore::new(Box::new(backend.clone()), StorageKey::default());
        (backend, store)
    }

    #[test]
    fn empty_backend_loads_empty_collection() {
        let (_, store) = memory_store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_value_loads_empty_collection() {
        let (backend, store) = memory_store();
        backend.seed(store.key(), "this is {not json");
        assert!(store.load().is_empty());

        backend.seed(store.key(), r#"{"unexpected": true}"#);
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_writes_versioned_envelope() {
        let (backend, mut store) = memory_store();
        store.save(&[note("1", "First")]).unwrap();

        let raw = backend.raw(store.key()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], SCHEMA_VERSION);
        assert_eq!(value["notes"][0]["title"], "First");
    }

    #[test]
    fn save_then_load_preserves_order_and_fields() {
        let (_, mut store) = memory_store();
        let notes = vec![note("b", "Second"), note("a", "First"), note("c", "Third")];
        store.save(&notes).unwrap();
        assert_eq!(store.load(), notes);
    }

    #[test]
    fn save_replaces_previous_value() {
        let (_, mut store) = memory_store();
        store.save(&[note("1", "One"), note("2", "Two")]).unwrap();
        store.save(&[note("3", "Three")]).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "3");
    }

    #[test]
    fn load_then_save_leaves_value_unchanged() {
        let (backend, mut store) = memory_store();
        store.save(&[note("1", "One"), note("2", "Two")]).unwrap();
        let before = backend.raw(store.key()).unwrap();

        let loaded = store.load();
        store.save(&loaded).unwrap();

        assert_eq!(backend.raw(store.key()).unwrap(), before);
    }

    #[test]
    fn legacy_bare_array_is_accepted() {
        let (backend, mut store) = memory_store();
        backend.seed(
            store.key(),
            r#"[{"id":"1718000000000","title":"Old","content":"*hi*","date":"6/10/2024, 8:13:20 AM"}]"#,
        );

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "1718000000000");
        assert_eq!(loaded[0].title, "Old");

        store.save(&loaded).unwrap();
        assert_eq!(store.load(), loaded);
    }

    #[test]
    fn newer_envelope_version_still_loads() {
        let (backend, store) = memory_store();
        backend.seed(
            store.key(),
            r#"{"version":7,"notes":[{"id":"x","title":"T","content":"C","date":"D","pinned":true}]}"#,
        );

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "x");
    }

    #[test]
    fn newer_envelope_version_is_never_overwritten() {
        let (backend, mut store) = memory_store();
        let stored =
            r#"{"version":7,"notes":[{"id":"x","title":"T","content":"C","date":"D","pinned":true}]}"#;
        backend.seed(store.key(), stored);

        let loaded = store.load();
        let err = store.save(&loaded).unwrap_err();
        assert!(matches!(
            err,
            StorageError::NewerSchema {
                found: 7,
                supported: SCHEMA_VERSION
            }
        ));
        assert_eq!(backend.raw(store.key()).unwrap(), stored);
    }

    #[test]
    fn duplicate_ids_keep_the_first_note() {
        let (backend, store) = memory_store();
        backend.seed(
            store.key(),
            r#"{"version":1,"notes":[
                {"id":"a","title":"First","content":"1","date":"D"},
                {"id":"b","title":"Other","content":"2","date":"D"},
                {"id":"a","title":"Copy","content":"3","date":"D"}
            ]}"#,
        );

        let titles: Vec<String> = store.load().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["First".to_string(), "Other".to_string()]);
    }

    #[test]
    fn stores_are_scoped_to_their_key() {
        let backend = MemoryKeyValueStore::new();
        let mut work = NoteStore::new(
            Box::new(backend.clone()),
            StorageKey::new("work-notes").unwrap(),
        );
        let home = NoteStore::new(Box::new(backend.clone()), StorageKey::default());

        work.save(&[note("1", "Work")]).unwrap();
        assert_eq!(work.load().len(), 1);
        assert!(home.load().is_empty());
    }

    #[test]
    fn storage_key_validation() {
        assert!(StorageKey::new("notes").is_ok());
        assert!(StorageKey::new("notes.v1_backup-2").is_ok());
        assert!(StorageKey::new("").is_err());
        assert!(StorageKey::new(".hidden").is_err());
        assert!(StorageKey::new("../escape").is_err());
        assert!(StorageKey::new("with space").is_err());
        assert!(StorageKey::new("a/b").is_err());
    }

    #[test]
    fn file_backend_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let key = StorageKey::default();

        {
            let backend = FileKeyValueStore::new(dir.path().join("store")).unwrap();
            let mut store = NoteStore::new(Box::new(backend), key.clone());
            store.save(&[note("1", "Persisted")]).unwrap();
        }

        let backend = FileKeyValueStore::new(dir.path().join("store")).unwrap();
        let store = NoteStore::new(Box::new(backend), key);
        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "Persisted");
    }

    #[test]
    fn file_backend_missing_file_is_none_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileKeyValueStore::new(dir.path()).unwrap();
        let key = StorageKey::default();

        assert!(backend.get(&key).unwrap().is_none());

        backend.set(&key, "[]").unwrap();
        let entries: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries, vec!["notes.json".to_string()]);
        assert!(backend.location(&key).ends_with("notes.json"));
    }

    #[test]
    fn failed_rename_removes_the_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileKeyValueStore::new(dir.path()).unwrap();
        let key = StorageKey::default();

        // a non-empty directory where the value belongs makes the rename fail
        fs::create_dir(dir.path().join("notes.json")).unwrap();
        fs::write(dir.path().join("notes.json").join("keep"), "x").unwrap();

        assert!(matches!(backend.set(&key, "[]"), Err(StorageError::Io(_))));
        assert!(!dir.path().join(".notes.json.tmp").exists());
    }
}
