pub mod note;
pub mod profile;
pub mod storage;

pub use note::Note;
pub use profile::Profile;
pub use storage::{
    FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, NoteStore, StorageError, StorageKey,
};
