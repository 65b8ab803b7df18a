//! Flat-file note storage.
//!
//! All notes live in one JSON array. Every append reads the whole array,
//! assigns `id = len + 1`, and rewrites the file. Writes go to a sibling temp
//! file that is renamed over the notes file, and appends are serialized by a
//! mutex so concurrent submissions cannot drop each other's notes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Notes file {} is not a JSON array of notes: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode notes: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A stored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub text: String,
}

/// JSON-array note store.
pub struct NoteStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl NoteStore {
    /// Open the store at `path`, creating the file as `[]` if it is missing.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if fs::try_exists(&path).await.map_err(|e| io_err(&path, e))? {
            debug!(path = %path.display(), "Using existing notes file");
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| io_err(parent, e))?;
            }
            fs::write(&path, b"[]").await.map_err(|e| io_err(&path, e))?;
            info!(path = %path.display(), "Created empty notes file");
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored note, in insertion order.
    pub async fn list(&self) -> Result<Vec<Note>, StoreError> {
        self.read_all().await
    }

    /// Append a note with the next id and persist the whole array.
    pub async fn append(&self, text: String) -> Result<Note, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut notes = self.read_all().await?;
        let note = Note {
            id: notes.len() as u64 + 1,
            text,
        };
        notes.push(note.clone());
        self.write_all(&notes).await?;

        debug!(id = note.id, total = notes.len(), "Note appended");
        Ok(note)
    }

    async fn read_all(&self) -> Result<Vec<Note>, StoreError> {
        let data = fs::read(&self.path).await.map_err(|e| io_err(&self.path, e))?;
        serde_json::from_slice(&data).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn write_all(&self, notes: &[Note]) -> Result<(), StoreError> {
        let data = to_pretty_json(notes)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &data).await.map_err(|e| io_err(&tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| io_err(&self.path, e))?;
        Ok(())
    }
}

/// Encode with four-space indentation.
fn to_pretty_json(notes: &[Note]) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    notes.serialize(&mut ser)?;
    Ok(buf)
}

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        let store = NoteStore::open(&path).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_assigns_incrementing_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::open(dir.path().join("data.json")).await.unwrap();

        let a = store.append("first".to_string()).await.unwrap();
        let b = store.append("second".to_string()).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        let notes = store.list().await.unwrap();
        assert_eq!(notes, vec![a, b]);
    }

    #[tokio::test]
    async fn test_existing_file_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"[{"id": 1, "text": "old"}]"#).unwrap();

        let store = NoteStore::open(&path).await.unwrap();
        let note = store.append("new".to_string()).await.unwrap();
        assert_eq!(note.id, 2);
        assert_eq!(store.list().await.unwrap()[0].text, "old");
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = NoteStore::open(&path).await.unwrap();
        store.append("x".to_string()).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "[\n    {\n        \"id\": 1,\n        \"text\": \"x\"\n    }\n]");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = NoteStore::open(&path).await.unwrap();
        let err = store.append("x".to_string()).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
    }
}
