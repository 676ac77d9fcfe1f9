//! Flat JSON-array collections on disk.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use super::error::StoreError;

/// A collection of records stored as one pretty-printed JSON array.
///
/// Writes are serialised through an internal lock so concurrent inserts
/// never lose each other's records.
#[derive(Debug)]
pub struct JsonCollection<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record. A missing file is an empty collection.
    pub async fn load(&self) -> Result<Vec<T>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Replace the file with `records`, creating parent directories.
    pub async fn save(&self, records: &[T]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(records).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            message: format!("failed to serialize: {e}"),
        })?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StoreError::io(&self.path, e))
    }

    /// Append one record and return the updated collection.
    pub async fn insert(&self, record: T) -> Result<Vec<T>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        records.push(record);
        self.save(&records).await?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    fn note(text: &str) -> Note {
        Note {
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let coll: JsonCollection<Note> = JsonCollection::new(dir.path().join("notes.json"));
        assert!(coll.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_and_load() {
        let dir = tempdir().unwrap();
        let coll = JsonCollection::new(dir.path().join("notes.json"));
        coll.save(&[note("a"), note("b")]).await.unwrap();

        let loaded = coll.load().await.unwrap();
        assert_eq!(loaded, vec![note("a"), note("b")]);
    }

    #[tokio::test]
    async fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("notes.json");
        let coll = JsonCollection::new(&path);
        coll.save(&[note("a")]).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, "{\"text\": 1}").unwrap();

        let coll: JsonCollection<Note> = JsonCollection::new(&path);
        assert!(matches!(coll.load().await, Err(StoreError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn blank_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, "\n").unwrap();

        let coll: JsonCollection<Note> = JsonCollection::new(&path);
        assert!(coll.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_appends() {
        let dir = tempdir().unwrap();
        let coll = JsonCollection::new(dir.path().join("notes.json"));
        coll.insert(note("a")).await.unwrap();
        let all = coll.insert(note("b")).await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(coll.load().await.unwrap(), vec![note("a"), note("b")]);
    }

    #[tokio::test]
    async fn concurrent_inserts_keep_every_record() {
        let dir = tempdir().unwrap();
        let coll = std::sync::Arc::new(JsonCollection::new(dir.path().join("notes.json")));

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let coll = coll.clone();
                tokio::spawn(async move { coll.insert(note(&i.to_string())).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(coll.load().await.unwrap().len(), 16);
    }
}
