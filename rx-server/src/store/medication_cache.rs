//! Name index over the medication collection.
//!
//! The index is an ordinary value: build it with [`MedicationCache::rebuild`]
//! after every write and persist it with [`MedicationCache::save`]. At
//! startup [`MedicationCache::load_checked`] reads it back, rebuilding when
//! the saved copy no longer matches the collection.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::error::StoreError;
use super::records::Medication;

/// Lower-cased medication name → ids of matching medication records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicationCache {
    by_name: BTreeMap<String, Vec<Uuid>>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl MedicationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `medications` from scratch.
    pub fn rebuild(medications: &[Medication]) -> Self {
        let mut by_name: BTreeMap<String, Vec<Uuid>> = BTreeMap::new();
        for med in medications {
            let key = normalize(&med.name);
            if key.is_empty() {
                continue;
            }
            by_name.entry(key).or_default().push(med.id);
        }
        Self { by_name }
    }

    /// Ids of medications called `name` (case-insensitive).
    pub fn lookup(&self, name: &str) -> &[Uuid] {
        self.by_name
            .get(&normalize(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Whether the index covers exactly the named records of `medications`.
    pub fn is_current(&self, medications: &[Medication]) -> bool {
        let indexed: HashSet<(&str, Uuid)> = self
            .by_name
            .iter()
            .flat_map(|(name, ids)| ids.iter().map(move |id| (name.as_str(), *id)))
            .collect();
        let expected: Vec<(String, Uuid)> = medications
            .iter()
            .map(|m| (normalize(&m.name), m.id))
            .filter(|(name, _)| !name.is_empty())
            .collect();

        expected.len() == indexed.len()
            && expected
                .iter()
                .all(|(name, id)| indexed.contains(&(name.as_str(), *id)))
    }

    /// Read a saved cache. Returns `None` if the file is missing or invalid.
    pub async fn load(path: impl AsRef<Path>) -> Option<Self> {
        let contents = tokio::fs::read_to_string(path).await.ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Load the saved cache, falling back to a rebuild when it is missing or
    /// out of date with `medications`.
    pub async fn load_checked(path: impl AsRef<Path>, medications: &[Medication]) -> Self {
        let path = path.as_ref();
        match Self::load(path).await {
            Some(cache) if cache.is_current(medications) => cache,
            Some(_) => {
                warn!(path = %path.display(), "Medication cache is stale, rebuilding");
                Self::rebuild(medications)
            }
            None => Self::rebuild(medications),
        }
    }

    /// Write the cache to `path`, creating parent directories.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| StoreError::Corrupt {
            path: path.to_path_buf(),
            message: format!("failed to serialize: {e}"),
        })?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| StoreError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    fn med(name: &str) -> Medication {
        Medication {
            id: Uuid::new_v4(),
            name: name.to_string(),
            dosage: None,
            frequency: None,
            prescription_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rebuild_groups_case_insensitively() {
        let a = med("Ibuprofen");
        let b = med("  ibuprofen ");
        let c = med("Metformin");
        let cache = MedicationCache::rebuild(&[a.clone(), b.clone(), c.clone()]);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.lookup("IBUPROFEN"), &[a.id, b.id]);
        assert_eq!(cache.lookup("metformin"), &[c.id]);
        assert!(cache.lookup("aspirin").is_empty());
    }

    #[test]
    fn blank_names_are_skipped() {
        let cache = MedicationCache::rebuild(&[med("   ")]);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache").join("medications.json");
        let cache = MedicationCache::rebuild(&[med("Ibuprofen")]);

        cache.save(&path).await.unwrap();
        assert_eq!(MedicationCache::load(&path).await, Some(cache));
    }

    #[tokio::test]
    async fn load_missing_returns_none() {
        assert!(MedicationCache::load("/nonexistent/cache.json").await.is_none());
    }

    #[test]
    fn currency_tracks_the_collection() {
        let a = med("Ibuprofen");
        let b = med("Metformin");
        let cache = MedicationCache::rebuild(&[a.clone()]);

        assert!(cache.is_current(&[a.clone()]));
        assert!(cache.is_current(&[a.clone(), med(" ")]));
        assert!(!cache.is_current(&[a.clone(), b.clone()]));
        assert!(!cache.is_current(&[b]));
        assert!(!cache.is_current(&[]));
    }

    #[tokio::test]
    async fn stale_saved_cache_is_rebuilt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("medication_cache.json");
        let a = med("Ibuprofen");
        let b = med("Metformin");

        // Saved before `b` was added, then the process died.
        MedicationCache::rebuild(&[a.clone()]).save(&path).await.unwrap();

        let cache = MedicationCache::load_checked(&path, &[a.clone(), b.clone()]).await;
        assert_eq!(cache.lookup("metformin"), &[b.id]);
        assert_eq!(cache.lookup("ibuprofen"), &[a.id]);
    }

    #[tokio::test]
    async fn current_saved_cache_is_used() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("medication_cache.json");
        let a = med("Ibuprofen");
        let saved = MedicationCache::rebuild(&[a.clone()]);
        saved.save(&path).await.unwrap();

        assert_eq!(MedicationCache::load_checked(&path, &[a]).await, saved);
    }

    #[tokio::test]
    async fn missing_saved_cache_is_rebuilt() {
        let dir = tempdir().unwrap();
        let a = med("Ibuprofen");
        let cache = MedicationCache::load_checked(dir.path().join("none.json"), &[a.clone()]).await;
        assert_eq!(cache.lookup("IBUPROFEN"), &[a.id]);
    }
}
