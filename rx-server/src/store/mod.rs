//! Flat JSON persistence for prescriptions, medications and reminders.

mod collection;
mod error;
mod medication_cache;
mod records;

use std::path::PathBuf;

pub use collection::JsonCollection;
pub use error::StoreError;
pub use medication_cache::MedicationCache;
pub use records::{Medication, Prescription, Reminder};

/// File name of the persisted medication index.
pub const MEDICATION_CACHE_FILE: &str = "medication_cache.json";

/// The three collections kept under one data directory.
#[derive(Debug)]
pub struct Store {
    dir: PathBuf,
    pub prescriptions: JsonCollection<Prescription>,
    pub medications: JsonCollection<Medication>,
    pub reminders: JsonCollection<Reminder>,
}

impl Store {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            prescriptions: JsonCollection::new(dir.join("prescriptions.json")),
            medications: JsonCollection::new(dir.join("medications.json")),
            reminders: JsonCollection::new(dir.join("reminders.json")),
            dir,
        }
    }

    /// Where analysis documents are written, one per upload.
    pub fn output_dir(&self) -> PathBuf {
        self.dir.join("output")
    }

    pub fn medication_cache_path(&self) -> PathBuf {
        self.dir.join(MEDICATION_CACHE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn collection_paths() {
        let store = Store::open("data");
        assert_eq!(store.prescriptions.path(), Path::new("data/prescriptions.json"));
        assert_eq!(store.medications.path(), Path::new("data/medications.json"));
        assert_eq!(store.reminders.path(), Path::new("data/reminders.json"));
        assert_eq!(store.output_dir(), PathBuf::from("data/output"));
        assert_eq!(
            store.medication_cache_path(),
            PathBuf::from("data/medication_cache.json")
        );
    }
}
