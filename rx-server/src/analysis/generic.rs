//! Brand-name → generic-name prediction.
//!
//! The prediction model is a label-encoded lookup: a brand name seen at
//! training time maps to one generic name, anything else is unknown.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::warn;

/// Returned for names absent from the table.
pub const UNKNOWN_MEDICINE: &str = "Unknown Medicine";

/// Exact-match table of medicine names to generic names.
#[derive(Debug, Clone, Default)]
pub struct GenericNameTable {
    names: HashMap<String, String>,
}

impl GenericNameTable {
    pub fn new(names: HashMap<String, String>) -> Self {
        Self { names }
    }

    /// Load a JSON object of `{"Brand": "generic", ...}`.
    ///
    /// A missing or unreadable file yields an empty table, so every
    /// prediction is [`UNKNOWN_MEDICINE`].
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()));

        match parsed {
            Ok(names) => Self { names },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Generic name table unavailable");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Generic name for `medicine`, or [`UNKNOWN_MEDICINE`].
    pub fn predict(&self, medicine: &str) -> &str {
        self.names
            .get(medicine)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_MEDICINE)
    }

    /// Predict every candidate line of a structured prescription.
    pub fn predict_all(&self, structured_text: &str) -> BTreeMap<String, String> {
        candidate_names(structured_text)
            .into_iter()
            .map(|name| {
                let generic = self.predict(&name).to_string();
                (name, generic)
            })
            .collect()
    }
}

/// Candidate medicine names: trimmed, non-empty lines not starting with `-`.
pub fn candidate_names(structured_text: &str) -> Vec<String> {
    structured_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('-'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn table() -> GenericNameTable {
        let mut names = HashMap::new();
        names.insert("Crocin".to_string(), "Paracetamol".to_string());
        names.insert("Augmentin".to_string(), "Amoxicillin + Clavulanate".to_string());
        GenericNameTable::new(names)
    }

    #[test]
    fn predicts_known_and_unknown() {
        let t = table();
        assert_eq!(t.predict("Crocin"), "Paracetamol");
        assert_eq!(t.predict("Mystery"), UNKNOWN_MEDICINE);
    }

    #[test]
    fn candidate_lines_skip_bullets_and_blanks() {
        let text = "Medications\n\n- Patient: John\nCrocin\n   \n  - dosage\nAugmentin  ";
        assert_eq!(candidate_names(text), ["Medications", "Crocin", "Augmentin"]);
    }

    #[test]
    fn predict_all_maps_each_candidate() {
        let predictions = table().predict_all("Crocin\n- twice daily\nAugmentin\nNotes");
        assert_eq!(predictions.len(), 3);
        assert_eq!(predictions["Crocin"], "Paracetamol");
        assert_eq!(predictions["Augmentin"], "Amoxicillin + Clavulanate");
        assert_eq!(predictions["Notes"], UNKNOWN_MEDICINE);
    }

    #[test]
    fn load_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("generic_names.json");
        std::fs::write(&path, r#"{"Crocin": "Paracetamol"}"#).unwrap();

        let t = GenericNameTable::load(&path);
        assert_eq!(t.len(), 1);
        assert_eq!(t.predict("Crocin"), "Paracetamol");
    }

    #[test]
    fn missing_file_gives_empty_table() {
        let t = GenericNameTable::load("/nonexistent/generic_names.json");
        assert!(t.is_empty());
        assert_eq!(t.predict("Crocin"), UNKNOWN_MEDICINE);
    }
}
