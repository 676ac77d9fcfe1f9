//! Persisted record types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An analysed prescription upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: Uuid,
    pub filename: String,
    pub extracted_text: String,
    pub structured_text: String,
    /// Candidate medicine name → predicted generic name.
    #[serde(default)]
    pub generic_predictions: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}

/// A medication the user is taking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    /// Prescription this medication was read from, if any.
    #[serde(default)]
    pub prescription_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A scheduled reminder to take a medication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub medication: String,
    pub remind_at: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}
