//! Request and response types for the HTTP API.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{Medication, Prescription, Reminder};

/// Health check body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Query for `GET /get-hospital-graph`.
///
/// Coordinates arrive as text so malformed numbers get the same error body
/// as missing ones.
#[derive(Debug, Default, Deserialize)]
pub struct HospitalGraphQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    /// `distance` (default) or `time`.
    pub criteria: Option<String>,
}

/// Query for `GET /alternatives`.
#[derive(Debug, Default, Deserialize)]
pub struct AlternativesQuery {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AlternativesResponse {
    pub name: String,
    pub alternatives: Vec<String>,
}

/// Query for `GET /medications`.
#[derive(Debug, Default, Deserialize)]
pub struct MedicationQuery {
    /// Only medications with this name (case-insensitive).
    pub name: Option<String>,
}

/// Body of `POST /prescriptions`.
#[derive(Debug, Deserialize)]
pub struct NewPrescription {
    pub filename: String,
    #[serde(default)]
    pub extracted_text: String,
    #[serde(default)]
    pub structured_text: String,
    #[serde(default)]
    pub generic_predictions: BTreeMap<String, String>,
}

impl NewPrescription {
    pub fn into_record(self, now: DateTime<Utc>) -> Prescription {
        Prescription {
            id: Uuid::new_v4(),
            filename: self.filename,
            extracted_text: self.extracted_text,
            structured_text: self.structured_text,
            generic_predictions: self.generic_predictions,
            created_at: now,
        }
    }
}

/// Body of `POST /medications`.
#[derive(Debug, Deserialize)]
pub struct NewMedication {
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub prescription_id: Option<Uuid>,
}

impl NewMedication {
    pub fn into_record(self, now: DateTime<Utc>) -> Medication {
        Medication {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            dosage: self.dosage,
            frequency: self.frequency,
            prescription_id: self.prescription_id,
            created_at: now,
        }
    }
}

/// Body of `POST /reminders`.
#[derive(Debug, Deserialize)]
pub struct NewReminder {
    pub medication: String,
    pub remind_at: DateTime<Utc>,
    pub note: Option<String>,
    pub active: Option<bool>,
}

impl NewReminder {
    pub fn into_record(self, now: DateTime<Utc>) -> Reminder {
        Reminder {
            id: Uuid::new_v4(),
            medication: self.medication.trim().to_string(),
            remind_at: self.remind_at,
            note: self.note,
            active: self.active.unwrap_or(true),
            created_at: now,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
