//! Dashboard aggregation over the stored collections.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::store::{Medication, Prescription, Reminder};

/// How far ahead reminders count as upcoming.
pub const UPCOMING_WINDOW_HOURS: i64 = 24;

/// How many prescriptions the dashboard lists.
pub const RECENT_PRESCRIPTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Counts {
    pub prescriptions: usize,
    pub medications: usize,
    pub reminders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub counts: Counts,
    /// Active reminders due between now and the window end, earliest first.
    pub upcoming_reminders: Vec<Reminder>,
    /// Newest first.
    pub recent_prescriptions: Vec<Prescription>,
}

impl Dashboard {
    pub fn summarize(
        prescriptions: Vec<Prescription>,
        medications: &[Medication],
        reminders: Vec<Reminder>,
        now: DateTime<Utc>,
    ) -> Self {
        let counts = Counts {
            prescriptions: prescriptions.len(),
            medications: medications.len(),
            reminders: reminders.len(),
        };

        let horizon = now + Duration::hours(UPCOMING_WINDOW_HOURS);
        let mut upcoming_reminders: Vec<Reminder> = reminders
            .into_iter()
            .filter(|r| r.active && r.remind_at >= now && r.remind_at <= horizon)
            .collect();
        upcoming_reminders.sort_by_key(|r| r.remind_at);

        let mut recent_prescriptions = prescriptions;
        recent_prescriptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_prescriptions.truncate(RECENT_PRESCRIPTIONS);

        Self {
            counts,
            upcoming_reminders,
            recent_prescriptions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn reminder(medication: &str, in_hours: i64, active: bool) -> Reminder {
        Reminder {
            id: Uuid::new_v4(),
            medication: medication.into(),
            remind_at: now() + Duration::hours(in_hours),
            note: None,
            active,
            created_at: now(),
        }
    }

    fn prescription(filename: &str, days_ago: i64) -> Prescription {
        Prescription {
            id: Uuid::new_v4(),
            filename: filename.into(),
            extracted_text: String::new(),
            structured_text: String::new(),
            generic_predictions: BTreeMap::new(),
            created_at: now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn upcoming_reminders_are_filtered_and_sorted() {
        let reminders = vec![
            reminder("late", 30, true),
            reminder("evening", 8, true),
            reminder("past", -1, true),
            reminder("paused", 2, false),
            reminder("soon", 1, true),
        ];

        let dash = Dashboard::summarize(vec![], &[], reminders, now());

        let names: Vec<_> = dash
            .upcoming_reminders
            .iter()
            .map(|r| r.medication.as_str())
            .collect();
        assert_eq!(names, ["soon", "evening"]);
        assert_eq!(dash.counts.reminders, 5);
    }

    #[test]
    fn recent_prescriptions_are_newest_first_and_capped() {
        let prescriptions = (0..7)
            .map(|i| prescription(&format!("rx{i}.png"), i))
            .rev()
            .collect();

        let dash = Dashboard::summarize(prescriptions, &[], vec![], now());

        assert_eq!(dash.counts.prescriptions, 7);
        let names: Vec<_> = dash
            .recent_prescriptions
            .iter()
            .map(|p| p.filename.as_str())
            .collect();
        assert_eq!(names, ["rx0.png", "rx1.png", "rx2.png", "rx3.png", "rx4.png"]);
    }

    #[test]
    fn empty_store() {
        let dash = Dashboard::summarize(vec![], &[], vec![], now());
        assert_eq!(
            dash.counts,
            Counts {
                prescriptions: 0,
                medications: 0,
                reminders: 0
            }
        );
        assert!(dash.upcoming_reminders.is_empty());
    }
}
