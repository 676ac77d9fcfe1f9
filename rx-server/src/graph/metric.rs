//! Edge measurements that may be missing.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire form of a missing measurement.
pub const NOT_AVAILABLE: &str = "N/A";

/// A numeric edge attribute, or a marker that no value was supplied.
///
/// Serialises as a bare JSON number, or as the string `"N/A"`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Metric {
    Value(f64),
    #[default]
    NotAvailable,
}

impl Metric {
    /// The numeric value, if there is a usable one.
    ///
    /// NaN counts as unavailable so it can never win a comparison.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Metric::Value(v) if !v.is_nan() => Some(v),
            _ => None,
        }
    }

    /// Ranking key: missing values sort after every real number.
    pub fn rank_key(&self) -> f64 {
        self.as_f64().unwrap_or(f64::INFINITY)
    }
}

impl From<f64> for Metric {
    fn from(v: f64) -> Self {
        Metric::Value(v)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{v}"),
            Metric::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // whole numbers go out as integers, e.g. minutes
            Metric::Value(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                serializer.serialize_i64(*v as i64)
            }
            Metric::Value(v) => serializer.serialize_f64(*v),
            Metric::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Metric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Metric::Value(v)),
            // Any non-numeric value is treated as missing.
            Raw::Text(_) => Ok(Metric::NotAvailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_number_or_marker() {
        assert_eq!(serde_json::to_string(&Metric::Value(1.5)).unwrap(), "1.5");
        assert_eq!(serde_json::to_string(&Metric::Value(4.0)).unwrap(), "4");
        assert_eq!(
            serde_json::to_string(&Metric::NotAvailable).unwrap(),
            "\"N/A\""
        );
    }

    #[test]
    fn deserializes_text_as_missing() {
        let m: Metric = serde_json::from_str("\"N/A\"").unwrap();
        assert_eq!(m, Metric::NotAvailable);
        let m: Metric = serde_json::from_str("\"soon\"").unwrap();
        assert_eq!(m, Metric::NotAvailable);
        let m: Metric = serde_json::from_str("4").unwrap();
        assert_eq!(m, Metric::Value(4.0));
    }

    #[test]
    fn missing_and_nan_rank_last() {
        assert_eq!(Metric::NotAvailable.rank_key(), f64::INFINITY);
        assert_eq!(Metric::Value(f64::NAN).rank_key(), f64::INFINITY);
        assert_eq!(Metric::Value(2.0).rank_key(), 2.0);
        assert_eq!(Metric::Value(f64::NAN).as_f64(), None);
    }

    #[test]
    fn display() {
        assert_eq!(Metric::Value(1.4).to_string(), "1.4");
        assert_eq!(Metric::NotAvailable.to_string(), "N/A");
    }
}
