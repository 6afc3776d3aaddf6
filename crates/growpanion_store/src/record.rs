//! Opaque entity records.
//!
//! The backup engine is a transparent pass-through/merge layer. Entities
//! keep whatever fields the application gave them; the only field the
//! engine interprets is the stable identifier.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An opaque entity with a mandatory stable identifier.
///
/// All fields other than `id` round-trip untouched through export,
/// import, and merge.
///
/// # Example
///
/// ```rust
/// use growpanion_store::Record;
///
/// let grow = Record::new("grow-1").with_field("name", "Spring tent");
/// assert_eq!(grow.id, "grow-1");
/// assert_eq!(grow.fields["name"], "Spring tent");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable unique identifier within its collection.
    pub id: String,
    /// All remaining fields, preserved verbatim.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Creates a record with the given identifier and no other fields.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Adds a field to the record, builder-style.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// The singleton settings record.
///
/// Settings carries a list of configured sensors plus arbitrary
/// application preferences. The sensor list gets dedicated merge
/// treatment on import (union by sensor id), which is why it is a
/// named field rather than part of the opaque map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Configured sensors, each carrying its own stable identifier.
    #[serde(default)]
    pub sensors: Vec<Record>,
    /// All remaining preference fields, preserved verbatim.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Settings {
    /// Creates an empty settings record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a preference field, builder-style.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Adds a sensor, builder-style.
    #[must_use]
    pub fn with_sensor(mut self, sensor: Record) -> Self {
        self.sensors.push(sensor);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_roundtrips_unknown_fields() {
        let json = serde_json::json!({
            "id": "p1",
            "strain": "Northern Lights",
            "heights": [10, 22, 35],
        });

        let record: Record = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(record.id, "p1");
        assert_eq!(record.fields["strain"], "Northern Lights");

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn record_without_id_rejected() {
        let json = serde_json::json!({ "strain": "unnamed" });
        assert!(serde_json::from_value::<Record>(json).is_err());
    }

    #[test]
    fn settings_sensors_default_empty() {
        let json = serde_json::json!({ "theme": "dark" });
        let settings: Settings = serde_json::from_value(json).unwrap();
        assert!(settings.sensors.is_empty());
        assert_eq!(settings.fields["theme"], "dark");
    }
}
