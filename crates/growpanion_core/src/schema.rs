//! Shape validation of untrusted import payloads.
//!
//! Validation is deliberately shallow: the engine is a pass-through
//! layer, so it checks presence and shape of the mandatory structure
//! and identifiers, never business-rule correctness of entity fields.

use serde_json::Value;

/// Result of validating a raw export document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaReport {
    /// True when no violations were found.
    pub valid: bool,
    /// One entry per independent shape violation.
    pub errors: Vec<String>,
}

/// Validates the shape of a parsed export document.
///
/// Every violation is reported independently, so a file missing both
/// `metadata` and `data` yields two entries. Empty collections are
/// valid; a missing or null `data.settings` is valid.
#[must_use]
pub fn validate_export_schema(raw: &Value) -> SchemaReport {
    let mut errors = Vec::new();

    match raw.get("metadata") {
        Some(Value::Object(metadata)) => match metadata.get("version") {
            Some(Value::String(_)) => {}
            Some(_) => errors.push("metadata.version is not a string".to_string()),
            None => errors.push("missing metadata.version".to_string()),
        },
        Some(_) => errors.push("metadata is not an object".to_string()),
        None => errors.push("missing metadata object".to_string()),
    }

    match raw.get("data") {
        Some(Value::Object(data)) => {
            for name in ["grows", "plants", "fertilizerMixes"] {
                match data.get(name) {
                    Some(Value::Array(entities)) => {
                        check_identifiers(name, entities, &mut errors);
                    }
                    Some(_) => errors.push(format!("data.{name} is not an array")),
                    None => errors.push(format!("missing data.{name}")),
                }
            }

            match data.get("settings") {
                None | Some(Value::Null) | Some(Value::Object(_)) => {}
                Some(_) => errors.push("data.settings is not an object".to_string()),
            }
        }
        Some(_) => errors.push("data is not an object".to_string()),
        None => errors.push("missing data section".to_string()),
    }

    SchemaReport {
        valid: errors.is_empty(),
        errors,
    }
}

fn check_identifiers(name: &str, entities: &[Value], errors: &mut Vec<String>) {
    for (index, entity) in entities.iter().enumerate() {
        match entity.get("id") {
            Some(Value::String(id)) if !id.is_empty() => {}
            _ => errors.push(format!("data.{name}[{index}] has no non-empty id")),
        }
    }
}
