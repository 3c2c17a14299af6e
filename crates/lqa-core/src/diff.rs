//! Field-level change detection between two snapshots of one listing.
//!
//! The prior snapshot comes from an external history store and may carry
//! attributes either flat at the top level or nested under an
//! `attributes` grouping (older storage shape). Both are accepted; the
//! adapter in [`lookup`] hides the difference so the comparison itself
//! only ever sees one shape.
//!
//! Comparison is exact string inequality after normalization, not
//! semantic: `"4.5"` vs `"4.50"` IS reported as a change. That
//! sensitivity is a known sharp edge of the stored format and is kept
//! deliberately.

use serde_json::Value;
use thiserror::Error;

use crate::record::{Record, NONE};
use crate::registry::FIELD_REGISTRY;

#[derive(Debug, Error)]
pub enum DiffError {
    #[error("prior snapshot is not a JSON object (got {kind})")]
    MalformedPrior { kind: &'static str },
}

/// One detected field drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// Registry field name.
    pub field: &'static str,
    pub prior: String,
    pub current: String,
}

impl std::fmt::Display for FieldChange {
    /// Renders `Display Price: 19.99 -> 24.99`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for word in self.field.split('_') {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            let mut chars = word.chars();
            if let Some(c) = chars.next() {
                write!(f, "{}{}", c.to_uppercase(), chars.as_str())?;
            }
        }
        write!(f, ": {} -> {}", self.prior, self.current)
    }
}

/// Compares a prior snapshot against a freshly extracted record.
///
/// Iterates [`FIELD_REGISTRY`] in its defined order and emits one entry
/// per field whose normalized string form differs. Derived and
/// identifier fields never appear. An empty result means no observable
/// drift.
///
/// # Errors
///
/// Returns [`DiffError::MalformedPrior`] when the stored snapshot is not
/// a JSON object at all (corrupt history entry).
pub fn diff(prior: &Value, current: &Record) -> Result<Vec<FieldChange>, DiffError> {
    if !prior.is_object() {
        return Err(DiffError::MalformedPrior {
            kind: value_kind(prior),
        });
    }

    let current = serde_json::to_value(current).expect("Record serializes to JSON");
    let mut changes = Vec::new();

    for spec in FIELD_REGISTRY.iter().filter(|spec| spec.compared()) {
        let old = normalize(lookup(prior, spec.name));
        let new = normalize(lookup(&current, spec.name));
        if old != new {
            changes.push(FieldChange {
                field: spec.name,
                prior: old,
                current: new,
            });
        }
    }

    Ok(changes)
}

/// Reads a field from a snapshot, trying the flat location first and the
/// nested `attributes` grouping when the flat location is absent.
fn lookup<'a>(snapshot: &'a Value, field: &str) -> Option<&'a Value> {
    snapshot
        .get(field)
        .or_else(|| snapshot.get("attributes").and_then(|attrs| attrs.get(field)))
}

/// Normalizes any stored value to a trimmed string with a shared `"none"`
/// sentinel for null/missing/empty. Collections normalize to compact JSON.
fn normalize(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NONE.to_string(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                NONE.to_string()
            } else {
                trimmed.to_string()
            }
        }
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => serde_json::to_string(other).expect("JSON value re-serializes"),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "diff_test.rs"]
mod tests;
