//! Record validation.
//!
//! Each resource declares an ordered list of [`Rule`]s evaluated against a
//! snapshot of the submitted record plus any store-derived facts (uniqueness,
//! asset presence). Every rule runs; only the first failure per field is kept.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::{Deserialize, Deserializer};
use std::fmt;

pub mod movie;
pub mod review;
pub mod user;

pub use movie::{MovieCheck, MovieForm, validate_movie};
pub use review::{ReviewForm, validate_review};
pub use user::{UserCheck, UserForm, validate_new_user, validate_user_changes};

pub const BLANK: &str = "can't be blank";
pub const TAKEN: &str = "has already been taken";
pub const NOT_A_NUMBER: &str = "is not a number";

/// A single predicate over a record snapshot.
pub struct Rule<T> {
    pub field: &'static str,
    pub message: &'static str,
    pub check: fn(&T) -> bool,
}

/// Ordered `field -> message` map, at most one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records `message` unless `field` already has one.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.entries.push((field, message.into()));
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Single-entry error for failures detected outside the rule list.
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field} {message}")?;
        }
        Ok(())
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, message) in &self.entries {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

/// Runs every rule against `record`, in order.
///
/// # Errors
///
/// Returns the collected messages when any rule fails.
pub fn run_rules<T>(record: &T, rules: &[Rule<T>]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for rule in rules {
        if !(rule.check)(record) {
            errors.add(rule.field, rule.message);
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub(crate) fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Trims and drops empty values.
pub(crate) fn squish(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts strings, numbers and booleans for form fields, keeping the raw text
/// so syntax errors can be reported per field instead of rejecting the body.
pub(crate) fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
