//! Volunteer roles attached to an event.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ## Summary
/// Volunteer roles as resolved from the stored `volunteer_roles` column.
///
/// The column holds JSON text written by the application, but older rows may
/// contain free text. The shape is decided once when a row is read; callers
/// never inspect the raw column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum VolunteerRoles {
    #[default]
    None,
    /// Role objects, e.g. `{"role": "Greeter", "count": 2}`.
    Structured(Vec<Value>),
    /// Text that is not a JSON list or object.
    Raw(String),
}

impl VolunteerRoles {
    /// Resolves the stored column text.
    #[must_use]
    pub fn from_stored(stored: Option<&str>) -> Self {
        let Some(text) = stored.map(str::trim).filter(|text| !text.is_empty()) else {
            return Self::None;
        };

        match serde_json::from_str::<Value>(text) {
            Ok(Value::Null) => Self::None,
            Ok(Value::Array(items)) => Self::Structured(items),
            Ok(object @ Value::Object(_)) => Self::Structured(vec![object]),
            Ok(Value::String(inner)) => Self::Raw(inner),
            Ok(_) | Err(_) => Self::Raw(text.to_string()),
        }
    }

    /// Resolves roles submitted as JSON by a client.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::None,
            Value::Array(items) if items.is_empty() => Self::None,
            Value::Array(items) => Self::Structured(items),
            object @ Value::Object(_) => Self::Structured(vec![object]),
            Value::String(text) => Self::from_stored(Some(&text)),
            other => Self::Raw(other.to_string()),
        }
    }

    /// Column text to persist.
    #[must_use]
    pub fn to_stored(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Structured(items) => Some(Value::Array(items.clone()).to_string()),
            Self::Raw(text) => Some(text.clone()),
        }
    }

    /// Structured role objects; empty for raw text.
    #[must_use]
    pub fn roles(&self) -> &[Value] {
        match self {
            Self::Structured(items) => items,
            Self::None | Self::Raw(_) => &[],
        }
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_text_is_structured() {
        let roles = VolunteerRoles::from_stored(Some(r#"[{"role":"Greeter"},{"role":"Usher"}]"#));
        assert_eq!(roles.roles().len(), 2);
        assert_eq!(roles.roles()[1]["role"], "Usher");
    }

    #[test]
    fn single_object_becomes_one_element_list() {
        let roles = VolunteerRoles::from_stored(Some(r#"{"role":"Sound"}"#));
        assert_eq!(roles, VolunteerRoles::Structured(vec![json!({"role": "Sound"})]));
    }

    #[test]
    fn free_text_is_raw() {
        assert_eq!(
            VolunteerRoles::from_stored(Some("greeters, ushers")),
            VolunteerRoles::Raw("greeters, ushers".to_string())
        );
        assert!(VolunteerRoles::from_stored(Some("greeters")).roles().is_empty());
    }

    #[test]
    fn empty_and_null_are_none() {
        assert!(VolunteerRoles::from_stored(None).is_none());
        assert!(VolunteerRoles::from_stored(Some("  ")).is_none());
        assert!(VolunteerRoles::from_stored(Some("null")).is_none());
        assert!(VolunteerRoles::from_json(json!([])).is_none());
    }

    #[test]
    fn stored_text_round_trips() {
        let roles = VolunteerRoles::from_json(json!([{"role": "Nursery", "count": 2}]));
        let stored = roles.to_stored();
        assert_eq!(VolunteerRoles::from_stored(stored.as_deref()), roles);

        let raw = VolunteerRoles::Raw("call the office".to_string());
        assert_eq!(VolunteerRoles::from_stored(raw.to_stored().as_deref()), raw);
    }

    #[test]
    fn json_string_input_is_parsed_once() {
        let roles = VolunteerRoles::from_json(json!(r#"[{"role":"Greeter"}]"#));
        assert_eq!(roles.roles().len(), 1);
    }
}
