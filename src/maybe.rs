//! Tri-state field values.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A field value that distinguishes "not present" from "present and null".
///
/// On result objects, `Absent` means the field was not part of the reply
/// (not fetched), while `Null` means the server returned an explicit null
/// (fetched and empty); reply fields carry `#[serde(default)]` so a missing
/// key materializes as `Absent`. On update inputs, `Absent` means "leave
/// unchanged" and `Null` means "clear this value"; input fields carry
/// `#[serde(skip_serializing_if = "Maybe::is_absent")]` so absent fields
/// are omitted from the wire entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maybe<T> {
    /// The field was not set / not part of the reply.
    Absent,
    /// The field holds an explicit null.
    Null,
    /// The field holds a value.
    Value(T),
}

impl<T> Maybe<T> {
    /// Returns `true` if the field was never set.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns `true` if the field holds an explicit null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the contained value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }

    /// Consume into the contained value, if any.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }
}

// No `T: Default` bound; a derived impl would demand one and break
// `#[serde(default)]` on fields whose value type has no Default.
impl<T> Default for Maybe<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Value(value),
            None => Self::Null,
        }
    }
}

impl<T: Serialize> Serialize for Maybe<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Absent fields are expected to be skipped by the containing
            // struct; rendering null keeps the output well-formed if not.
            Self::Absent | Self::Null => serializer.serialize_none(),
            Self::Value(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Maybe<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Reply {
        #[serde(default)]
        note: Maybe<String>,
    }

    #[test]
    fn missing_key_is_absent() {
        let reply: Reply = serde_json::from_value(json!({})).unwrap();
        assert!(reply.note.is_absent());
        assert!(!reply.note.is_null());
    }

    #[test]
    fn explicit_null_is_null_not_absent() {
        let reply: Reply = serde_json::from_value(json!({"note": null})).unwrap();
        assert!(reply.note.is_null());
        assert!(!reply.note.is_absent());
    }

    #[test]
    fn value_round_trips() {
        let reply: Reply = serde_json::from_value(json!({"note": "lab"})).unwrap();
        assert_eq!(reply.note.value().map(String::as_str), Some("lab"));
    }
}
