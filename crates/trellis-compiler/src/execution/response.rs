//! Response-shaping primitives: the tri-state [`Nullable`] wrapper and
//! selection-based field exclusion.

use crate::ast::Selection;
use crate::collections::HashSet;
use serde::Serialize;

pub type JsonValue = serde_json_bytes::Value;
pub type JsonMap = serde_json_bytes::Map<serde_json_bytes::ByteString, JsonValue>;

/// Distinguishes the three JSON states of a response field: absent from the
/// output object, present with value `null`, or present with a value.
///
/// GraphQL needs the distinction because a field can be missing from the
/// response for selection reasons (never requested) independently of being
/// null for nullability reasons; JSON's native `null` alone cannot express
/// both.
///
/// Embed it with `skip_serializing_if` so the `Absent` state drops the field
/// from the serialized object:
///
/// ```rust
/// use serde::Serialize;
/// use trellis_compiler::execution::Nullable;
///
/// #[derive(Serialize)]
/// struct User {
///     id: u64,
///     #[serde(skip_serializing_if = "Nullable::is_absent")]
///     name: Nullable<String>,
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Nullable<T> {
    /// The field is left out of the output object entirely.
    #[default]
    Absent,
    /// The field is present with the explicit value `null`.
    Null,
    /// The field is present with a value.
    Value(T),
}

impl<T> Nullable<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Nullable::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Nullable::Null)
    }

    pub fn value(&self) -> Option<&T> {
        if let Nullable::Value(value) = self {
            Some(value)
        } else {
            None
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Nullable<U> {
        match self {
            Nullable::Absent => Nullable::Absent,
            Nullable::Null => Nullable::Null,
            Nullable::Value(value) => Nullable::Value(f(value)),
        }
    }
}

/// A missing payload is an explicit `null`, not absence: wrapping a value
/// that turned out to be `None` still serializes the field.
impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            None => Nullable::Null,
            Some(value) => Nullable::Value(value),
        }
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            // `Absent` is normally dropped by `skip_serializing_if`; when
            // serialized anyway it degrades to `null`.
            Nullable::Absent | Nullable::Null => serializer.serialize_unit(),
            Nullable::Value(value) => value.serialize(serializer),
        }
    }
}

/// Restricts a resolver-produced result map to the fields actually selected
/// at this level, dropping anything else the resolver happened to return.
///
/// Only `Field` selections name response keys; inline fragments and fragment
/// spreads are ignored here.
pub fn exclude_unselected_fields(result: &JsonMap, selections: &[Selection]) -> JsonMap {
    let selected: HashSet<&str> = selections
        .iter()
        .filter_map(|selection| selection.as_field())
        .map(|field| field.name.as_str())
        .collect();

    let mut shaped = JsonMap::with_capacity(selected.len().min(result.len()));
    for (key, value) in result {
        if selected.contains(key.as_str()) {
            shaped.insert(key.clone(), value.clone());
        }
    }
    shaped
}
