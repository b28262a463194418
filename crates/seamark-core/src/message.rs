//! Decoded marine-network message model.
//!
//! A network analyzer upstream parses raw frames into labeled fields and
//! publishes the result on the host message bus. This module models that
//! decoded form: a PGN identifier, the bus source address of the sender,
//! and an insertion-ordered mapping from field label to value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single decoded field value that is not a repeated group.
///
/// Deserializes untagged, so analyzer output like `"Airmar"`, `42`,
/// `23.5`, `true` or `null` maps directly onto the matching variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Null,
}

impl Scalar {
    /// Interpret this value as an integer, if it is one.
    ///
    /// Strings must parse in full (after trimming); floats qualify only
    /// when they carry no fractional part.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render this value as path-safe text. `Null` renders empty.
    pub fn render(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Integer(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => s.clone(),
            Self::Null => String::new(),
        }
    }

    /// The empty-string value emitted for missing data.
    pub fn empty() -> Self {
        Self::String(String::new())
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// One nested record inside a repeated group, in field order.
pub type GroupRecord = IndexMap<String, Scalar>;

/// A decoded field value: either a scalar or a repeated group.
///
/// Some PGNs carry a list of nested records within a single field (a
/// list of satellite or target reports, for example). Consumers match
/// on the tag instead of probing for list-ness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Group(Vec<GroupRecord>),
    Scalar(Scalar),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::Group(_) => None,
        }
    }
}

impl From<Scalar> for FieldValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

/// Insertion-ordered mapping from field label to decoded value.
///
/// Lookup by label is explicit: `get` returns `None` for a label the
/// analyzer did not emit, which is distinct from an empty value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap {
    entries: IndexMap<String, FieldValue>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, keeping insertion order. A re-inserted label
    /// keeps its original position.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<FieldValue>) {
        self.entries.insert(label.into(), value.into());
    }

    pub fn get(&self, label: &str) -> Option<&FieldValue> {
        self.entries.get(label)
    }

    /// Iterate labels and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A decoded message as delivered by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedMessage {
    /// Numeric message-type identifier.
    pub pgn: u32,
    /// Bus source address of the emitting device.
    #[serde(rename = "src")]
    pub source: u8,
    /// Decoded fields in analyzer order.
    #[serde(default)]
    pub fields: FieldMap,
}

impl DecodedMessage {
    pub fn new(pgn: u32, source: u8) -> Self {
        Self {
            pgn,
            source,
            fields: FieldMap::new(),
        }
    }

    /// Builder-style field insertion, mainly for tests and examples.
    pub fn with_field(mut self, label: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(label, value);
        self
    }
}
