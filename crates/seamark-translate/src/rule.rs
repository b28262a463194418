//! Transform rules and first-match resolution.
//!
//! A rule binds a PGN to a base-path template, optionally narrowed to
//! one manufacturer (for proprietary PGNs) and to an explicit field
//! allow-list. Rules are evaluated in configured order and the first
//! one matching a message wins.

use serde::{Deserialize, Deserializer, Serialize};

use seamark_core::{DecodedMessage, FieldMap, FieldValue, Scalar};

/// Field label carrying the manufacturer code in proprietary PGNs.
pub const MANUFACTURER_FIELD: &str = "Manufacturer Code";

/// One user-configured transform rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRule {
    /// The PGN this rule translates.
    pub pgn: u32,
    /// Base-path template; placeholders are expanded per message.
    #[serde(rename = "basePath")]
    pub base_path: String,
    /// Optional manufacturer filter for proprietary PGNs. Empty or
    /// absent matches any manufacturer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    /// Optional ordered allow-list of field labels. Accepts either a
    /// JSON list or the legacy comma-separated string form.
    #[serde(default, deserialize_with = "deserialize_field_list")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

impl TransformRule {
    pub fn new(pgn: u32, base_path: impl Into<String>) -> Self {
        Self {
            pgn,
            base_path: base_path.into(),
            manufacturer: None,
            fields: None,
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Whether this rule applies to a message.
    pub fn matches(&self, message: &DecodedMessage) -> bool {
        self.pgn == message.pgn && self.manufacturer_matches(&message.fields)
    }

    fn manufacturer_matches(&self, fields: &FieldMap) -> bool {
        let filter = match self.manufacturer.as_deref() {
            None | Some("") => return true,
            Some(filter) => filter,
        };
        matches!(
            fields.get(MANUFACTURER_FIELD),
            Some(FieldValue::Scalar(Scalar::String(code))) if code == filter
        )
    }

    /// The labels to emit for a message: the allow-list (trimmed, in
    /// listed order) when configured, otherwise every field in
    /// analyzer order.
    pub fn selected_labels(&self, fields: &FieldMap) -> Vec<String> {
        match &self.fields {
            Some(list) if !list.is_empty() => {
                list.iter().map(|label| label.trim().to_string()).collect()
            }
            _ => fields.labels().map(str::to_string).collect(),
        }
    }
}

/// Ordered rule list; earlier rules win ties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<TransformRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<TransformRule>) -> Self {
        Self { rules }
    }

    /// First rule matching the message, if any.
    pub fn resolve(&self, message: &DecodedMessage) -> Option<&TransformRule> {
        self.rules.iter().find(|rule| rule.matches(message))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransformRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<TransformRule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = TransformRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// Allow-list deserializer accepting `["a", "b"]` or `"a, b"`.
/// An empty list or blank string means "no allow-list".
fn deserialize_field_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Form {
        List(Vec<String>),
        Csv(String),
    }

    let labels = match Option::<Form>::deserialize(deserializer)? {
        None => None,
        Some(Form::List(list)) => Some(list),
        Some(Form::Csv(text)) => Some(
            text.split(',')
                .map(|label| label.trim().to_string())
                .filter(|label| !label.is_empty())
                .collect(),
        ),
    };
    Ok(labels.filter(|list| !list.is_empty()))
}
