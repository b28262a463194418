//! Base-path template resolution.
//!
//! A template like `"electrical.batteries.{Battery Instance}.capacity"`
//! is expanded per message. A placeholder is any substring delimited by
//! a `{` and the next `}`. The scan records all placeholder spans
//! first, resolves each distinct literal once (in order of first
//! appearance), then rebuilds the path by concatenating the untouched
//! segments with the resolved text. Resolved text is opaque and is
//! never re-scanned, so a value containing braces cannot trigger a
//! second substitution round.

use indexmap::IndexMap;

use seamark_core::{FieldMap, FieldValue};

use crate::normalize;
use crate::registry::{DeviceLookup, PROP_CAN_NAME};

/// A placeholder that could not be resolved. Resolution degrades to the
/// empty string and processing continues; the shell decides how loudly
/// to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderFailure {
    /// An instance placeholder with no usable instance number.
    InstanceUnavailable { name: String },
    /// A placeholder matching none of the resolution rules, or whose
    /// source had no value to offer.
    Unresolvable { name: String },
}

impl std::fmt::Display for PlaceholderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InstanceUnavailable { name } => {
                write!(f, "instance not found for placeholder '{name}'")
            }
            Self::Unresolvable { name } => {
                write!(f, "replacement not found for placeholder '{name}'")
            }
        }
    }
}

/// Result of expanding one template.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    pub path: String,
    pub failures: Vec<PlaceholderFailure>,
}

/// One placeholder occurrence: byte span including braces.
struct Span {
    start: usize,
    end: usize,
}

/// Record every `{...}` span, left to right.
fn placeholder_spans(template: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut from = 0;
    while let Some(open) = template[from..].find('{') {
        let open = from + open;
        match template[open + 1..].find('}') {
            Some(close) => {
                let end = open + 1 + close + 1;
                spans.push(Span { start: open, end });
                from = end;
            }
            None => break,
        }
    }
    spans
}

/// Expand all placeholders in a template.
///
/// Resolution rules, per distinct placeholder name:
/// 1. a field label present in the message → normalized field value
/// 2. a name containing "Instance" → the resolved instance number
/// 3. a name containing "Source" → the decimal source address
/// 4. a name containing "canName" → the device registry's `canName`
/// 5. anything else → empty string, with a failure diagnostic
pub fn resolve(
    template: &str,
    fields: &FieldMap,
    instance: Option<i64>,
    source: u8,
    registry: &dyn DeviceLookup,
) -> ResolvedPath {
    let spans = placeholder_spans(template);
    if spans.is_empty() {
        return ResolvedPath {
            path: template.to_string(),
            failures: Vec::new(),
        };
    }

    let mut failures = Vec::new();
    let mut resolutions: IndexMap<&str, String> = IndexMap::new();
    for span in &spans {
        let literal = &template[span.start..span.end];
        if resolutions.contains_key(literal) {
            continue;
        }
        let name = &literal[1..literal.len() - 1];
        let value = resolve_name(name, fields, instance, source, registry, &mut failures);
        resolutions.insert(literal, value);
    }

    let mut path = String::with_capacity(template.len());
    let mut cursor = 0;
    for span in &spans {
        path.push_str(&template[cursor..span.start]);
        let literal = &template[span.start..span.end];
        path.push_str(&resolutions[literal]);
        cursor = span.end;
    }
    path.push_str(&template[cursor..]);

    ResolvedPath { path, failures }
}

fn resolve_name(
    name: &str,
    fields: &FieldMap,
    instance: Option<i64>,
    source: u8,
    registry: &dyn DeviceLookup,
    failures: &mut Vec<PlaceholderFailure>,
) -> String {
    if let Some(value) = fields.get(name) {
        return match value {
            FieldValue::Scalar(scalar) => normalize::normalize(scalar).render(),
            // A repeated group has no path rendering; treat it like an
            // unresolvable placeholder.
            FieldValue::Group(_) => {
                failures.push(PlaceholderFailure::Unresolvable { name: name.into() });
                String::new()
            }
        };
    }

    if name.contains("Instance") {
        return match instance {
            Some(n) => n.to_string(),
            None => {
                failures.push(PlaceholderFailure::InstanceUnavailable { name: name.into() });
                String::new()
            }
        };
    }

    if name.contains("Source") {
        return source.to_string();
    }

    if name.contains("canName") {
        return match registry.device_property(source, PROP_CAN_NAME) {
            Some(value) => value.render(),
            None => {
                failures.push(PlaceholderFailure::Unresolvable { name: name.into() });
                String::new()
            }
        };
    }

    failures.push(PlaceholderFailure::Unresolvable { name: name.into() });
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{DeviceDescriptor, NullRegistry, RegistrySnapshot};
    use seamark_core::Scalar;

    fn resolve_plain(template: &str, fields: &FieldMap) -> ResolvedPath {
        resolve(template, fields, None, 0, &NullRegistry)
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        let out = resolve_plain("navigation.position", &FieldMap::new());
        assert_eq!(out.path, "navigation.position");
        assert!(out.failures.is_empty());
    }

    #[test]
    fn field_placeholder_uses_normalized_value() {
        let mut fields = FieldMap::new();
        fields.insert("Mode", Scalar::String("Race Mode".into()));
        let out = resolve_plain("sailing.{Mode}.trim", &fields);
        assert_eq!(out.path, "sailing.raceMode.trim");
    }

    #[test]
    fn instance_placeholder_resolves_from_instance_number() {
        let out = resolve("boats.{Instance}.battery", &FieldMap::new(), Some(2), 0, &NullRegistry);
        assert_eq!(out.path, "boats.2.battery");
        assert!(out.failures.is_empty());
    }

    #[test]
    fn missing_instance_degrades_to_empty_with_diagnostic() {
        let out = resolve_plain("boats.{Instance}.battery", &FieldMap::new());
        assert_eq!(out.path, "boats..battery");
        assert_eq!(
            out.failures,
            vec![PlaceholderFailure::InstanceUnavailable {
                name: "Instance".into()
            }]
        );
    }

    #[test]
    fn source_placeholder_renders_decimal_address() {
        let out = resolve("sensors.{Source}", &FieldMap::new(), None, 42, &NullRegistry);
        assert_eq!(out.path, "sensors.42");
    }

    #[test]
    fn can_name_placeholder_queries_registry() {
        let mut reg = RegistrySnapshot::new();
        reg.insert(
            "buses",
            "gps",
            DeviceDescriptor::new("9").with_property(PROP_CAN_NAME, Scalar::String("feedc0de".into())),
        );
        let out = resolve("devices.{canName}", &FieldMap::new(), None, 9, &reg);
        assert_eq!(out.path, "devices.feedc0de");
    }

    #[test]
    fn unknown_placeholder_is_empty_with_diagnostic() {
        let out = resolve_plain("a.{Bogus}.b", &FieldMap::new());
        assert_eq!(out.path, "a..b");
        assert_eq!(
            out.failures,
            vec![PlaceholderFailure::Unresolvable {
                name: "Bogus".into()
            }]
        );
    }

    #[test]
    fn duplicate_placeholders_share_one_resolution() {
        let mut fields = FieldMap::new();
        fields.insert("Side", Scalar::String("Port".into()));
        let out = resolve_plain("{Side}.depth.{Side}", &fields);
        assert_eq!(out.path, "port.depth.port");
        assert!(out.failures.is_empty());
    }

    #[test]
    fn resolved_text_is_not_rescanned() {
        // A resolved value containing a brace-delimited literal
        // identical to another placeholder must stay opaque. Registry
        // properties render raw, so that is where braces can appear.
        let mut reg = RegistrySnapshot::new();
        reg.insert(
            "buses",
            "odd",
            DeviceDescriptor::new("3").with_property(PROP_CAN_NAME, Scalar::String("{Mode}".into())),
        );
        let mut fields = FieldMap::new();
        fields.insert("Mode", Scalar::String("race".into()));
        let out = resolve("x.{canName}.{Mode}", &fields, None, 3, &reg);
        assert_eq!(out.path, "x.{Mode}.race");
        assert!(out.failures.is_empty());
    }

    #[test]
    fn unterminated_brace_is_literal() {
        let out = resolve_plain("a.{Open", &FieldMap::new());
        assert_eq!(out.path, "a.{Open");
        assert!(out.failures.is_empty());
    }
}
