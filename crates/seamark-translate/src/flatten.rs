//! Field flattening into ordered (path, value) pairs.
//!
//! Scalar fields emit one entry under the base path. Repeated-group
//! fields flatten one entry per nested property, with the record index
//! as a path segment. Absent data never suppresses a path entry; it
//! degrades to an empty-string value. This stage never fails.

use seamark_core::{FieldMap, FieldValue, Scalar};

use crate::normalize::camel_case;
use crate::update::{PathValue, Update};

/// Build the ordered value list for the selected labels.
pub fn build_update(base_path: &str, labels: &[String], fields: &FieldMap) -> Update {
    let mut values = Vec::new();

    for label in labels {
        match fields.get(label) {
            Some(FieldValue::Group(records)) => {
                for (index, record) in records.iter().enumerate() {
                    for (property, value) in record {
                        values.push(PathValue::new(
                            format!(
                                "{base_path}.{}.{index}.{}",
                                camel_case(label),
                                camel_case(property)
                            ),
                            value.clone(),
                        ));
                    }
                }
            }
            Some(FieldValue::Scalar(value)) => {
                values.push(PathValue::new(
                    format!("{base_path}.{}", camel_case(label)),
                    value.clone(),
                ));
            }
            None => {
                values.push(PathValue::new(
                    format!("{base_path}.{}", camel_case(label)),
                    Scalar::empty(),
                ));
            }
        }
    }

    Update { values }
}
