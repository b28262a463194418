//! Logical instance resolution.
//!
//! Many PGNs carry their own instance field ("Battery Instance",
//! "Engine Instance"); when a message does not, the persisted
//! `deviceInstance` of the sending device is the fallback. The resolved
//! value is only used during template substitution.

use tracing::debug;

use seamark_core::{FieldMap, FieldValue};

use crate::registry::{DeviceLookup, PROP_DEVICE_INSTANCE};

/// Resolve the logical instance number for a message.
///
/// Scans fields in analyzer order for the first label containing
/// "Instance" whose value is interpretable as an integer; otherwise
/// falls back to the device registry.
pub fn resolve_instance(
    fields: &FieldMap,
    source: u8,
    registry: &dyn DeviceLookup,
) -> Option<i64> {
    for (label, value) in fields.iter() {
        if !label.contains("Instance") {
            continue;
        }
        if let FieldValue::Scalar(scalar) = value {
            if let Some(instance) = scalar.as_integer() {
                debug!(label, instance, "found data instance");
                return Some(instance);
            }
        }
    }

    registry
        .device_property(source, PROP_DEVICE_INSTANCE)
        .and_then(|value| value.as_integer())
}
