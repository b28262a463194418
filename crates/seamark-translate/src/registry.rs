//! Read-only device registry lookup.
//!
//! The host maintains per-source device descriptors (hardware identity,
//! persisted instance numbers) keyed by the descriptors' recorded bus
//! source address. The pipeline consumes a point-in-time snapshot
//! through the [`DeviceLookup`] seam and never mutates or retains it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use seamark_core::Scalar;

/// Persisted instance number property.
pub const PROP_DEVICE_INSTANCE: &str = "deviceInstance";
/// Hardware identity property.
pub const PROP_CAN_NAME: &str = "canName";

/// Read-only lookup of a named property for a bus source address.
pub trait DeviceLookup: Send + Sync {
    /// Returns the property value, or `None` when no descriptor for the
    /// source address records it.
    fn device_property(&self, source: u8, property: &str) -> Option<Scalar>;
}

/// Lookup for hosts without a device store. Every query is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRegistry;

impl DeviceLookup for NullRegistry {
    fn device_property(&self, _source: u8, _property: &str) -> Option<Scalar> {
        None
    }
}

/// Network-level descriptor of one device: its recorded source address
/// plus arbitrary named properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Source address as recorded by the host, kept as text.
    #[serde(rename = "src")]
    pub source: String,
    #[serde(flatten)]
    pub properties: HashMap<String, Scalar>,
}

impl DeviceDescriptor {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: Scalar) -> Self {
        self.properties.insert(name.into(), value);
        self
    }
}

/// One registry entry; the network descriptor is optional because the
/// host also tracks devices reachable over other transports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceEntry {
    #[serde(rename = "n2k", default, skip_serializing_if = "Option::is_none")]
    pub network: Option<DeviceDescriptor>,
}

/// Point-in-time snapshot of the host's device registry.
///
/// Two levels of grouping mirror the host layout: transport group →
/// device id → entry. Lookup scans for a descriptor whose recorded
/// source address equals the queried address, string-compared; at most
/// one entry is expected to match, so no ordering guarantee is needed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrySnapshot {
    groups: HashMap<String, HashMap<String, DeviceEntry>>,
}

impl RegistrySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        group: impl Into<String>,
        device_id: impl Into<String>,
        descriptor: DeviceDescriptor,
    ) {
        self.groups.entry(group.into()).or_default().insert(
            device_id.into(),
            DeviceEntry {
                network: Some(descriptor),
            },
        );
    }
}

impl DeviceLookup for RegistrySnapshot {
    fn device_property(&self, source: u8, property: &str) -> Option<Scalar> {
        debug!(source, property, "looking up device property");
        let wanted = source.to_string();
        for entries in self.groups.values() {
            for entry in entries.values() {
                let Some(descriptor) = &entry.network else {
                    continue;
                };
                if descriptor.source == wanted {
                    if let Some(value) = descriptor.properties.get(property) {
                        debug!(source, property, %value, "found device property");
                        return Some(value.clone());
                    }
                }
            }
        }
        None
    }
}
