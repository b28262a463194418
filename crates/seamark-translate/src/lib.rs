//! Rule-driven PGN translation.
//!
//! This crate turns decoded marine-network messages into structured
//! path/value updates, driven by user-supplied transform rules:
//!
//! - **Rule resolution**: first matching rule per message, with
//!   optional manufacturer narrowing for proprietary PGNs
//! - **Template expansion**: `{placeholder}` substitution against
//!   message fields, the logical instance, the source address and the
//!   device registry
//! - **Label normalization**: analyzer display names become camelCase
//!   path tokens
//! - **Flattening**: scalar fields and nested repeated groups become an
//!   ordered list of (path, value) pairs
//!
//! The pipeline is a pure function of (rule set, registry snapshot,
//! message); the [`plugin`] module wraps it in a start/stop shell bound
//! to the host message bus.
//!
//! ## Example
//!
//! ```rust
//! use seamark_core::{DecodedMessage, Scalar};
//! use seamark_translate::{NullRegistry, RuleSet, TransformRule, Translator};
//!
//! let rules = RuleSet::new(vec![TransformRule::new(
//!     127508,
//!     "electrical.batteries.{Battery Instance}",
//! )]);
//! let translator = Translator::new(rules);
//!
//! let message = DecodedMessage::new(127508, 5)
//!     .with_field("Battery Instance", Scalar::Integer(1))
//!     .with_field("Voltage", Scalar::Float(12.8));
//!
//! let translation = translator.translate(&NullRegistry, &message).unwrap();
//! let first = &translation.delta.updates[0].values[0];
//! assert_eq!(first.path, "electrical.batteries.1.batteryInstance");
//! ```

pub mod config;
pub mod error;
pub mod flatten;
pub mod instance;
pub mod normalize;
pub mod pipeline;
pub mod plugin;
pub mod registry;
pub mod rule;
pub mod template;
pub mod update;

pub use config::TranslatorConfig;
pub use error::{Result, TranslateError};
pub use instance::resolve_instance;
pub use normalize::camel_case;
pub use pipeline::{Translation, Translator};
pub use plugin::{
    MemorySink, PLUGIN_DESCRIPTION, PLUGIN_ID, PLUGIN_NAME, PgnTranslate, UpdateSink,
};
pub use registry::{
    DeviceDescriptor, DeviceEntry, DeviceLookup, NullRegistry, RegistrySnapshot,
    PROP_CAN_NAME, PROP_DEVICE_INSTANCE,
};
pub use rule::{MANUFACTURER_FIELD, RuleSet, TransformRule};
pub use template::{PlaceholderFailure, ResolvedPath};
pub use update::{Delta, PathValue, Update};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
