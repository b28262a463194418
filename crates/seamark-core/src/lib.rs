//! Seamark core crate.
//!
//! Shared building blocks for the Seamark marine-data suite:
//!
//! - **Decoded-message model**: labeled fields with explicit
//!   scalar/repeated-group tagging, in analyzer order
//! - **Message bus**: named broadcast channels the host uses to fan
//!   decoded messages out to listeners
//! - **Error vocabulary**: the error type crossing crate boundaries

pub mod bus;
pub mod error;
pub mod message;

pub use bus::{ANALYZER_CHANNEL, DEFAULT_CHANNEL_CAPACITY, MessageBus};
pub use error::{Error, Result};
pub use message::{DecodedMessage, FieldMap, FieldValue, GroupRecord, Scalar};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
