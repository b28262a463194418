//! Host message bus carrying decoded messages on named channels.
//!
//! The bus distributes each published message to every subscriber of
//! its channel via a tokio broadcast channel. Channels are created
//! lazily on first use; dropping a receiver is the only deregistration
//! step, so unsubscribing is always safe even for a listener that never
//! subscribed.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tracing::debug;

use crate::message::DecodedMessage;

/// Default number of messages buffered per channel for slow subscribers.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Channel on which the network analyzer publishes decoded messages.
pub const ANALYZER_CHANNEL: &str = "N2KAnalyzerOut";

/// Named-channel broadcast bus for decoded messages.
///
/// Cloning the bus yields another handle to the same channel set.
#[derive(Clone)]
pub struct MessageBus {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<DecodedMessage>>>>,
    capacity: usize,
}

impl MessageBus {
    /// Create a bus with the default per-channel capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus with the given per-channel buffer capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    fn sender(&self, channel: &str) -> broadcast::Sender<DecodedMessage> {
        if let Some(tx) = self.channels.read().expect("bus lock poisoned").get(channel) {
            return tx.clone();
        }
        let mut channels = self.channels.write().expect("bus lock poisoned");
        channels
            .entry(channel.to_string())
            .or_insert_with(|| {
                debug!(channel, "creating bus channel");
                broadcast::channel(self.capacity).0
            })
            .clone()
    }

    /// Publish a message on a channel.
    ///
    /// Returns `true` if at least one subscriber received it; a message
    /// published to a channel nobody listens on is discarded.
    pub fn publish(&self, channel: &str, message: DecodedMessage) -> bool {
        self.sender(channel).send(message).is_ok()
    }

    /// Subscribe to a channel, creating it if needed.
    pub fn subscribe(&self, channel: &str) -> broadcast::Receiver<DecodedMessage> {
        self.sender(channel).subscribe()
    }

    /// Number of live subscribers on a channel.
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .read()
            .expect("bus lock poisoned")
            .get(channel)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}
