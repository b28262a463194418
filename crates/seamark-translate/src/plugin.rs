//! Plugin lifecycle shell around the translation pipeline.
//!
//! The shell subscribes to the analyzer channel on the host bus, runs
//! the pipeline once per inbound message, and submits each non-empty
//! delta to the injected ingestion sink. Failures are confined to the
//! message that caused them: the listener logs and moves on, so one bad
//! message never stalls the stream.

use std::sync::{Arc, RwLock as StdRwLock};

use async_trait::async_trait;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use seamark_core::{ANALYZER_CHANNEL, DecodedMessage, MessageBus};

use crate::config::TranslatorConfig;
use crate::error::{Result, TranslateError};
use crate::pipeline::Translator;
use crate::registry::DeviceLookup;
use crate::update::Delta;

/// Stable identifier tagged onto every submitted update.
pub const PLUGIN_ID: &str = "seamark-pgn-translate";
pub const PLUGIN_NAME: &str = "Generic PGN Translate";
pub const PLUGIN_DESCRIPTION: &str =
    "Translates PGNs not natively understood by the host into path/value updates.";

/// Host ingestion entry point for produced deltas.
#[async_trait]
pub trait UpdateSink: Send + Sync {
    /// Accept one delta, tagged with the emitting subsystem.
    async fn handle_update(&self, source: &str, delta: &Delta) -> Result<()>;
}

/// In-memory sink collecting every submitted delta. Used by tests and
/// by embedding hosts that drain updates themselves.
#[derive(Default)]
pub struct MemorySink {
    deltas: tokio::sync::RwLock<Vec<(String, Delta)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn deltas(&self) -> Vec<(String, Delta)> {
        self.deltas.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.deltas.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.deltas.read().await.is_empty()
    }
}

#[async_trait]
impl UpdateSink for MemorySink {
    async fn handle_update(&self, source: &str, delta: &Delta) -> Result<()> {
        self.deltas
            .write()
            .await
            .push((source.to_string(), delta.clone()));
        Ok(())
    }
}

/// Listener task handle; present while the plugin is started.
type ListenerHandle = StdRwLock<Option<JoinHandle<()>>>;

/// The PGN translation plugin.
pub struct PgnTranslate {
    bus: MessageBus,
    registry: Arc<dyn DeviceLookup>,
    sink: Arc<dyn UpdateSink>,
    translator: Arc<Translator>,
    listener: ListenerHandle,
}

impl PgnTranslate {
    /// Build the plugin from a validated configuration and its host
    /// collaborators.
    pub fn new(
        config: TranslatorConfig,
        bus: MessageBus,
        registry: Arc<dyn DeviceLookup>,
        sink: Arc<dyn UpdateSink>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            bus,
            registry,
            sink,
            translator: Arc::new(Translator::new(config.pgns)),
            listener: StdRwLock::new(None),
        })
    }

    /// Subscribe to the analyzer channel and start processing.
    /// Calling `start` on a running plugin is a no-op.
    pub fn start(&self) {
        let mut listener = self.listener.write().expect("listener lock poisoned");
        if listener.is_some() {
            debug!(plugin = PLUGIN_ID, "already started");
            return;
        }
        if self.translator.rules().is_empty() {
            warn!(plugin = PLUGIN_ID, "no transform rules configured; translation is idle");
        }

        let mut rx = self.bus.subscribe(ANALYZER_CHANNEL);
        let translator = Arc::clone(&self.translator);
        let registry = Arc::clone(&self.registry);
        let sink = Arc::clone(&self.sink);

        *listener = Some(tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(message) => {
                        if let Err(e) =
                            process(&translator, registry.as_ref(), sink.as_ref(), &message).await
                        {
                            error!(
                                pgn = message.pgn,
                                source = message.source,
                                error = %e,
                                "message processing failed"
                            );
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "listener lagged behind the analyzer; messages dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }));
        debug!(plugin = PLUGIN_ID, channel = ANALYZER_CHANNEL, "started");
    }

    /// Stop processing and drop the subscription. Safe to call on a
    /// plugin that was never started, and safe to call twice.
    pub fn stop(&self) {
        if let Some(handle) = self
            .listener
            .write()
            .expect("listener lock poisoned")
            .take()
        {
            handle.abort();
            debug!(plugin = PLUGIN_ID, "stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.listener
            .read()
            .expect("listener lock poisoned")
            .is_some()
    }
}

/// One message, one isolated pipeline run.
async fn process(
    translator: &Translator,
    registry: &dyn DeviceLookup,
    sink: &dyn UpdateSink,
    message: &DecodedMessage,
) -> Result<()> {
    let Some(translation) = translator.translate(registry, message) else {
        return Ok(());
    };

    for failure in &translation.failures {
        error!(pgn = message.pgn, source = message.source, %failure, "placeholder resolution failed");
    }

    if translation.delta.is_empty() {
        return Ok(());
    }

    let json = serde_json::to_string(&translation.delta)
        .map_err(|e| TranslateError::Serialization(e.to_string()))?;
    debug!(delta = %json, "emitting delta");

    sink.handle_update(PLUGIN_ID, &translation.delta).await
}
