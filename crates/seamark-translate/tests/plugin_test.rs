//! Plugin shell tests: bus subscription, submission, isolation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use seamark_core::{ANALYZER_CHANNEL, DecodedMessage, MessageBus, Scalar};
use seamark_translate::{
    Delta, MemorySink, NullRegistry, PgnTranslate, PLUGIN_ID, TransformRule, TranslateError,
    TranslatorConfig, UpdateSink,
};

fn config(rules: Vec<TransformRule>) -> TranslatorConfig {
    TranslatorConfig {
        pgns: rules.into_iter().collect(),
    }
}

async fn wait_for_deltas(sink: &MemorySink, count: usize) {
    for _ in 0..100 {
        if sink.len().await >= count {
            return;
        }
        sleep(Duration::from_millis(5)).await;
    }
    panic!("sink never reached {count} deltas");
}

#[tokio::test]
async fn translated_messages_reach_the_sink_tagged() {
    let bus = MessageBus::new();
    let sink = Arc::new(MemorySink::new());
    let plugin = PgnTranslate::new(
        config(vec![TransformRule::new(127508, "electrical.batteries.0")]),
        bus.clone(),
        Arc::new(NullRegistry),
        Arc::clone(&sink) as Arc<dyn UpdateSink>,
    )
    .unwrap();

    plugin.start();
    bus.publish(
        ANALYZER_CHANNEL,
        DecodedMessage::new(127508, 5).with_field("Voltage", Scalar::Float(12.8)),
    );

    wait_for_deltas(&sink, 1).await;
    let deltas = sink.deltas().await;
    assert_eq!(deltas[0].0, PLUGIN_ID);
    assert_eq!(
        deltas[0].1.updates[0].values[0].path,
        "electrical.batteries.0.voltage"
    );
    plugin.stop();
}

#[tokio::test]
async fn unmatched_messages_are_dropped_silently() {
    let bus = MessageBus::new();
    let sink = Arc::new(MemorySink::new());
    let plugin = PgnTranslate::new(
        config(vec![TransformRule::new(127508, "electrical.batteries.0")]),
        bus.clone(),
        Arc::new(NullRegistry),
        Arc::clone(&sink) as Arc<dyn UpdateSink>,
    )
    .unwrap();

    plugin.start();
    bus.publish(ANALYZER_CHANNEL, DecodedMessage::new(130306, 9));
    bus.publish(
        ANALYZER_CHANNEL,
        DecodedMessage::new(127508, 5).with_field("Voltage", Scalar::Float(12.8)),
    );

    // Only the matching message produces a delta.
    wait_for_deltas(&sink, 1).await;
    sleep(Duration::from_millis(20)).await;
    assert_eq!(sink.len().await, 1);
    plugin.stop();
}

#[tokio::test]
async fn empty_deltas_are_not_submitted() {
    let bus = MessageBus::new();
    let sink = Arc::new(MemorySink::new());
    let plugin = PgnTranslate::new(
        config(vec![TransformRule::new(60928, "devices")]),
        bus.clone(),
        Arc::new(NullRegistry),
        Arc::clone(&sink) as Arc<dyn UpdateSink>,
    )
    .unwrap();

    plugin.start();
    // Matching PGN but no fields at all: nothing to flatten.
    bus.publish(ANALYZER_CHANNEL, DecodedMessage::new(60928, 2));
    bus.publish(
        ANALYZER_CHANNEL,
        DecodedMessage::new(60928, 2).with_field("NAME", Scalar::Integer(42)),
    );

    wait_for_deltas(&sink, 1).await;
    assert_eq!(sink.len().await, 1);
    plugin.stop();
}

/// Sink that rejects every delta, for exercising per-message isolation.
struct RejectingSink {
    inner: MemorySink,
}

#[async_trait]
impl UpdateSink for RejectingSink {
    async fn handle_update(&self, source: &str, delta: &Delta) -> seamark_translate::Result<()> {
        self.inner.handle_update(source, delta).await?;
        Err(TranslateError::Ingest("ingestion refused".into()))
    }
}

#[tokio::test]
async fn sink_failure_does_not_stop_the_listener() {
    let bus = MessageBus::new();
    let sink = Arc::new(RejectingSink {
        inner: MemorySink::new(),
    });
    let plugin = PgnTranslate::new(
        config(vec![TransformRule::new(127508, "electrical.batteries.0")]),
        bus.clone(),
        Arc::new(NullRegistry),
        Arc::clone(&sink) as Arc<dyn UpdateSink>,
    )
    .unwrap();

    plugin.start();
    for _ in 0..3 {
        bus.publish(
            ANALYZER_CHANNEL,
            DecodedMessage::new(127508, 5).with_field("Voltage", Scalar::Float(12.8)),
        );
    }

    // Every attempt failed at the sink, yet all three were processed.
    wait_for_deltas(&sink.inner, 3).await;
    assert!(plugin.is_running());
    plugin.stop();
}

#[tokio::test]
async fn restart_resumes_processing() {
    let bus = MessageBus::new();
    let sink = Arc::new(MemorySink::new());
    let plugin = PgnTranslate::new(
        config(vec![TransformRule::new(127508, "electrical.batteries.0")]),
        bus.clone(),
        Arc::new(NullRegistry),
        Arc::clone(&sink) as Arc<dyn UpdateSink>,
    )
    .unwrap();

    plugin.start();
    bus.publish(
        ANALYZER_CHANNEL,
        DecodedMessage::new(127508, 5).with_field("Voltage", Scalar::Float(12.8)),
    );
    wait_for_deltas(&sink, 1).await;

    plugin.stop();
    plugin.start();
    bus.publish(
        ANALYZER_CHANNEL,
        DecodedMessage::new(127508, 5).with_field("Voltage", Scalar::Float(12.9)),
    );
    wait_for_deltas(&sink, 2).await;
    plugin.stop();
}
