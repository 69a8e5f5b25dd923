// SPDX-License-Identifier: AGPL-3.0-or-later
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use rdkafka::client::ClientContext;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::message::Message;
use rdkafka::producer::{BaseRecord, DeliveryResult, Producer, ProducerContext, ThreadedProducer};
use rdkafka::util::get_rdkafka_version;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::ProducerConfig;
use crate::error::ProducerError;
use crate::event::DeliveryEvent;
use crate::message::OutboundMessage;

/// How long to wait before retrying when librdkafka's local queue is full.
const QUEUE_FULL_BACKOFF: Duration = Duration::from_millis(100);

/// Where the produce loop hands messages off. Implementations own batching,
/// retries and delivery reporting.
#[allow(async_fn_in_trait)]
pub trait Sink {
    /// Suspends while the client applies backpressure.
    async fn submit(&self, message: OutboundMessage) -> Result<(), ProducerError>;

    /// Messages submitted but not yet reported delivered or failed.
    fn in_flight(&self) -> usize;

    /// Waits up to `timeout` for in-flight messages; returns how many are
    /// still outstanding afterwards.
    async fn flush(&self, timeout: Duration) -> usize;
}

/// Forwards delivery reports and client errors into a channel instead of
/// handling them on librdkafka's polling thread.
pub struct EventContext {
    events: UnboundedSender<DeliveryEvent>,
}

impl EventContext {
    pub fn new(events: UnboundedSender<DeliveryEvent>) -> Self {
        Self { events }
    }

    fn forward(&self, event: DeliveryEvent) {
        // Receiver gone means we are shutting down.
        let _ = self.events.send(event);
    }
}

impl ClientContext for EventContext {
    fn error(&self, error: KafkaError, reason: &str) {
        self.forward(DeliveryEvent::ClientError {
            error: error.to_string(),
            reason: reason.to_string(),
        });
    }

    fn stats_raw(&self, statistics: &[u8]) {
        self.forward(DeliveryEvent::Unhandled {
            kind: "stats",
            detail: format!("{} bytes of statistics", statistics.len()),
        });
    }
}

impl ProducerContext for EventContext {
    type DeliveryOpaque = ();

    fn delivery(&self, result: &DeliveryResult<'_>, _: Self::DeliveryOpaque) {
        let event = match result {
            Ok(msg) => DeliveryEvent::Delivered {
                topic: msg.topic().to_string(),
                partition: msg.partition(),
                offset: msg.offset(),
            },
            Err((error, msg)) => DeliveryEvent::Failed {
                topic: msg.topic().to_string(),
                partition: msg.partition(),
                error: error.to_string(),
            },
        };
        self.forward(event);
    }
}

/// librdkafka producer with its own polling thread. Dropping it closes the
/// event channel.
pub struct KafkaProducer {
    producer: Arc<ThreadedProducer<EventContext>>,
}

impl KafkaProducer {
    pub fn create(
        config: &ProducerConfig,
        events: UnboundedSender<DeliveryEvent>,
    ) -> Result<Self, ProducerError> {
        let producer = config
            .client_config()
            .create_with_context(EventContext::new(events))?;
        Ok(Self {
            producer: Arc::new(producer),
        })
    }
}

impl Sink for KafkaProducer {
    async fn submit(&self, message: OutboundMessage) -> Result<(), ProducerError> {
        let mut record =
            BaseRecord::<(), [u8]>::to(&message.topic).payload(message.payload.as_slice());
        loop {
            match self.producer.send(record) {
                Ok(()) => return Ok(()),
                Err((KafkaError::MessageProduction(RDKafkaErrorCode::QueueFull), rejected)) => {
                    debug!("local queue full, retrying in {:?}", QUEUE_FULL_BACKOFF);
                    record = rejected;
                    tokio::time::sleep(QUEUE_FULL_BACKOFF).await;
                }
                Err((e, _)) => return Err(e.into()),
            }
        }
    }

    fn in_flight(&self) -> usize {
        self.producer.in_flight_count().max(0) as usize
    }

    async fn flush(&self, timeout: Duration) -> usize {
        let producer = Arc::clone(&self.producer);
        // A timed-out flush is reported through the remaining count.
        match tokio::task::spawn_blocking(move || producer.flush(timeout)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!("flush ended early: {}", e),
            Err(e) => warn!("flush task failed: {}", e),
        }
        self.in_flight()
    }
}

/// `(version, linkage)` of the librdkafka this binary runs against.
pub fn library_info() -> (String, &'static str) {
    let (_, version) = get_rdkafka_version();
    let linkage = if cfg!(feature = "dynamic-linking") {
        "dynamic"
    } else {
        "static"
    };
    (version, linkage)
}
