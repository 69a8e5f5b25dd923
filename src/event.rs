// SPDX-License-Identifier: AGPL-3.0-or-later
use std::fmt;

use log::{Level, log};
use tokio::sync::mpsc::UnboundedReceiver;

/// Something the client reported asynchronously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryEvent {
    Delivered {
        topic: String,
        partition: i32,
        offset: i64,
    },
    /// The message reached its final state without being written.
    Failed {
        topic: String,
        partition: i32,
        error: String,
    },
    /// Connection-level or global error. The client retries on its own.
    ClientError { error: String, reason: String },
    Unhandled { kind: &'static str, detail: String },
}

impl DeliveryEvent {
    pub fn level(&self) -> Level {
        match self {
            DeliveryEvent::Delivered { .. } => Level::Info,
            DeliveryEvent::Failed { .. } => Level::Error,
            DeliveryEvent::ClientError { .. } => Level::Warn,
            DeliveryEvent::Unhandled { .. } => Level::Info,
        }
    }
}

impl fmt::Display for DeliveryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryEvent::Delivered {
                topic,
                partition,
                offset,
            } => write!(f, "Delivered message to {topic}[{partition}]@{offset}"),
            DeliveryEvent::Failed {
                topic,
                partition,
                error,
            } => write!(f, "Delivery error: {topic}[{partition}]: {error}"),
            DeliveryEvent::ClientError { error, reason } => {
                write!(f, "Error: {error} ({reason})")
            }
            DeliveryEvent::Unhandled { kind, detail } => {
                write!(f, "Unhandled event {kind} ignored: {detail}")
            }
        }
    }
}

pub fn log_event(event: &DeliveryEvent) {
    log!(event.level(), "{event}");
}

/// Logs every event until the client drops its sender.
pub async fn log_events(mut events: UnboundedReceiver<DeliveryEvent>) {
    while let Some(event) = events.recv().await {
        log_event(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn failures_include_partition() {
        let ev = DeliveryEvent::Failed {
            topic: "t".into(),
            partition: -1,
            error: "Message timed out".into(),
        };
        assert_eq!(ev.level(), Level::Error);
        assert_eq!(ev.to_string(), "Delivery error: t[-1]: Message timed out");
    }

    #[test]
    fn levels_follow_event_kind() {
        let delivered = DeliveryEvent::Delivered {
            topic: "t".into(),
            partition: 0,
            offset: 42,
        };
        assert_eq!(delivered.level(), Level::Info);
        assert_eq!(delivered.to_string(), "Delivered message to t[0]@42");

        let client = DeliveryEvent::ClientError {
            error: "Local: Broker transport failure".into(),
            reason: "b:9092/bootstrap: Connect failed".into(),
        };
        assert_eq!(client.level(), Level::Warn);

        let other = DeliveryEvent::Unhandled {
            kind: "stats",
            detail: "512 bytes".into(),
        };
        assert_eq!(other.level(), Level::Info);
        assert!(other.to_string().starts_with("Unhandled event stats ignored"));
    }

    #[tokio::test]
    async fn logger_runs_until_sender_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(log_events(rx));
        for offset in 0..3 {
            tx.send(DeliveryEvent::Delivered {
                topic: "t".into(),
                partition: 0,
                offset,
            })
            .unwrap();
        }
        drop(tx);
        task.await.unwrap();
    }
}
