// SPDX-License-Identifier: AGPL-3.0-or-later
//! Minimal stdin-to-Kafka line producer:
//! - One thread reads stdin and forwards each non-empty line.
//! - The main task submits lines to the topic until EOF or a signal.
//! - One task logs delivery reports and client errors as they arrive.
//!
//! Shutdown: stop intake, flush in-flight messages for at most the
//! message timeout plus a grace period, then release the client.

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod input;
pub mod message;
pub mod produce;
pub mod signal;

pub use client::{KafkaProducer, Sink};
pub use config::{Cli, ProducerConfig};
pub use error::ProducerError;
pub use event::DeliveryEvent;
pub use message::OutboundMessage;
pub use produce::{Outcome, StopReason};
pub use signal::Termination;

/// Per-message delivery timeout handed to librdkafka. Kept short so the
/// demo fails fast against an unreachable broker.
pub const MESSAGE_TIMEOUT_MS: u64 = 5000;

/// Added on top of the message timeout when flushing at shutdown.
pub const FLUSH_GRACE_MS: u64 = 1000;
