// SPDX-License-Identifier: AGPL-3.0-or-later
use rdkafka::error::KafkaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProducerError {
    #[error("Kafka client error: {0}")]
    Client(#[from] KafkaError),

    #[error("Signal registration error: {0}")]
    Signal(#[from] std::io::Error),
}
