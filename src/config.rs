// SPDX-License-Identifier: AGPL-3.0-or-later
use std::ffi::OsString;
use std::time::Duration;

use clap::Parser;
use rdkafka::ClientConfig;

use crate::{FLUSH_GRACE_MS, MESSAGE_TIMEOUT_MS};

/// Command line: exactly a broker list and a topic.
#[derive(Debug, Parser)]
#[command(
    name = "kpipe",
    about = "Produce stdin lines to a Kafka topic",
    disable_help_flag = true
)]
pub struct Cli {
    /// Bootstrap broker list, e.g. `localhost:9092`.
    #[arg(allow_hyphen_values = true)]
    pub broker: String,

    /// Topic every line is produced to.
    #[arg(allow_hyphen_values = true)]
    pub topic: String,
}

impl Cli {
    /// Takes the two arguments after the program name verbatim, so values
    /// like `-events` or `--` are a broker or topic, never a flag. Any
    /// other argument count is `None`.
    pub fn from_args<I, T>(args: I) -> Option<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        if args.len() != 3 {
            return None;
        }
        let program = args.remove(0);
        let escaped = [program, OsString::from("--")].into_iter().chain(args);
        Self::try_parse_from(escaped).ok()
    }
}

#[derive(Debug, Clone)]
pub struct ProducerConfig {
    pub brokers: String,
    pub topic: String,
    pub message_timeout: Duration,
}

impl ProducerConfig {
    pub fn new(brokers: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            topic: topic.into(),
            message_timeout: Duration::from_millis(MESSAGE_TIMEOUT_MS),
        }
    }

    /// Upper bound on the shutdown flush.
    pub fn flush_timeout(&self) -> Duration {
        self.message_timeout + Duration::from_millis(FLUSH_GRACE_MS)
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut conf = ClientConfig::new();
        conf.set("bootstrap.servers", &self.brokers)
            .set(
                "message.timeout.ms",
                self.message_timeout.as_millis().to_string(),
            );
        conf
    }
}

impl From<Cli> for ProducerConfig {
    fn from(cli: Cli) -> Self {
        Self::new(cli.broker, cli.topic)
    }
}
