// SPDX-License-Identifier: AGPL-3.0-or-later
//! Startup and shutdown around the produce loop. Returns the process exit
//! status instead of exiting, so the binary stays a thin wrapper.

use std::ffi::OsString;
use std::io::BufRead;

use log::{error, info};
use tokio::sync::mpsc::{self, Receiver};

use crate::client::{KafkaProducer, library_info};
use crate::config::{Cli, ProducerConfig};
use crate::signal::{self, Termination};
use crate::{event, input, produce};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

pub fn usage(program: &str) -> String {
    let (version, linkage) = library_info();
    format!(
        "kpipe (librdkafka v{version}, linkage {linkage})\n\
         Usage: {program} <broker> <topic>"
    )
}

/// Checks the arguments, installs signal handlers, then produces `input`.
pub async fn start<I, T, R>(args: I, input: R) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    R: BufRead + Send + 'static,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let Some(cli) = Cli::from_args(args.iter().cloned()) else {
        let program = args
            .first()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| "kpipe".to_string());
        eprintln!("{}", usage(&program));
        return EXIT_FAILURE;
    };

    let signals = match signal::subscribe() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to install signal handlers: {}", e);
            return EXIT_FAILURE;
        }
    };

    run(ProducerConfig::from(cli), input, signals).await
}

/// Creates the client and runs the loop to completion. Undelivered
/// messages after the drain are logged only; the status is still success.
pub async fn run<R>(config: ProducerConfig, input: R, signals: Receiver<Termination>) -> u8
where
    R: BufRead + Send + 'static,
{
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let producer = match KafkaProducer::create(&config, events_tx) {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to create producer: {}", e);
            return EXIT_FAILURE;
        }
    };
    let events = tokio::spawn(event::log_events(events_rx));

    info!("Enter message to produce and hit enter");
    info!("Ctrl-D to exit to flush messages and exit");

    let (lines_tx, lines_rx) = mpsc::channel(1);
    input::spawn_line_reader(input, lines_tx);

    produce::run(
        producer,
        &config.topic,
        lines_rx,
        signals,
        config.flush_timeout(),
    )
    .await;

    // The producer is gone, so the event stream ends once drained.
    if let Err(e) = events.await {
        error!("event logger failed: {}", e);
    }

    EXIT_OK
}
