// SPDX-License-Identifier: AGPL-3.0-or-later
//! The produce loop: submit lines until input ends or a termination signal
//! arrives, then drain in-flight messages within a bounded flush.

use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::mpsc::Receiver;

use crate::client::Sink;
use crate::message::OutboundMessage;
use crate::signal::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Draining,
    Exited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfInput,
    Signal(Termination),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub reason: StopReason,
    /// Lines accepted by the sink.
    pub submitted: usize,
    /// Messages still queued or in transit when the flush gave up.
    pub remaining: usize,
}

fn transition(state: &mut State, next: State) {
    debug!("produce loop {:?} -> {:?}", state, next);
    *state = next;
}

pub fn remaining_warning(remaining: usize) -> String {
    format!("Exiting with {remaining} message(s) still in queue/transit")
}

/// Runs the loop to completion and releases `sink` before returning.
///
/// Signals win over lines that are ready at the same time, so no line read
/// after a signal is ever submitted. Signals arriving while draining are
/// left unread; the flush is already bounded.
pub async fn run<S: Sink>(
    sink: S,
    topic: &str,
    mut lines: Receiver<String>,
    mut signals: Receiver<Termination>,
    flush_timeout: Duration,
) -> Outcome {
    let mut state = State::Running;
    let mut submitted = 0;
    let mut reason = StopReason::EndOfInput;

    while state == State::Running {
        tokio::select! {
            biased;

            Some(sig) = signals.recv() => {
                info!("Terminating on signal {}", sig);
                reason = StopReason::Signal(sig);
                transition(&mut state, State::Draining);
            }
            line = lines.recv() => match line {
                Some(line) => {
                    let Some(msg) = OutboundMessage::from_line(topic, line) else {
                        continue;
                    };
                    match sink.submit(msg).await {
                        Ok(()) => submitted += 1,
                        Err(e) => error!("Failed to produce message: {}", e),
                    }
                }
                None => transition(&mut state, State::Draining),
            },
        }
    }

    // Stop the reader from blocking on a line we will never take.
    lines.close();

    info!("Flushing {} message(s)", sink.in_flight());
    let remaining = sink.flush(flush_timeout).await;
    if remaining > 0 {
        warn!("{}", remaining_warning(remaining));
    }

    drop(sink);
    transition(&mut state, State::Exited);

    Outcome {
        reason,
        submitted,
        remaining,
    }
}
