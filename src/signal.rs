// SPDX-License-Identifier: AGPL-3.0-or-later
use std::fmt;

use log::debug;
use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::error::ProducerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Interrupt,
    Terminate,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Interrupt => f.write_str("interrupt"),
            Termination::Terminate => f.write_str("terminated"),
        }
    }
}

/// Installs handlers for SIGINT and SIGTERM and returns the stream of
/// received signals. Once installed, the signals no longer kill the
/// process; whoever holds the receiver decides what they mean.
///
/// Must be called from within a tokio runtime.
#[cfg(unix)]
pub fn subscribe() -> Result<Receiver<Termination>, ProducerError> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let (tx, rx) = mpsc::channel(4);

    tokio::spawn(async move {
        loop {
            let sig = tokio::select! {
                Some(()) = sigint.recv() => Termination::Interrupt,
                Some(()) = sigterm.recv() => Termination::Terminate,
                else => break,
            };
            if !deliver(&tx, sig) {
                break;
            }
        }
    });
    Ok(rx)
}

#[cfg(not(unix))]
pub fn subscribe() -> Result<Receiver<Termination>, ProducerError> {
    let (tx, rx) = mpsc::channel(4);
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if !deliver(&tx, Termination::Interrupt) {
                break;
            }
        }
    });
    Ok(rx)
}

/// Returns false once nobody listens any more.
fn deliver(tx: &Sender<Termination>, sig: Termination) -> bool {
    match tx.try_send(sig) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(_)) => {
            debug!("dropping {} signal, earlier ones still pending", sig);
            true
        }
        Err(mpsc::error::TrySendError::Closed(_)) => false,
    }
}
