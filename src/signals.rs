//! Signal handling for the daemon.
//!
//! A background thread iterates over incoming signals and forwards them to the
//! main loop as [`SignalMessage`]s over an mpsc channel. The main loop sleeps in
//! `recv_timeout` on that channel, so a signal ends the sleep immediately but
//! never interrupts an apply in progress.
//!
//! - `SIGUSR2`: re-evaluate now (e.g. after editing the configuration)
//! - `SIGINT`, `SIGTERM`, `SIGHUP`: shut down

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR2},
    iterator::Signals,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::Arc;
use std::thread;

/// Message delivered to the daemon loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMessage {
    /// Evaluate and apply immediately (SIGUSR2).
    Reevaluate,
    /// Stop the loop (SIGTERM, SIGINT, SIGHUP).
    Shutdown,
}

/// Signal handling state shared between threads.
pub struct SignalState {
    /// Cleared once a shutdown was requested.
    pub running: Arc<AtomicBool>,
    pub signal_receiver: Receiver<SignalMessage>,
    /// Extra sender, e.g. for tests driving the loop without real signals.
    pub signal_sender: Sender<SignalMessage>,
}

impl SignalState {
    /// A channel with no OS signals attached.
    pub fn detached() -> Self {
        let (signal_sender, signal_receiver) = channel();
        Self {
            running: Arc::new(AtomicBool::new(true)),
            signal_receiver,
            signal_sender,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Record a shutdown request and wake the loop.
    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.signal_sender.send(SignalMessage::Shutdown);
    }
}

/// Install handlers for SIGINT, SIGTERM, SIGHUP and SIGUSR2.
pub fn setup_signal_handler() -> Result<SignalState> {
    let state = SignalState::detached();

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR2])
        .context("failed to register signal handlers")?;

    let running = state.running.clone();
    let sender = state.signal_sender.clone();

    thread::spawn(move || {
        for sig in signals.forever() {
            let message = match sig {
                SIGUSR2 => {
                    log_pipe!();
                    log_info!("Received SIGUSR2, re-evaluating");
                    SignalMessage::Reevaluate
                }
                _ => {
                    log_pipe!();
                    log_info!("Received signal {sig}, shutting down");
                    running.store(false, Ordering::SeqCst);
                    SignalMessage::Shutdown
                }
            };

            // Receiver gone means the main loop already finished
            if sender.send(message).is_err() {
                break;
            }
            if message == SignalMessage::Shutdown {
                break;
            }
        }
    });

    Ok(state)
}
