//! Evaluation loop.
//!
//! One tick reloads the configuration from disk, runs the decision engine and
//! applies the result. The daemon ticks once at startup and then every
//! `interval`, or immediately when asked to re-evaluate. A failing tick is
//! logged and counted; the loop keeps going until a shutdown is requested.

use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use crate::applier::{Applier, ApplyReport};
use crate::config::Config;
use crate::constants::*;
use crate::decision::{self, Overrides, Theme};
use crate::error::Result;
use crate::geo::GeoServices;
use crate::signals::{SignalMessage, SignalState};
use crate::time_source::{RealTimeSource, TimeSource};

/// Counters returned when the loop stops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaemonSummary {
    pub ticks: u64,
    pub failed_ticks: u64,
    pub last_theme: Option<Theme>,
}

pub struct Daemon {
    config_path: PathBuf,
    overrides: Overrides,
    geo: GeoServices,
    applier: Applier,
    clock: Box<dyn TimeSource>,
    interval: Duration,
}

impl Daemon {
    pub fn new(
        config_path: impl Into<PathBuf>,
        overrides: Overrides,
        geo: GeoServices,
        applier: Applier,
    ) -> Self {
        Self {
            config_path: config_path.into(),
            overrides,
            geo,
            applier,
            clock: Box::new(RealTimeSource),
            interval: DAEMON_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_time_source(mut self, clock: Box<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Reload the configuration, decide and apply once.
    pub fn tick(&mut self) -> Result<(Theme, ApplyReport)> {
        let now = self.clock.now();
        log_block_start!("Evaluating at {}", now.format("%Y-%m-%d %H:%M:%S"));

        // Fresh every time so edits apply without a restart
        let config = Config::load_from_path(&self.config_path)?;
        log_debug!("Loaded configuration from {}", self.config_path.display());

        let theme = decision::select(now, &self.overrides, &config, &self.geo)?;
        let report = self.applier.apply(theme, &config)?;

        if !report.is_complete() {
            log_warning!(
                "{} of {} settings could not be applied",
                report.failed.len(),
                report.failed.len() + report.applied.len()
            );
        }
        Ok((theme, report))
    }

    /// Tick until a shutdown is requested.
    pub fn run(&mut self, signals: &SignalState) -> DaemonSummary {
        let mut summary = DaemonSummary::default();

        log_block_start!(
            "Re-evaluating every {} minutes (send SIGUSR2 to re-evaluate now)",
            self.interval.as_secs() / 60
        );

        while signals.is_running() {
            summary.ticks += 1;
            match self.tick() {
                Ok((theme, _)) => summary.last_theme = Some(theme),
                Err(e) => {
                    summary.failed_ticks += 1;
                    log_pipe!();
                    log_error!("{}: {e}", e.kind());
                    log_indented!("Trying again in {} minutes", self.interval.as_secs() / 60);
                }
            }

            match signals.signal_receiver.recv_timeout(self.interval) {
                Ok(SignalMessage::Reevaluate) | Err(RecvTimeoutError::Timeout) => {}
                Ok(SignalMessage::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        log_block_start!(
            "Stopped after {} evaluations ({} failed)",
            summary.ticks,
            summary.failed_ticks
        );
        summary
    }
}
