//! Daemon loop: live reload, failure tolerance, signal handling.

mod common;

use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::tempdir;

use audamo::applier::Applier;
use audamo::backend::testing::RecordingBackend;
use audamo::daemon::Daemon;
use audamo::decision::{Overrides, Theme};
use audamo::error::Error;
use audamo::logger::Log;
use audamo::signals::{SignalMessage, SignalState};
use audamo::state::StateMarker;
use audamo::time_source::{FixedTimeSource, local_today_at};

use common::*;

struct Fixture {
    _dir: tempfile::TempDir,
    config_path: std::path::PathBuf,
    backend: RecordingBackend,
    marker: StateMarker,
    clock: Arc<FixedTimeSource>,
}

impl Fixture {
    fn new(config: &str, hour: u32, minute: u32) -> Self {
        Log::set_enabled(false);
        let dir = tempdir().unwrap();
        let config_path = write_config(dir.path(), config);
        let marker = StateMarker::new(dir.path().join("current-theme"));
        Self {
            config_path,
            backend: RecordingBackend::new(),
            marker,
            clock: Arc::new(FixedTimeSource::today_at(hour, minute)),
            _dir: dir,
        }
    }

    fn daemon(&self, overrides: Overrides) -> Daemon {
        let applier =
            Applier::new(Box::new(self.backend.clone()), self.marker.clone()).without_asset_check();
        Daemon::new(&self.config_path, overrides, offline_services(), applier)
            .with_time_source(Box::new(self.clock.clone()))
            .with_interval(Duration::from_secs(3600))
    }
}

#[test]
fn test_config_edit_is_picked_up_on_next_tick() {
    let fixture = Fixture::new(&time_mode_config("06:00", "20:00"), 6, 30);
    let mut daemon = fixture.daemon(Overrides::default());

    let (theme, _) = daemon.tick().unwrap();
    assert_eq!(theme, Theme::Light);
    assert_eq!(fixture.marker.read(), Some(Theme::Light));

    fs::write(&fixture.config_path, time_mode_config("07:00", "20:00")).unwrap();

    let (theme, _) = daemon.tick().unwrap();
    assert_eq!(theme, Theme::Dark);
    assert_eq!(fixture.marker.read(), Some(Theme::Dark));
}

#[test]
fn test_clock_moving_past_sunset_switches_theme() {
    let fixture = Fixture::new(&time_mode_config("07:00", "19:00"), 18, 59);
    let mut daemon = fixture.daemon(Overrides::default());

    assert_eq!(daemon.tick().unwrap().0, Theme::Light);
    fixture.clock.set(local_today_at(19, 1));
    assert_eq!(daemon.tick().unwrap().0, Theme::Dark);
}

#[test]
fn test_broken_config_fails_tick_then_recovers() {
    let fixture = Fixture::new(&time_mode_config("07:00", "19:00"), 12, 0);
    let mut daemon = fixture.daemon(Overrides::default());

    fs::write(&fixture.config_path, "[general]\nmode = \"sundial\"\n").unwrap();
    let err = daemon.tick().unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(fixture.backend.calls().is_empty());

    fs::write(&fixture.config_path, time_mode_config("07:00", "19:00")).unwrap();
    assert_eq!(daemon.tick().unwrap().0, Theme::Light);
}

#[test]
fn test_location_failure_is_counted_and_loop_continues() {
    let fixture = Fixture::new("[general]\nmode = \"location\"\n", 12, 0);
    let mut daemon = fixture.daemon(Overrides::default());

    let signals = SignalState::detached();
    signals.signal_sender.send(SignalMessage::Reevaluate).unwrap();
    signals.signal_sender.send(SignalMessage::Shutdown).unwrap();

    let summary = daemon.run(&signals);
    assert_eq!(summary.ticks, 2);
    assert_eq!(summary.failed_ticks, 2);
    assert_eq!(summary.last_theme, None);
    assert_eq!(fixture.marker.read(), None);
}

#[test]
fn test_reevaluate_ticks_immediately() {
    let fixture = Fixture::new(&time_mode_config("07:00", "19:00"), 22, 0);
    let mut daemon = fixture.daemon(Overrides::default());

    let signals = SignalState::detached();
    signals.signal_sender.send(SignalMessage::Reevaluate).unwrap();
    signals.signal_sender.send(SignalMessage::Shutdown).unwrap();

    let start = Instant::now();
    let summary = daemon.run(&signals);

    assert!(start.elapsed() < Duration::from_secs(60));
    assert_eq!(summary.ticks, 2);
    assert_eq!(summary.failed_ticks, 0);
    assert_eq!(summary.last_theme, Some(Theme::Dark));
    assert_eq!(fixture.backend.calls().len(), 6);
}

#[test]
fn test_shutdown_interrupts_sleep_promptly() {
    let fixture = Fixture::new(&time_mode_config("07:00", "19:00"), 12, 0);
    let mut daemon = fixture.daemon(Overrides::default());

    let signals = SignalState::detached();
    let sender = signals.signal_sender.clone();
    let running = signals.running.clone();
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        running.store(false, std::sync::atomic::Ordering::SeqCst);
        sender.send(SignalMessage::Shutdown).unwrap();
    });

    let start = Instant::now();
    let summary = daemon.run(&signals);
    stopper.join().unwrap();

    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(summary.ticks, 1);
    assert_eq!(summary.last_theme, Some(Theme::Light));
}

#[test]
fn test_force_override_beats_configuration() {
    let fixture = Fixture::new(&time_mode_config("07:00", "19:00"), 12, 0);
    let overrides = Overrides {
        force: Some(Theme::Dark),
        ..Overrides::default()
    };
    let mut daemon = fixture.daemon(overrides);

    assert_eq!(daemon.tick().unwrap().0, Theme::Dark);
    assert_eq!(fixture.backend.calls()[0].value, "Adwaita-dark");
}
