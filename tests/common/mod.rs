//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use audamo::error::{Error, Result};
use audamo::geo::{
    Coordinates, GeoServices, Geolocator, Location, SunEvents, SunriseAlgorithm, TimezoneLookup,
    TzfTimezoneLookup,
};

/// Geolocator for tests that must never reach the network.
pub struct OfflineGeolocator;

impl Geolocator for OfflineGeolocator {
    fn locate(&self) -> Result<Location> {
        Err(Error::LocationUnavailable("offline".into()))
    }
}

/// Geolocator reporting a fixed place.
pub struct FixedGeolocator(pub Location);

impl Geolocator for FixedGeolocator {
    fn locate(&self) -> Result<Location> {
        Ok(self.0.clone())
    }
}

pub struct NoTimezones;

impl TimezoneLookup for NoTimezones {
    fn timezone_at(&self, _: Coordinates) -> Option<Tz> {
        None
    }
}

pub struct NoSun;

impl SunEvents for NoSun {
    fn sun_events(&self, _: Coordinates, _: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        Err(Error::SolarComputation("sun not available in this test".into()))
    }
}

/// Services for tests in time mode: every location path fails.
pub fn offline_services() -> GeoServices {
    GeoServices {
        geolocator: Box::new(OfflineGeolocator),
        timezones: Box::new(NoTimezones),
        sun: Box::new(NoSun),
    }
}

/// Real timezone lookup and sun algorithm, offline geolocation.
pub fn astronomical_services(geolocator: Box<dyn Geolocator>) -> GeoServices {
    GeoServices {
        geolocator,
        timezones: Box::new(TzfTimezoneLookup),
        sun: Box::new(SunriseAlgorithm),
    }
}

pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, content).unwrap();
    path
}

/// Executable script appending its first argument to `log`.
pub fn recording_script(dir: &Path, log: &Path) -> PathBuf {
    let path = dir.join("hook.sh");
    fs::write(
        &path,
        format!("#!/bin/sh\necho \"$1\" >> '{}'\n", log.display()),
    )
    .unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

pub fn time_mode_config(sunrise: &str, sunset: &str) -> String {
    format!(
        r#"[general]
mode = "time"
sunrise = "{sunrise}"
sunset = "{sunset}"

[light]
theme = "Adwaita"
icon = "Adwaita"
cursor = "Adwaita"

[dark]
theme = "Adwaita-dark"
icon = "Papirus-Dark"
cursor = "Adwaita"
"#
    )
}
