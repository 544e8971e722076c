//! End-to-end decisions with the real timezone finder and sun algorithm.

mod common;

use chrono::{Local, TimeZone, Utc};

use audamo::config::Config;
use audamo::decision::{Overrides, Theme, select};
use audamo::error::Error;
use audamo::geo::{Coordinates, Location, LocationSource};
use audamo::logger::Log;

use common::*;

fn location_config() -> Config {
    Config::from_toml_str("[general]\nmode = \"location\"\nlatitude = \"\"\nlongitude = \"\"\n")
        .unwrap()
}

fn at_utc(hour: u32, minute: u32) -> chrono::DateTime<Local> {
    Utc.with_ymd_and_hms(2024, 6, 21, hour, minute, 0)
        .unwrap()
        .with_timezone(&Local)
}

fn berlin() -> Coordinates {
    Coordinates::new(52.52, 13.405)
}

#[test]
fn test_cli_location_uses_solar_window_in_local_timezone() {
    Log::set_enabled(false);
    let services = astronomical_services(Box::new(OfflineGeolocator));
    let overrides = Overrides {
        location: Some(berlin()),
        ..Overrides::default()
    };
    let config = location_config();

    // 10:00 UTC is midday in Berlin, 21:00 UTC is 23:00 CEST
    assert_eq!(
        select(at_utc(10, 0), &overrides, &config, &services).unwrap(),
        Theme::Light
    );
    assert_eq!(
        select(at_utc(21, 0), &overrides, &config, &services).unwrap(),
        Theme::Dark
    );
}

#[test]
fn test_midsummer_sunset_past_midnight_is_still_daytime_at_noon() {
    Log::set_enabled(false);
    let services = astronomical_services(Box::new(OfflineGeolocator));
    // Reykjavik (UTC+0): sunset on June 21st falls just after midnight
    let overrides = Overrides {
        location: Some(Coordinates::new(64.1466, -21.9426)),
        ..Overrides::default()
    };
    let config = location_config();

    assert_eq!(
        select(at_utc(13, 0), &overrides, &config, &services).unwrap(),
        Theme::Light
    );
    assert_eq!(
        select(at_utc(23, 30), &overrides, &config, &services).unwrap(),
        Theme::Light
    );
    assert_eq!(
        select(at_utc(1, 30), &overrides, &config, &services).unwrap(),
        Theme::Dark
    );
}

#[test]
fn test_detected_location_is_used_when_none_configured() {
    Log::set_enabled(false);
    let detected = Location {
        coordinates: Coordinates::new(-33.8688, 151.2093),
        timezone: Some(chrono_tz::Australia::Sydney),
        source: LocationSource::Detected,
    };
    let services = astronomical_services(Box::new(FixedGeolocator(detected)));

    // 02:00 UTC is noon in Sydney (AEST, UTC+10)
    assert_eq!(
        select(at_utc(2, 0), &Overrides::default(), &location_config(), &services).unwrap(),
        Theme::Light
    );
    // 12:00 UTC is 22:00 in Sydney
    assert_eq!(
        select(at_utc(12, 0), &Overrides::default(), &location_config(), &services).unwrap(),
        Theme::Dark
    );
}

#[test]
fn test_offline_without_coordinates_is_location_unavailable() {
    Log::set_enabled(false);
    let services = astronomical_services(Box::new(OfflineGeolocator));
    let err = select(at_utc(12, 0), &Overrides::default(), &location_config(), &services)
        .unwrap_err();
    assert!(matches!(err, Error::LocationUnavailable(_)));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_impossible_latitude_is_solar_error() {
    Log::set_enabled(false);
    let services = astronomical_services(Box::new(OfflineGeolocator));
    let overrides = Overrides {
        location: Some(Coordinates::new(95.0, 0.0)),
        ..Overrides::default()
    };
    let err = select(at_utc(12, 0), &overrides, &location_config(), &services).unwrap_err();
    assert!(matches!(err, Error::SolarComputation(_)));
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn test_force_needs_no_services_at_all() {
    Log::set_enabled(false);
    let overrides = Overrides {
        force: Some(Theme::Dark),
        ..Overrides::default()
    };
    let theme = select(at_utc(12, 0), &overrides, &location_config(), &offline_services()).unwrap();
    assert_eq!(theme, Theme::Dark);
}
