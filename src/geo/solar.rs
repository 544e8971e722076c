//! Sunrise/sunset orchestration.
//!
//! The astronomy lives in the `sunrise` crate and the timezone polygons in
//! `tzf-rs`; this module decides which timezone and calendar date to ask about
//! and validates what comes back.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;

use super::{Coordinates, Location};
use crate::error::{Error, Result};

/// Today's sunrise and sunset at a location, in that location's timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarWindow {
    pub sunrise: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
    pub timezone: Tz,
}

impl SolarWindow {
    /// Whether `instant` lies in `[sunrise, sunset]`, both ends inclusive.
    ///
    /// Compares instants rather than times of day, so a sunset after local
    /// midnight still closes the window it belongs to.
    pub fn contains(&self, instant: DateTime<Tz>) -> bool {
        self.sunrise <= instant && instant <= self.sunset
    }
}

/// Location → IANA timezone lookup.
#[cfg_attr(test, mockall::automock)]
pub trait TimezoneLookup {
    fn timezone_at(&self, coordinates: Coordinates) -> Option<Tz>;
}

/// Astronomical sunrise/sunset for a date, in UTC.
#[cfg_attr(test, mockall::automock)]
pub trait SunEvents {
    fn sun_events(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>)>;
}

// Building the finder decodes the embedded polygon data; do it once
static TZ_FINDER: Lazy<tzf_rs::DefaultFinder> = Lazy::new(tzf_rs::DefaultFinder::new);

/// Timezone lookup backed by `tzf-rs`.
pub struct TzfTimezoneLookup;

impl TimezoneLookup for TzfTimezoneLookup {
    fn timezone_at(&self, coordinates: Coordinates) -> Option<Tz> {
        TZ_FINDER
            .get_tz_name(coordinates.longitude, coordinates.latitude)
            .parse::<Tz>()
            .ok()
    }
}

/// Sunrise/sunset from the `sunrise` crate.
pub struct SunriseAlgorithm;

impl SunEvents for SunriseAlgorithm {
    fn sun_events(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        use sunrise::{SolarDay, SolarEvent};

        let coord = sunrise::Coordinates::new(coordinates.latitude, coordinates.longitude)
            .ok_or_else(|| Error::SolarComputation(format!("invalid coordinates {coordinates}")))?;
        let solar_day = SolarDay::new(coord, date);

        Ok((
            solar_day.event_time(SolarEvent::Sunrise),
            solar_day.event_time(SolarEvent::Sunset),
        ))
    }
}

/// Compute today's solar window for `location`.
///
/// "Today" is the calendar date of `now` in the location's timezone. The
/// timezone comes from the location itself when known (IP geolocation reports
/// one), otherwise from `timezones`.
pub fn compute(
    location: &Location,
    now: DateTime<Utc>,
    timezones: &dyn TimezoneLookup,
    sun: &dyn SunEvents,
) -> Result<SolarWindow> {
    let coordinates = location.coordinates;
    if !coordinates.is_valid() {
        return Err(Error::SolarComputation(format!(
            "coordinates out of range (latitude {}, longitude {}); latitude must be within \
             -90..=90 and longitude within -180..=180",
            coordinates.latitude, coordinates.longitude
        )));
    }

    let timezone = location
        .timezone
        .or_else(|| timezones.timezone_at(coordinates))
        .ok_or_else(|| {
            Error::SolarComputation(format!("no timezone known for {coordinates}"))
        })?;

    let date = now.with_timezone(&timezone).date_naive();
    let (sunrise_utc, sunset_utc) = sun.sun_events(coordinates, date)?;

    validate_events(date, sunrise_utc, sunset_utc).map_err(|reason| {
        Error::SolarComputation(format!("{reason} at {coordinates} on {date}"))
    })?;

    let window = SolarWindow {
        sunrise: sunrise_utc.with_timezone(&timezone),
        sunset: sunset_utc.with_timezone(&timezone),
        timezone,
    };

    log_debug!(
        "Solar window for {date}: sunrise {} UTC, sunset {} UTC",
        sunrise_utc.format("%H:%M:%S"),
        sunset_utc.format("%H:%M:%S")
    );

    Ok(window)
}

/// Reject results that cannot be a single daytime span around `date`.
///
/// Polar day and polar night leave the algorithm without a sunrise or sunset,
/// which shows up as degenerate or far-off timestamps.
fn validate_events(
    date: NaiveDate,
    sunrise: DateTime<Utc>,
    sunset: DateTime<Utc>,
) -> std::result::Result<(), String> {
    let near_date = |event: DateTime<Utc>| (event.date_naive() - date).num_days().abs() <= 1;

    if !near_date(sunrise) || !near_date(sunset) {
        return Err("no sunrise or sunset".to_string());
    }
    if sunset <= sunrise || sunset - sunrise >= Duration::hours(24) {
        return Err("no distinct sunrise and sunset".to_string());
    }
    Ok(())
}
