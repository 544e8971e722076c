//! Light/dark decision engine.
//!
//! Picks exactly one strategy per evaluation, first match wins:
//!
//! 1. forced theme (`--light` / `--dark`)
//! 2. explicit time window (`--time SUNRISE SUNSET`)
//! 3. explicit location (`--location LAT LON`)
//! 4. configured fixed times (`mode = "time"`)
//! 5. configured or detected location (`mode = "location"`)
//!
//! Both boundaries are inclusive. Fixed windows (2 and 4) are compared on the
//! time of day alone. Solar windows (3 and 5) are compared as instants in the
//! location's timezone, so a sunset just after local midnight keeps the
//! evening light.

use chrono::{DateTime, Local, NaiveTime};
use std::fmt;

use crate::config::{Config, Mode};
use crate::error::Result;
use crate::geo::{Coordinates, GeoServices, SolarWindow};

/// The appearance to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Label used for the marker file, `color-scheme` and the custom script.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Command-line inputs that take precedence over the configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub force: Option<Theme>,
    /// `(sunrise, sunset)`
    pub time_window: Option<(NaiveTime, NaiveTime)>,
    pub location: Option<Coordinates>,
}

/// The rule that decides the theme for one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Forced(Theme),
    TimeOverride { sunrise: NaiveTime, sunset: NaiveTime },
    LocationOverride(Coordinates),
    ConfiguredTime { sunrise: NaiveTime, sunset: NaiveTime },
    ConfiguredLocation,
}

/// Choose the strategy. Pure: no I/O, no clock.
pub fn strategy(overrides: &Overrides, config: &Config) -> Strategy {
    if let Some(theme) = overrides.force {
        return Strategy::Forced(theme);
    }
    if let Some((sunrise, sunset)) = overrides.time_window {
        return Strategy::TimeOverride { sunrise, sunset };
    }
    if let Some(coordinates) = overrides.location {
        return Strategy::LocationOverride(coordinates);
    }
    match config.mode {
        Mode::Time => Strategy::ConfiguredTime {
            sunrise: config.sunrise,
            sunset: config.sunset,
        },
        Mode::Location => Strategy::ConfiguredLocation,
    }
}

/// Decide the theme for `now`.
///
/// Location and solar services are only consulted by the location strategies.
pub fn select(
    now: DateTime<Local>,
    overrides: &Overrides,
    config: &Config,
    geo: &GeoServices,
) -> Result<Theme> {
    let daytime = match strategy(overrides, config) {
        Strategy::Forced(theme) => {
            log_decorated!("Theme forced to {theme}");
            return Ok(theme);
        }
        Strategy::TimeOverride { sunrise, sunset }
        | Strategy::ConfiguredTime { sunrise, sunset } => {
            let current = now.time();
            log_indented!("Sunrise:      {}", sunrise.format("%H:%M:%S"));
            log_indented!("Sunset:       {}", sunset.format("%H:%M:%S"));
            log_indented!("Current time: {}", current.format("%H:%M:%S"));

            if sunset < sunrise {
                log_warning!(
                    "Daytime window {}-{} crosses midnight; treating it as night",
                    sunrise.format("%H:%M"),
                    sunset.format("%H:%M")
                );
            }
            is_daytime(sunrise, sunset, current)
        }
        Strategy::LocationOverride(coordinates) => {
            let window = geo.solar_window_for(Some(coordinates), config, now.to_utc())?;
            in_solar_window(&window, now)
        }
        Strategy::ConfiguredLocation => {
            let window = geo.solar_window_for(None, config, now.to_utc())?;
            in_solar_window(&window, now)
        }
    };

    let theme = if daytime { Theme::Light } else { Theme::Dark };
    match theme {
        Theme::Light => log_decorated!("It's daytime (sunrise to sunset)"),
        Theme::Dark => log_decorated!("It's nighttime (sunset to sunrise)"),
    }
    Ok(theme)
}

/// Compare `now` against a computed window in the window's timezone.
fn in_solar_window(window: &SolarWindow, now: DateTime<Local>) -> bool {
    let current = now.with_timezone(&window.timezone);
    let next_day = window.sunset.date_naive() > window.sunrise.date_naive();

    log_indented!("Sunrise:      {}", window.sunrise.format("%H:%M:%S"));
    log_indented!(
        "Sunset:       {}{}",
        window.sunset.format("%H:%M:%S"),
        if next_day { " (next day)" } else { "" }
    );
    log_indented!("Current time: {}", current.format("%H:%M:%S"));

    window.contains(current)
}

/// Whether `now` lies in `[sunrise, sunset]`, both ends inclusive.
///
/// An inverted window (`sunset < sunrise`) contains no time of day.
pub fn is_daytime(sunrise: NaiveTime, sunset: NaiveTime, now: NaiveTime) -> bool {
    sunrise <= now && now <= sunset
}

pub fn theme_for(sunrise: NaiveTime, sunset: NaiveTime, now: NaiveTime) -> Theme {
    if is_daytime(sunrise, sunset, now) {
        Theme::Light
    } else {
        Theme::Dark
    }
}
