//! Geographic location resolution and sunrise/sunset calculation.
//!
//! ## Module Structure
//!
//! - [`location`]: resolves coordinates from an explicit override, the
//!   configuration, or IP geolocation (in that order)
//! - [`solar`]: derives the location's timezone and today's sunrise/sunset there
//!
//! The network lookup, the timezone database and the astronomical algorithm
//! sit behind the [`Geolocator`], [`TimezoneLookup`] and [`SunEvents`] traits.
//! [`GeoServices`] bundles one implementation of each so callers thread a
//! single value through the decision pipeline.

pub mod location;
pub mod solar;

use std::fmt;

pub use location::{Geolocator, IpInfoGeolocator, Location, LocationSource, resolve};
pub use solar::{SolarWindow, SunEvents, SunriseAlgorithm, TimezoneLookup, TzfTimezoneLookup};


/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both values are inside their geographic ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat_dir = if self.latitude >= 0.0 { "N" } else { "S" };
        let lon_dir = if self.longitude >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.4}°{}, {:.4}°{}",
            self.latitude.abs(),
            lat_dir,
            self.longitude.abs(),
            lon_dir
        )
    }
}

/// External capabilities used when a decision depends on the location.
pub struct GeoServices {
    pub geolocator: Box<dyn Geolocator>,
    pub timezones: Box<dyn TimezoneLookup>,
    pub sun: Box<dyn SunEvents>,
}

impl GeoServices {
    /// Production services: ipinfo.io, the tzf timezone finder, and the
    /// `sunrise` crate.
    pub fn system() -> Self {
        Self {
            geolocator: Box::new(IpInfoGeolocator::new()),
            timezones: Box::new(TzfTimezoneLookup),
            sun: Box::new(SunriseAlgorithm),
        }
    }

    /// Resolve the location and compute today's solar window there.
    pub fn solar_window_for(
        &self,
        explicit: Option<Coordinates>,
        config: &crate::config::Config,
        now: chrono::DateTime<chrono::Utc>,
    ) -> crate::error::Result<SolarWindow> {
        let location = resolve(explicit, config, self.geolocator.as_ref())?;
        log_decorated!("Location: {} ({})", location.coordinates, location.source);

        let window = solar::compute(&location, now, self.timezones.as_ref(), self.sun.as_ref())?;
        log_indented!("Timezone: {}", window.timezone);
        Ok(window)
    }
}
