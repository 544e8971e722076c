//! Location resolution.
//!
//! Precedence, highest first: coordinates passed by the caller (command-line
//! override), coordinates from the configuration, then automatic detection
//! through a [`Geolocator`]. Only the last path touches the network, and its
//! failure is fatal for the evaluation: there is no silent fallback.

use chrono_tz::Tz;
use serde::Deserialize;
use std::fmt;

use super::Coordinates;
use crate::config::Config;
use crate::constants::*;
use crate::error::{Error, Result};

/// Where a resolved location came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Explicit,
    Configured,
    Detected,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LocationSource::Explicit => "command line",
            LocationSource::Configured => "configuration",
            LocationSource::Detected => "IP geolocation",
        })
    }
}

/// A concrete location, optionally with a known timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub coordinates: Coordinates,
    pub timezone: Option<Tz>,
    pub source: LocationSource,
}

/// Automatic location detection without user input.
#[cfg_attr(test, mockall::automock)]
pub trait Geolocator {
    /// Look up the current location.
    ///
    /// Fails with [`Error::LocationUnavailable`] on network errors, malformed
    /// responses or non-numeric coordinates.
    fn locate(&self) -> Result<Location>;
}

/// Resolve the location for one evaluation.
pub fn resolve(
    explicit: Option<Coordinates>,
    config: &Config,
    geolocator: &dyn Geolocator,
) -> Result<Location> {
    if let Some(coordinates) = explicit {
        return Ok(Location {
            coordinates,
            timezone: None,
            source: LocationSource::Explicit,
        });
    }

    if let Some(coordinates) = config.location {
        return Ok(Location {
            coordinates,
            timezone: None,
            source: LocationSource::Configured,
        });
    }

    log_decorated!("Fetching current location...");
    geolocator.locate()
}

/// Geolocation by public IP through ipinfo.io.
pub struct IpInfoGeolocator {
    url: String,
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    loc: Option<String>,
    timezone: Option<String>,
}

impl IpInfoGeolocator {
    pub fn new() -> Self {
        Self::with_url(GEOLOCATION_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    fn fetch(&self) -> anyhow::Result<IpInfoResponse> {
        let client = reqwest::blocking::Client::builder()
            .timeout(GEOLOCATION_TIMEOUT)
            .build()?;
        let response = client.get(&self.url).send()?.error_for_status()?;
        Ok(response.json()?)
    }
}

impl Default for IpInfoGeolocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Geolocator for IpInfoGeolocator {
    fn locate(&self) -> Result<Location> {
        let response = self
            .fetch()
            .map_err(|e| Error::LocationUnavailable(format!("{e:#}")))?;

        parse_ipinfo(response)
    }
}

fn parse_ipinfo(response: IpInfoResponse) -> Result<Location> {
    let loc = response
        .loc
        .ok_or_else(|| Error::LocationUnavailable("response has no 'loc' field".into()))?;
    let coordinates = parse_loc(&loc).ok_or_else(|| {
        Error::LocationUnavailable(format!("response has malformed coordinates '{loc}'"))
    })?;

    // An unknown zone name is dropped; the solar step looks it up by coordinates
    let timezone = response.timezone.and_then(|name| name.parse::<Tz>().ok());

    Ok(Location {
        coordinates,
        timezone,
        source: LocationSource::Detected,
    })
}

/// Parse ipinfo's `"lat,lon"` string.
fn parse_loc(loc: &str) -> Option<Coordinates> {
    let (lat, lon) = loc.split_once(',')?;
    let latitude = lat.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    let longitude = lon.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(Coordinates::new(latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(loc: Option<&str>, timezone: Option<&str>) -> IpInfoResponse {
        IpInfoResponse {
            loc: loc.map(str::to_string),
            timezone: timezone.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_ipinfo_with_timezone() {
        let location = parse_ipinfo(response(Some("52.5244,13.4105"), Some("Europe/Berlin"))).unwrap();
        assert_eq!(location.coordinates, Coordinates::new(52.5244, 13.4105));
        assert_eq!(location.timezone, Some(chrono_tz::Europe::Berlin));
        assert_eq!(location.source, LocationSource::Detected);
    }

    #[test]
    fn test_parse_ipinfo_unknown_timezone_is_dropped() {
        let location = parse_ipinfo(response(Some("1.0,2.0"), Some("Mars/Olympus"))).unwrap();
        assert_eq!(location.timezone, None);
    }

    #[test]
    fn test_parse_ipinfo_rejects_missing_or_malformed_loc() {
        assert!(matches!(
            parse_ipinfo(response(None, Some("UTC"))),
            Err(Error::LocationUnavailable(_))
        ));
        assert!(matches!(
            parse_ipinfo(response(Some("north,east"), None)),
            Err(Error::LocationUnavailable(_))
        ));
        assert!(matches!(
            parse_ipinfo(response(Some("52.5"), None)),
            Err(Error::LocationUnavailable(_))
        ));
    }

    #[test]
    fn test_ipinfo_json_shape() {
        let body = r#"{"ip":"203.0.113.7","city":"Berlin","loc":"52.5244,13.4105","timezone":"Europe/Berlin"}"#;
        let parsed: IpInfoResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.loc.as_deref(), Some("52.5244,13.4105"));
    }

    #[test]
    fn test_unreachable_endpoint_is_location_unavailable() {
        // Port 9 on localhost (discard) is not expected to speak HTTP
        let geolocator = IpInfoGeolocator::with_url("http://127.0.0.1:9/json");
        assert!(matches!(
            geolocator.locate(),
            Err(Error::LocationUnavailable(_))
        ));
    }
}
