//! Coordinate codec
//!
//! Parses user-entered coordinates in decimal (`6.2442`) or
//! degrees-minutes-seconds (`6°14'39"N`) notation and renders a
//! [`Location`] back into either form.
//!
//! Parsing never fails loudly: anything that is not a valid in-range
//! coordinate pair comes back as `None`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::location::Location;
use crate::errors::DomainError;

/// DMS pattern; accepts ASCII and typographic prime symbols and
/// `O` (oeste) as a west marker. Unanchored, so a value embedded in
/// surrounding text still matches.
static DMS_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(\d+)\s*°\s*(\d+)\s*['′]\s*(\d+(?:\.\d+)?)\s*(?:"|″|'')?\s*([NSEWO])"#,
    )
    .ok()
});

/// Output notation for [`format_coordinates`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateFormat {
    /// Signed decimal degrees, six decimal places
    #[default]
    Decimal,
    /// Degrees, minutes, seconds with a cardinal suffix
    Dms,
}

impl fmt::Display for CoordinateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal => write!(f, "decimal"),
            Self::Dms => write!(f, "dms"),
        }
    }
}

impl FromStr for CoordinateFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "decimal" | "dec" => Ok(Self::Decimal),
            "dms" => Ok(Self::Dms),
            other => Err(DomainError::ValidationError(format!(
                "unknown coordinate format '{other}' (expected decimal or dms)"
            ))),
        }
    }
}

/// A coordinate pair rendered as display strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedCoordinates {
    pub lat: String,
    pub lng: String,
}

/// Parse a latitude/longitude pair from user input
///
/// Decimal notation is tried first. If either value does not parse as a
/// number, or the pair is out of range, both values are retried as DMS.
/// Returns `None` when neither notation yields a valid coordinate pair.
#[must_use]
pub fn parse_coordinates(lat_input: &str, lng_input: &str) -> Option<Location> {
    if let (Some(lat), Some(lng)) = (parse_decimal(lat_input), parse_decimal(lng_input)) {
        if let Ok(location) = Location::new(lat, lng) {
            return Some(location);
        }
    }

    let lat = parse_dms(lat_input)?;
    let lng = parse_dms(lng_input)?;
    Location::new(lat, lng).ok()
}

fn parse_decimal(input: &str) -> Option<f64> {
    input.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Convert a single DMS string to signed decimal degrees
fn parse_dms(input: &str) -> Option<f64> {
    let pattern = DMS_PATTERN.as_ref()?;
    let caps = pattern.captures(input)?;

    let degrees: f64 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: f64 = caps.get(2)?.as_str().parse().ok()?;
    let seconds: f64 = caps.get(3)?.as_str().parse().ok()?;
    let direction = caps.get(4)?.as_str().to_ascii_uppercase();

    let value = degrees + minutes / 60.0 + seconds / 3600.0;
    match direction.as_str() {
        "S" | "W" | "O" => Some(-value),
        _ => Some(value),
    }
}

/// Render a location in the requested notation
#[must_use]
pub fn format_coordinates(location: &Location, format: CoordinateFormat) -> FormattedCoordinates {
    match format {
        CoordinateFormat::Decimal => FormattedCoordinates {
            lat: format!("{:.6}", location.lat()),
            lng: format!("{:.6}", location.lng()),
        },
        CoordinateFormat::Dms => {
            let lat_dir = if location.lat() >= 0.0 { 'N' } else { 'S' };
            let lng_dir = if location.lng() >= 0.0 { 'E' } else { 'W' };
            FormattedCoordinates {
                lat: to_dms(location.lat(), lat_dir),
                lng: to_dms(location.lng(), lng_dir),
            }
        },
    }
}

// Rounded to hundredths of an arc-second before splitting, so seconds never
// print as 60.00.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn to_dms(value: f64, direction: char) -> String {
    let hundredths = (value.abs() * 360_000.0).round() as u64;
    let degrees = hundredths / 360_000;
    let minutes = (hundredths % 360_000) / 6_000;
    let seconds = (hundredths % 6_000) as f64 / 100.0;
    format!("{degrees}°{minutes}'{seconds:.2}\"{direction}")
}
