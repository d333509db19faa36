//! Geographic coordinate value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{CoordinateAxis, InvalidCoordinate};
use crate::value_objects::CoordinateUnit;

/// Milliseconds of arc in one degree
const MILLIS_PER_DEGREE: f64 = 3_600_000.0;

/// A geographic coordinate with latitude and longitude in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Create a new coordinate with validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinate` naming the axis if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180]. NaN is rejected on either axis.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        check_axis(CoordinateAxis::Latitude, latitude)?;
        check_axis(CoordinateAxis::Longitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Format as `<lon>,<lat>` in the given unit
    ///
    /// Longitude always comes first. In [`CoordinateUnit::Millisec`] both
    /// components are rounded to whole milliseconds of arc.
    #[must_use]
    pub fn format_lon_lat(&self, unit: CoordinateUnit) -> String {
        match unit {
            CoordinateUnit::Degree => format!("{},{}", self.longitude, self.latitude),
            CoordinateUnit::Millisec => format!(
                "{},{}",
                to_millis(self.longitude),
                to_millis(self.latitude)
            ),
        }
    }
}

fn check_axis(axis: CoordinateAxis, value: f64) -> Result<(), InvalidCoordinate> {
    let bound = axis.bound();
    if (-bound..=bound).contains(&value) {
        Ok(())
    } else {
        Err(InvalidCoordinate { axis, value })
    }
}

#[allow(clippy::cast_possible_truncation)] // |value| <= 180 * 3.6e6 fits in i64
fn to_millis(degrees: f64) -> i64 {
    (degrees * MILLIS_PER_DEGREE).round() as i64
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}
