//! Domain-level errors

use std::fmt;

use thiserror::Error;

/// The coordinate axis a validation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateAxis {
    /// North/south axis, valid range [-90, 90]
    Latitude,
    /// East/west axis, valid range [-180, 180]
    Longitude,
}

impl CoordinateAxis {
    /// Field name used when reporting the axis
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
        }
    }

    /// Inclusive bound of the axis range (the range is symmetric around zero)
    #[must_use]
    pub const fn bound(self) -> f64 {
        match self {
            Self::Latitude => 90.0,
            Self::Longitude => 180.0,
        }
    }
}

impl fmt::Display for CoordinateAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coordinate component outside its valid range (or not a finite number)
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("Invalid {axis}: {value} is outside [-{bound}, {bound}]", bound = .axis.bound())]
pub struct InvalidCoordinate {
    /// The offending axis
    pub axis: CoordinateAxis,
    /// The rejected value
    pub value: f64,
}
