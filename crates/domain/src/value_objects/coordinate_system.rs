//! Coordinate reference system and unit selectors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geodetic datum the provider should interpret coordinates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateDatum {
    /// World Geodetic System 1984
    #[default]
    Wgs84,
    /// Tokyo datum (legacy Japanese geodetic system)
    Tokyo,
}

impl CoordinateDatum {
    /// Wire value of the `datum` parameter
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wgs84 => "wgs84",
            Self::Tokyo => "tokyo",
        }
    }
}

impl fmt::Display for CoordinateDatum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoordinateDatum {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wgs84" => Ok(Self::Wgs84),
            "tokyo" => Ok(Self::Tokyo),
            _ => Err(format!("Unknown datum: {s}. Valid values: wgs84, tokyo")),
        }
    }
}

/// Unit coordinates are expressed in on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateUnit {
    /// Decimal degrees
    #[default]
    Degree,
    /// Milliseconds of arc
    Millisec,
}

impl CoordinateUnit {
    /// Wire value of the `coord_unit` parameter
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Millisec => "millisec",
        }
    }
}

impl fmt::Display for CoordinateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoordinateUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "degree" | "deg" => Ok(Self::Degree),
            "millisec" | "ms" => Ok(Self::Millisec),
            _ => Err(format!(
                "Unknown coordinate unit: {s}. Valid values: degree, millisec"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_provider_defaults() {
        assert_eq!(CoordinateDatum::default(), CoordinateDatum::Wgs84);
        assert_eq!(CoordinateUnit::default(), CoordinateUnit::Degree);
    }

    #[test]
    fn wire_values() {
        assert_eq!(CoordinateDatum::Wgs84.as_str(), "wgs84");
        assert_eq!(CoordinateDatum::Tokyo.to_string(), "tokyo");
        assert_eq!(CoordinateUnit::Degree.as_str(), "degree");
        assert_eq!(CoordinateUnit::Millisec.to_string(), "millisec");
    }

    #[test]
    fn parse_from_str() {
        assert_eq!("WGS84".parse::<CoordinateDatum>(), Ok(CoordinateDatum::Wgs84));
        assert_eq!("tokyo".parse::<CoordinateDatum>(), Ok(CoordinateDatum::Tokyo));
        assert_eq!("ms".parse::<CoordinateUnit>(), Ok(CoordinateUnit::Millisec));
        assert!("jgd2011".parse::<CoordinateDatum>().is_err());
        assert!("radian".parse::<CoordinateUnit>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&CoordinateDatum::Wgs84).expect("serialize");
        assert_eq!(json, "\"wgs84\"");
        let unit: CoordinateUnit = serde_json::from_str("\"millisec\"").expect("deserialize");
        assert_eq!(unit, CoordinateUnit::Millisec);
    }
}
