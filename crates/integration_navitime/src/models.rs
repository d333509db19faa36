//! Route data models
//!
//! Normalized representation of the provider's itineraries. Every leaf
//! field the provider may omit is a [`Reported`] value, so consumers never
//! have to tell "absent" apart from "present but null".

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::query::START_TIME_FORMAT;

/// Text rendered for a field the provider did not report
pub const UNAVAILABLE: &str = "unavailable";

/// A value the provider either reported or left out
///
/// Serializes as the bare value or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reported<T> {
    /// The provider reported this value
    Available(T),
    /// The provider omitted the field, or sent something unusable
    Unavailable,
}

impl<T> Default for Reported<T> {
    fn default() -> Self {
        Self::Unavailable
    }
}

impl<T> Reported<T> {
    /// Borrow the reported value
    #[must_use]
    pub const fn as_ref(&self) -> Reported<&T> {
        match self {
            Self::Available(value) => Reported::Available(value),
            Self::Unavailable => Reported::Unavailable,
        }
    }

    /// The reported value, if any
    #[must_use]
    pub fn value(self) -> Option<T> {
        self.into()
    }

    /// Transform the reported value
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reported<U> {
        match self {
            Self::Available(value) => Reported::Available(f(value)),
            Self::Unavailable => Reported::Unavailable,
        }
    }

    /// Lazily use another source if this value is unavailable
    #[must_use]
    pub fn or_else(self, f: impl FnOnce() -> Self) -> Self {
        match self {
            Self::Available(_) => self,
            Self::Unavailable => f(),
        }
    }
}

impl<T> From<Option<T>> for Reported<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unavailable, Self::Available)
    }
}

impl<T> From<Reported<T>> for Option<T> {
    fn from(value: Reported<T>) -> Self {
        match value {
            Reported::Available(value) => Some(value),
            Reported::Unavailable => None,
        }
    }
}

impl<T: Serialize> Serialize for Reported<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Available(value) => serializer.serialize_some(value),
            Self::Unavailable => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Reported<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

impl<T: fmt::Display> Reported<T> {
    /// Format as `<value> <unit>`, or `unavailable` without a unit
    #[must_use]
    pub fn with_unit(&self, unit: &str) -> String {
        match self {
            Self::Available(value) => format!("{value} {unit}"),
            Self::Unavailable => UNAVAILABLE.to_string(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Reported<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(value) => write!(f, "{value}"),
            Self::Unavailable => f.write_str(UNAVAILABLE),
        }
    }
}

/// Format a provider timestamp as `HH:MM`
///
/// Accepts RFC 3339 (`2026-01-17T14:20:00+09:00`) and offset-less
/// `YYYY-MM-DDTHH:MM:SS`; the local clock time of the timestamp is kept.
/// Anything else (e.g. an already formatted `14:20`) is returned unchanged.
#[must_use]
pub fn clock_time(raw: &str) -> String {
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return time.format("%H:%M").to_string();
    }
    if let Ok(time) = NaiveDateTime::parse_from_str(raw, START_TIME_FORMAT) {
        return time.format("%H:%M").to_string();
    }
    raw.to_string()
}

/// Display label of a provider train type code
///
/// Unknown codes are shown as sent.
#[must_use]
pub fn train_type_label(code: &str) -> &str {
    match code {
        "Local" => "普通",
        "Rapid" => "快速",
        "Express" => "急行",
        "LimitedExpress" => "特急",
        "SemiExpress" => "準急",
        "RapidExpress" => "快速急行",
        "SpecialRapid" => "新快速",
        "CommuterRapid" => "通勤快速",
        "CommuterLimitedExpress" => "通勤特急",
        other => other,
    }
}

/// Origin or destination of an itinerary as echoed by the provider
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Place {
    /// Display name
    pub label: Reported<String>,
    /// Latitude in degrees
    pub latitude: Reported<f64>,
    /// Longitude in degrees
    pub longitude: Reported<f64>,
}

impl Place {
    /// Format as `<label> (<lat>, <lon>)`
    #[must_use]
    pub fn format_detail(&self) -> String {
        format!("{} ({}, {})", self.label, self.latitude, self.longitude)
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_detail())
    }
}

/// One sub-segment of an itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    /// A walking segment
    Walk {
        /// Walked distance in meters
        distance_meters: Reported<u32>,
        /// Walking time in minutes
        time_minutes: Reported<u32>,
    },
    /// A ride on a transit line, or any other non-walking movement
    Transit {
        /// Line name (e.g. "JR琵琶湖線")
        line_name: Reported<String>,
        /// Provider train type code (e.g. `SpecialRapid`)
        train_type: Reported<String>,
        /// Boarding station
        from_station: Reported<String>,
        /// Boarding platform
        platform: Reported<String>,
        /// Alighting station
        to_station: Reported<String>,
        /// Scheduled departure, as sent by the provider
        departure_time: Reported<String>,
        /// Scheduled arrival, as sent by the provider
        arrival_time: Reported<String>,
        /// Ride time in minutes
        time_minutes: Reported<u32>,
        /// Ride distance in meters
        distance_meters: Reported<u32>,
    },
    /// A section in neither recognized shape, kept verbatim
    Unknown {
        /// Discriminant the section carried (`unknown` if it had none)
        tag: String,
        /// The section exactly as received
        raw_payload: Value,
    },
}

impl Section {
    /// Format this section as a single report line
    ///
    /// Unknown payloads are serialized as compact JSON; a given payload
    /// always produces the same text. Optional transit details (train type,
    /// platform, scheduled times) only appear when reported.
    #[must_use]
    pub fn format_detail(&self) -> String {
        match self {
            Self::Walk {
                distance_meters,
                time_minutes,
            } => format!(
                "Walk | distance: {} | time: {}",
                distance_meters.with_unit("m"),
                time_minutes.with_unit("min")
            ),
            Self::Transit {
                line_name,
                train_type,
                from_station,
                platform,
                to_station,
                departure_time,
                arrival_time,
                time_minutes,
                distance_meters,
            } => {
                let mut line = String::new();
                if let Reported::Available(code) = train_type {
                    line.push_str(&format!("[{}] ", train_type_label(code)));
                }
                line.push_str(&format!("{line_name} | {from_station} → {to_station}"));
                if let Reported::Available(platform) = platform {
                    line.push_str(&format!(" (platform {platform})"));
                }
                let schedule = [("dep", departure_time), ("arr", arrival_time)]
                    .into_iter()
                    .filter_map(|(label, time)| {
                        time.as_ref().map(|t| format!("{label} {}", clock_time(t))).value()
                    })
                    .collect::<Vec<_>>();
                if !schedule.is_empty() {
                    line.push_str(&format!(" | {}", schedule.join(" / ")));
                }
                line.push_str(&format!(
                    " | time: {} | distance: {}",
                    time_minutes.with_unit("min"),
                    distance_meters.with_unit("m")
                ));
                line
            },
            Self::Unknown { tag, raw_payload } => {
                format!("Unknown section ({tag}) | payload: {raw_payload}")
            },
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_detail())
    }
}

/// One candidate end-to-end trip plan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Itinerary {
    /// Where the trip starts
    pub origin: Place,
    /// Where the trip ends
    pub destination: Place,
    /// Departure time, as sent by the provider
    pub departure_time: Reported<String>,
    /// Arrival time, as sent by the provider
    pub arrival_time: Reported<String>,
    /// Total travel time in minutes
    pub total_time_minutes: Reported<u32>,
    /// Total distance in meters
    pub total_distance_meters: Reported<u32>,
    /// Number of changes between transit vehicles
    pub transfer_count: Reported<u32>,
    /// Total fare (JPY)
    pub fare_amount: Reported<u32>,
    /// Sections in travel order
    pub sections: Vec<Section>,
}

/// Itineraries in the provider's ranking order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteResponse {
    /// Found itineraries
    pub itineraries: Vec<Itinerary>,
}

impl RouteResponse {
    /// Create a response with no results
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if no itinerary was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.itineraries.is_empty()
    }

    /// Number of itineraries
    #[must_use]
    pub fn len(&self) -> usize {
        self.itineraries.len()
    }
}
