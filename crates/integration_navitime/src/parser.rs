//! Provider response normalization
//!
//! The route endpoint has been observed returning sections in two
//! incompatible shapes:
//!
//! * **keyed** - a section is recognized by the key it carries:
//!   `{"walk": {"move": {...}}}` or `{"transit": {...}}`;
//! * **typed** - a section carries an explicit discriminant:
//!   `{"type": "move", "move": {...}}`, `{"type": "walk", "walk": {...}}` or
//!   `{"type": "transit", "transit": {...}}`.
//!
//! Each section's discriminant is resolved exactly once
//! ([`SectionKind::resolve`]) and then mapped into the closed [`Section`]
//! variant set. A `move` by anything other than walking is a ride and maps
//! to [`Section::Transit`]. Sections in neither shape become
//! [`Section::Unknown`] with their payload kept verbatim.
//!
//! # Itinerary layout
//!
//! The summary block is read from `summary`, then `route_summary`, then the
//! itinerary object itself. `sections` is normally an array; a single
//! section object is treated as a one-element list, and any other non-null
//! value becomes one unknown section, so no section is ever dropped.
//!
//! # Time units
//!
//! Time fields are normalized to minutes with the following rule:
//!
//! 1. `time_minutes` / `time_min` are minutes, `time_seconds` / `time_sec`
//!    are seconds, wherever they appear;
//! 2. a plain `time` is minutes, except in the itinerary summary
//!    (`summary.move.time`) of a keyed-shape itinerary, where an integer is
//!    seconds and a fractional number is already minutes.
//!
//! An itinerary is typed-shape when at least one of its sections carries a
//! string `type`; otherwise it is keyed-shape. Seconds are converted by
//! floor division; fractional minutes are rounded.
//!
//! Missing, null, negative, or mistyped leaf values become
//! [`Reported::Unavailable`]; they never fail the parse.

use serde_json::Value;
use tracing::debug;

use crate::error::RouteError;
use crate::models::{Itinerary, Place, Reported, RouteResponse, Section};

/// Tag given to sections that carry no discriminant at all
pub const UNKNOWN_SECTION_TAG: &str = "unknown";

/// Explicitly named time fields, checked before a plain `time`
const NAMED_TIME_FIELDS: [(&str, TimeUnit); 4] = [
    ("time_minutes", TimeUnit::Minutes),
    ("time_min", TimeUnit::Minutes),
    ("time_seconds", TimeUnit::Seconds),
    ("time_sec", TimeUnit::Seconds),
];

/// Parse a raw response body into a [`RouteResponse`]
///
/// # Errors
///
/// Returns [`RouteError::Decode`] if the body is not JSON, the top-level
/// value is not an object, or `items` is present but not an array.
pub fn parse(raw: &str) -> Result<RouteResponse, RouteError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| RouteError::decode(e.to_string(), raw))?;
    normalize(&value).map_err(|message| RouteError::decode(message, raw))
}

/// Parse an already-decoded JSON value into a [`RouteResponse`]
///
/// # Errors
///
/// Returns [`RouteError::Decode`] if the value is not an object or `items`
/// is present but not an array.
pub fn parse_value(value: &Value) -> Result<RouteResponse, RouteError> {
    normalize(value).map_err(|message| RouteError::decode(message, &value.to_string()))
}

fn normalize(value: &Value) -> Result<RouteResponse, String> {
    let Some(root) = value.as_object() else {
        return Err(format!(
            "expected a JSON object at the top level, found {}",
            json_type(value)
        ));
    };

    let items = match root.get("items") {
        None | Some(Value::Null) => return Ok(RouteResponse::empty()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(format!(
                "expected `items` to be an array, found {}",
                json_type(other)
            ));
        },
    };

    let itineraries: Vec<Itinerary> = items.iter().map(parse_itinerary).collect();
    debug!(count = itineraries.len(), "Normalized itineraries");

    Ok(RouteResponse { itineraries })
}

/// Which of the two observed payload shapes an itinerary uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadShape {
    /// Sections recognized by a `walk` / `transit` key
    Keyed,
    /// Sections carrying an explicit `type` discriminant
    Typed,
}

impl PayloadShape {
    fn detect(sections: &[Value]) -> Self {
        if sections
            .iter()
            .any(|section| section.get("type").is_some_and(Value::is_string))
        {
            Self::Typed
        } else {
            Self::Keyed
        }
    }

    /// How a plain `summary.move.time` is interpreted for this shape
    const fn summary_time_rule(self) -> PlainTimeRule {
        match self {
            Self::Keyed => PlainTimeRule::SecondsIfInteger,
            Self::Typed => PlainTimeRule::Minutes,
        }
    }
}

/// Resolved discriminant of a single section
#[derive(Debug, Clone, PartialEq, Eq)]
enum SectionKind {
    Walk,
    Transit,
    /// A typed `move` by a non-walking transport
    Ride,
    Unknown(String),
}

impl SectionKind {
    /// Resolve the discriminant of a section
    ///
    /// A string `type` takes precedence over key presence. A `move` whose
    /// transport type is given and is not `walk` is a ride.
    fn resolve(section: &Value) -> Self {
        if let Some(tag) = section.get("type").and_then(Value::as_str) {
            return match tag {
                "transit" => Self::Transit,
                "walk" => Self::Walk,
                "move" if is_walking_move(section) => Self::Walk,
                "move" => Self::Ride,
                other => Self::Unknown(other.to_string()),
            };
        }

        if section.get("walk").is_some() {
            Self::Walk
        } else if section.get("transit").is_some() {
            Self::Transit
        } else {
            Self::Unknown(UNKNOWN_SECTION_TAG.to_string())
        }
    }
}

fn is_walking_move(section: &Value) -> bool {
    let transport = match section.get("move") {
        Some(Value::String(mode)) => Some(mode.as_str()),
        Some(block @ Value::Object(_)) => block.get("transport_type").and_then(Value::as_str),
        _ => None,
    };
    transport.is_none_or(|mode| mode == "walk")
}

/// Sections of an itinerary, with a lone section treated as a list of one
fn section_list(item: &Value) -> &[Value] {
    match item.get("sections") {
        None | Some(Value::Null) => &[],
        Some(Value::Array(sections)) => sections,
        Some(single) => {
            debug!(kind = json_type(single), "Wrapping non-array sections");
            std::slice::from_ref(single)
        },
    }
}

/// Summary block of an itinerary: `summary`, `route_summary`, or the item itself
fn summary_block(item: &Value) -> &Value {
    ["summary", "route_summary"]
        .into_iter()
        .find_map(|key| item.get(key).filter(|block| block.is_object()))
        .unwrap_or(item)
}

fn parse_itinerary(item: &Value) -> Itinerary {
    let sections = section_list(item);
    let shape = PayloadShape::detect(sections);

    let summary = summary_block(item);
    let movement = summary.get("move");

    let fare_amount = count(summary.pointer("/fare/total"))
        .or_else(|| count(movement.and_then(|m| m.pointer("/fare/unit_0"))));

    Itinerary {
        origin: parse_place(summary.get("start")),
        destination: parse_place(summary.get("goal")),
        departure_time: text(summary.get("start_time"))
            .or_else(|| text(item.get("departure_time"))),
        arrival_time: text(summary.get("arrival_time")),
        total_time_minutes: minutes(movement, shape.summary_time_rule()),
        total_distance_meters: count(movement.and_then(|m| m.get("distance"))),
        transfer_count: count(movement.and_then(|m| m.get("transfer_count"))),
        fare_amount,
        sections: sections.iter().map(parse_section).collect(),
    }
}

fn parse_place(place: Option<&Value>) -> Place {
    let Some(place) = place else {
        return Place::default();
    };
    let coord = place.get("coord").filter(|c| c.is_object()).unwrap_or(place);

    Place {
        label: text(place.get("name")),
        latitude: degrees(coord.get("lat")),
        longitude: degrees(coord.get("lon")),
    }
}

fn parse_section(section: &Value) -> Section {
    match SectionKind::resolve(section) {
        SectionKind::Walk => parse_walk(section),
        SectionKind::Transit => parse_transit(section),
        SectionKind::Ride => parse_ride(section),
        SectionKind::Unknown(tag) => {
            debug!(%tag, "Keeping unrecognized section verbatim");
            Section::Unknown {
                tag,
                raw_payload: section.clone(),
            }
        },
    }
}

fn parse_walk(section: &Value) -> Section {
    let walk = section.get("walk").filter(|w| w.is_object()).unwrap_or(section);
    let metrics = walk.get("move").filter(|m| m.is_object()).unwrap_or(walk);

    Section::Walk {
        distance_meters: count(metrics.get("distance")),
        time_minutes: minutes(Some(metrics), PlainTimeRule::Minutes),
    }
}

fn parse_transit(section: &Value) -> Section {
    let transit = section.get("transit");
    let ride = transit.and_then(|t| t.get("move"));

    Section::Transit {
        line_name: text(transit.and_then(|t| t.pointer("/line/name"))),
        train_type: text(transit.and_then(|t| t.pointer("/line/trainType")))
            .or_else(|| text(transit.and_then(|t| t.pointer("/line/train_type")))),
        from_station: text(transit.and_then(|t| t.pointer("/from/name"))),
        platform: label(transit.and_then(|t| t.pointer("/from/platform"))),
        to_station: text(transit.and_then(|t| t.pointer("/to/name"))),
        departure_time: text(transit.and_then(|t| t.get("departureTime"))),
        arrival_time: text(transit.and_then(|t| t.get("arrivalTime"))),
        time_minutes: minutes(transit, PlainTimeRule::Minutes)
            .or_else(|| minutes(ride, PlainTimeRule::Minutes)),
        distance_meters: count(transit.and_then(|t| t.get("distance")))
            .or_else(|| count(ride.and_then(|m| m.get("distance")))),
    }
}

/// A typed `move` section by bus, train, car or any other non-walking transport
fn parse_ride(section: &Value) -> Section {
    let movement = section.get("move");
    let block = movement.filter(|m| m.is_object());

    let line_name = text(section.get("line_name"))
        .or_else(|| text(section.pointer("/transport/name")))
        .or_else(|| text(block.and_then(|m| m.get("transport_type"))))
        .or_else(|| text(movement));

    Section::Transit {
        line_name,
        train_type: Reported::Unavailable,
        from_station: text(section.pointer("/from/name")),
        platform: Reported::Unavailable,
        to_station: text(section.pointer("/to/name")),
        departure_time: Reported::Unavailable,
        arrival_time: Reported::Unavailable,
        time_minutes: minutes(Some(section), PlainTimeRule::Minutes)
            .or_else(|| minutes(block, PlainTimeRule::Minutes)),
        distance_meters: count(section.get("distance"))
            .or_else(|| count(block.and_then(|m| m.get("distance")))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeUnit {
    Seconds,
    Minutes,
}

/// Interpretation of a plain `time` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlainTimeRule {
    Minutes,
    SecondsIfInteger,
}

impl PlainTimeRule {
    fn unit_for(self, value: &Value) -> TimeUnit {
        match self {
            Self::Minutes => TimeUnit::Minutes,
            Self::SecondsIfInteger if value.is_u64() => TimeUnit::Seconds,
            Self::SecondsIfInteger => TimeUnit::Minutes,
        }
    }
}

/// Read a duration in minutes from a container holding time fields
fn minutes(container: Option<&Value>, rule: PlainTimeRule) -> Reported<u32> {
    let Some(container) = container else {
        return Reported::Unavailable;
    };

    let named = NAMED_TIME_FIELDS.iter().find_map(|(key, unit)| {
        container
            .get(*key)
            .filter(|v| !v.is_null())
            .map(|v| (v, *unit))
    });

    let Some((value, unit)) =
        named.or_else(|| container.get("time").map(|v| (v, rule.unit_for(v))))
    else {
        return Reported::Unavailable;
    };

    let converted = match unit {
        TimeUnit::Minutes => non_negative(value).and_then(rounded),
        TimeUnit::Seconds => non_negative(value).and_then(|secs| rounded((secs / 60.0).floor())),
    };
    converted.into()
}

fn count(value: Option<&Value>) -> Reported<u32> {
    value.and_then(non_negative).and_then(rounded).into()
}

fn degrees(value: Option<&Value>) -> Reported<f64> {
    value
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .into()
}

fn text(value: Option<&Value>) -> Reported<String> {
    value.and_then(Value::as_str).map(str::to_string).into()
}

/// A short label sent either as a string or as a number (e.g. a platform)
fn label(value: Option<&Value>) -> Reported<String> {
    match value {
        Some(Value::String(label)) => Reported::Available(label.clone()),
        Some(Value::Number(number)) => Reported::Available(number.to_string()),
        _ => Reported::Unavailable,
    }
}

fn non_negative(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite() && *v >= 0.0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // range checked
fn rounded(value: f64) -> Option<u32> {
    let value = value.round();
    (value <= f64::from(u32::MAX)).then_some(value as u32)
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
