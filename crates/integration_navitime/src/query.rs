//! Route query construction
//!
//! [`RouteQueryBuilder`] validates caller input and produces an immutable
//! [`RouteQuery`], which knows how to serialize itself into the provider's
//! GET parameters.

use chrono::{Local, NaiveDateTime, SubsecRound};
use domain::{Coordinate, CoordinateDatum, CoordinateUnit};

use crate::config::NavitimeConfig;
use crate::error::RouteError;

/// Wire format of `start_time` (local time, no offset)
pub const START_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const DEFAULT_SEARCH_WINDOW_MINUTES: u32 = 1440;
const DEFAULT_RESULT_LIMIT: u32 = 5;

/// A validated, immutable transit route query
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    origin: Coordinate,
    destination: Coordinate,
    departure_time: NaiveDateTime,
    search_window_minutes: u32,
    result_limit: u32,
    datum: CoordinateDatum,
    coordinate_unit: CoordinateUnit,
}

impl RouteQuery {
    /// Start building a query
    #[must_use]
    pub fn builder() -> RouteQueryBuilder {
        RouteQueryBuilder::default()
    }

    /// Origin of the trip
    #[must_use]
    pub const fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Destination of the trip
    #[must_use]
    pub const fn destination(&self) -> Coordinate {
        self.destination
    }

    /// Local departure time, whole seconds
    #[must_use]
    pub const fn departure_time(&self) -> NaiveDateTime {
        self.departure_time
    }

    /// Search window (`term`) in minutes
    #[must_use]
    pub const fn search_window_minutes(&self) -> u32 {
        self.search_window_minutes
    }

    /// Maximum number of itineraries requested
    #[must_use]
    pub const fn result_limit(&self) -> u32 {
        self.result_limit
    }

    /// Datum the coordinates are expressed in
    #[must_use]
    pub const fn datum(&self) -> CoordinateDatum {
        self.datum
    }

    /// Unit the coordinates are sent in
    #[must_use]
    pub const fn coordinate_unit(&self) -> CoordinateUnit {
        self.coordinate_unit
    }

    /// Provider query parameters, in wire order
    #[must_use]
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start", self.origin.format_lon_lat(self.coordinate_unit)),
            ("goal", self.destination.format_lon_lat(self.coordinate_unit)),
            ("datum", self.datum.as_str().to_string()),
            ("term", self.search_window_minutes.to_string()),
            ("limit", self.result_limit.to_string()),
            (
                "start_time",
                self.departure_time.format(START_TIME_FORMAT).to_string(),
            ),
            ("coord_unit", self.coordinate_unit.as_str().to_string()),
        ]
    }

    /// Query string (`key=value&...`) sent to the provider
    ///
    /// Values only ever contain digits, letters, `-`, `.`, `,` and `:`, all of
    /// which are legal in a URL query component, so no percent-encoding is applied.
    #[must_use]
    pub fn query_string(&self) -> String {
        self.query_params()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Builder for [`RouteQuery`]
#[derive(Debug, Clone)]
pub struct RouteQueryBuilder {
    origin: Option<(f64, f64)>,
    destination: Option<(f64, f64)>,
    departure_time: Option<NaiveDateTime>,
    search_window_minutes: u32,
    result_limit: u32,
    datum: CoordinateDatum,
    coordinate_unit: CoordinateUnit,
}

impl Default for RouteQueryBuilder {
    fn default() -> Self {
        Self {
            origin: None,
            destination: None,
            departure_time: None,
            search_window_minutes: DEFAULT_SEARCH_WINDOW_MINUTES,
            result_limit: DEFAULT_RESULT_LIMIT,
            datum: CoordinateDatum::default(),
            coordinate_unit: CoordinateUnit::default(),
        }
    }
}

impl RouteQueryBuilder {
    /// Builder seeded with the search window and result limit from configuration
    #[must_use]
    pub fn from_config(config: &NavitimeConfig) -> Self {
        Self {
            search_window_minutes: config.search_window_minutes,
            result_limit: config.result_limit,
            ..Self::default()
        }
    }

    /// Set the origin (latitude, longitude in degrees)
    #[must_use]
    pub const fn origin(mut self, latitude: f64, longitude: f64) -> Self {
        self.origin = Some((latitude, longitude));
        self
    }

    /// Set the destination (latitude, longitude in degrees)
    #[must_use]
    pub const fn destination(mut self, latitude: f64, longitude: f64) -> Self {
        self.destination = Some((latitude, longitude));
        self
    }

    /// Set the local departure time; defaults to now
    #[must_use]
    pub const fn departure_time(mut self, departure_time: NaiveDateTime) -> Self {
        self.departure_time = Some(departure_time);
        self
    }

    /// Set the search window in minutes
    #[must_use]
    pub const fn search_window_minutes(mut self, minutes: u32) -> Self {
        self.search_window_minutes = minutes;
        self
    }

    /// Set the maximum number of itineraries
    #[must_use]
    pub const fn result_limit(mut self, limit: u32) -> Self {
        self.result_limit = limit;
        self
    }

    /// Set the coordinate datum
    #[must_use]
    pub const fn datum(mut self, datum: CoordinateDatum) -> Self {
        self.datum = datum;
        self
    }

    /// Set the unit coordinates are sent in
    #[must_use]
    pub const fn coordinate_unit(mut self, unit: CoordinateUnit) -> Self {
        self.coordinate_unit = unit;
        self
    }

    /// Validate the inputs and build the query
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Validation`] naming the first offending field.
    pub fn build(self) -> Result<RouteQuery, RouteError> {
        let origin = endpoint("origin", self.origin)?;
        let destination = endpoint("destination", self.destination)?;

        if self.search_window_minutes == 0 {
            return Err(RouteError::validation(
                "search_window_minutes",
                "must be greater than 0",
            ));
        }

        if self.result_limit == 0 {
            return Err(RouteError::validation(
                "result_limit",
                "must be greater than 0",
            ));
        }

        let departure_time = self
            .departure_time
            .unwrap_or_else(|| Local::now().naive_local())
            .trunc_subsecs(0);

        Ok(RouteQuery {
            origin,
            destination,
            departure_time,
            search_window_minutes: self.search_window_minutes,
            result_limit: self.result_limit,
            datum: self.datum,
            coordinate_unit: self.coordinate_unit,
        })
    }
}

fn endpoint(name: &str, value: Option<(f64, f64)>) -> Result<Coordinate, RouteError> {
    let (latitude, longitude) = value.ok_or_else(|| RouteError::validation(name, "is required"))?;
    Coordinate::new(latitude, longitude).map_err(|e| {
        RouteError::validation(format!("{name}.{}", e.axis), e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeDelta};

    use super::*;

    fn departure() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 17)
            .unwrap()
            .and_hms_opt(14, 18, 0)
            .unwrap()
    }

    fn hikone_to_maibara() -> RouteQueryBuilder {
        RouteQuery::builder()
            .origin(35.2746, 136.2522)
            .destination(35.3147, 136.2908)
    }

    fn field_of(err: RouteError) -> String {
        match err {
            RouteError::Validation { field, .. } => field,
            other => unreachable!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_query_string_orders_longitude_first() {
        let query = hikone_to_maibara().departure_time(departure()).build().unwrap();
        let qs = query.query_string();
        assert!(qs.contains("start=136.2522,35.2746"));
        assert!(qs.contains("goal=136.2908,35.3147"));
    }

    #[test]
    fn test_full_query_string() {
        let query = hikone_to_maibara().departure_time(departure()).build().unwrap();
        assert_eq!(
            query.query_string(),
            "start=136.2522,35.2746&goal=136.2908,35.3147&datum=wgs84&term=1440&limit=5\
             &start_time=2026-01-17T14:18:00&coord_unit=degree"
        );
    }

    #[test]
    fn test_query_params_order() {
        let query = hikone_to_maibara().departure_time(departure()).build().unwrap();
        let keys: Vec<&str> = query.query_params().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec!["start", "goal", "datum", "term", "limit", "start_time", "coord_unit"]
        );
    }

    #[test]
    fn test_default_departure_is_now() {
        let before = Local::now().naive_local();
        let query = hikone_to_maibara().build().unwrap();
        let after = Local::now().naive_local();

        assert!(query.departure_time() >= before - TimeDelta::seconds(1));
        assert!(query.departure_time() <= after);
        assert_eq!(query.departure_time().and_utc().timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_explicit_departure_is_kept() {
        let query = hikone_to_maibara().departure_time(departure()).build().unwrap();
        assert_eq!(query.departure_time(), departure());
    }

    #[test]
    fn test_defaults() {
        let query = hikone_to_maibara().build().unwrap();
        assert_eq!(query.search_window_minutes(), 1440);
        assert_eq!(query.result_limit(), 5);
        assert_eq!(query.datum(), CoordinateDatum::Wgs84);
        assert_eq!(query.coordinate_unit(), CoordinateUnit::Degree);
    }

    #[test]
    fn test_from_config() {
        let config = NavitimeConfig {
            search_window_minutes: 120,
            result_limit: 3,
            ..NavitimeConfig::default()
        };
        let query = RouteQueryBuilder::from_config(&config)
            .origin(35.0, 136.0)
            .destination(35.1, 136.1)
            .build()
            .unwrap();
        assert_eq!(query.search_window_minutes(), 120);
        assert_eq!(query.result_limit(), 3);
        assert!(query.query_string().contains("term=120&limit=3"));
    }

    #[test]
    fn test_millisec_unit() {
        let query = RouteQuery::builder()
            .origin(35.5, 139.25)
            .destination(35.0, 139.0)
            .coordinate_unit(CoordinateUnit::Millisec)
            .datum(CoordinateDatum::Tokyo)
            .departure_time(departure())
            .build()
            .unwrap();
        let qs = query.query_string();
        assert!(qs.contains("start=501300000,127800000"));
        assert!(qs.contains("datum=tokyo"));
        assert!(qs.ends_with("coord_unit=millisec"));
    }

    #[test]
    fn test_invalid_origin_latitude() {
        let err = RouteQuery::builder()
            .origin(95.0, 136.0)
            .destination(35.0, 136.0)
            .build()
            .unwrap_err();
        assert_eq!(field_of(err), "origin.latitude");
    }

    #[test]
    fn test_invalid_destination_longitude() {
        let err = RouteQuery::builder()
            .origin(35.0, 136.0)
            .destination(35.0, -190.0)
            .build()
            .unwrap_err();
        assert_eq!(field_of(err), "destination.longitude");
    }

    #[test]
    fn test_missing_endpoints() {
        let err = RouteQuery::builder().destination(35.0, 136.0).build().unwrap_err();
        assert_eq!(field_of(err), "origin");

        let err = RouteQuery::builder().origin(35.0, 136.0).build().unwrap_err();
        assert_eq!(field_of(err), "destination");
    }

    #[test]
    fn test_zero_limits_rejected() {
        let err = hikone_to_maibara().result_limit(0).build().unwrap_err();
        assert_eq!(field_of(err), "result_limit");

        let err = hikone_to_maibara().search_window_minutes(0).build().unwrap_err();
        assert_eq!(field_of(err), "search_window_minutes");
    }
}
