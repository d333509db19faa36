//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::errors::CoordinateAxis;
use domain::value_objects::{Coordinate, CoordinateUnit};
use proptest::prelude::*;

// ============================================================================
// Coordinate Property Tests
// ============================================================================

mod coordinate_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_coordinates_create_coordinate(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let result = Coordinate::new(lat, lon);
            prop_assert!(result.is_ok());

            let coord = result.unwrap();
            prop_assert!((coord.latitude() - lat).abs() < f64::EPSILON);
            prop_assert!((coord.longitude() - lon).abs() < f64::EPSILON);
        }

        #[test]
        fn invalid_latitude_rejected(
            lat in prop_oneof![
                (-1000.0f64..-90.1f64),
                (90.1f64..1000.0f64)
            ],
            lon in -180.0f64..=180.0f64
        ) {
            let err = Coordinate::new(lat, lon).unwrap_err();
            prop_assert_eq!(err.axis, CoordinateAxis::Latitude);
        }

        #[test]
        fn invalid_longitude_rejected(
            lat in -90.0f64..=90.0f64,
            lon in prop_oneof![
                (-1000.0f64..-180.1f64),
                (180.1f64..1000.0f64)
            ]
        ) {
            let err = Coordinate::new(lat, lon).unwrap_err();
            prop_assert_eq!(err.axis, CoordinateAxis::Longitude);
        }

        #[test]
        fn degree_format_puts_longitude_first(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let coord = Coordinate::new(lat, lon).unwrap();
            let formatted = coord.format_lon_lat(CoordinateUnit::Degree);
            prop_assert_eq!(formatted, format!("{lon},{lat}"));
        }

        #[test]
        fn millisec_format_has_two_integer_components(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let coord = Coordinate::new(lat, lon).unwrap();
            let formatted = coord.format_lon_lat(CoordinateUnit::Millisec);
            let parts: Vec<&str> = formatted.split(',').collect();
            prop_assert_eq!(parts.len(), 2);
            prop_assert!(parts[0].parse::<i64>().is_ok());
            prop_assert!(parts[1].parse::<i64>().is_ok());
        }
    }
}
