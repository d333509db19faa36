//! Domain layer for the Navitime route client
//!
//! Contains the validated geographic primitives every routing query is built from.
//! This layer performs no I/O and knows nothing about the provider's wire format.

pub mod errors;
pub mod value_objects;

pub use errors::{CoordinateAxis, InvalidCoordinate};
pub use value_objects::*;
