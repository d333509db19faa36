//! Value Objects - Immutable, identity-less domain primitives

mod coordinate;
mod coordinate_system;

pub use coordinate::Coordinate;
pub use coordinate_system::{CoordinateDatum, CoordinateUnit};
