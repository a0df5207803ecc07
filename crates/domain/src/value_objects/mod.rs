//! Value Objects - Immutable, identity-less domain primitives

pub mod coordinates;
mod location;

pub use coordinates::{CoordinateFormat, FormattedCoordinates, format_coordinates, parse_coordinates};
pub use location::{Location, is_valid_coordinate};
