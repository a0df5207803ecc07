//! Domain layer for the maps places core
//!
//! Contains the [`Location`] value object, the decimal/DMS coordinate codec
//! and domain errors. This layer performs no I/O.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
