//! Result shaping module
//!
//! Converts store documents into the records returned to callers.

mod movie;

pub use movie::{id_to_string, MovieRecord};
