//! Conformance validators for generated master schemas.

pub mod schema;
