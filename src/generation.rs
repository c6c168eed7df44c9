//! Random GeoJSON that always passes validation.

pub mod factory;
pub mod options;
pub mod random;
