// 

pub mod build;
pub mod generation;
pub mod geometry;
pub mod utils;
pub mod validation;

pub use generation::factory::RandomFactory;
pub use generation::options::GenerationOptions;
pub use geometry::{GeometryType, is_geometry_type};
pub use utils::error::{Error, ErrorKind};
pub use validation::{is_valid, validate_geojson};
