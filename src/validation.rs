//! Recursive validation of untrusted GeoJSON documents.
//!
//! Every rule returns the first failure it meets as an [`Error`]; the public
//! entry points decide whether that failure is reported or reduced to `false`.

pub mod coordinates;
pub mod crs;
pub mod objects;

use log::debug;
use serde_json::Value as JsonValue;

use crate::utils::error::Error;
use crate::utils::structure::document_type;

/// What a document is expected to be when it is not inferred from its `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Position,
    MultiPoint,
    LineString,
    LinearRing,
    MultiLineString,
    Polygon,
    MultiPolygon,
    Geometry,
    Feature,
    FeatureCollection,
    Properties,
    Crs,
}

/// Validates `document`, returning the first failure found.
///
/// Without a `kind`, features and feature collections are recognised by their
/// `type` and everything else is checked as a geometry.
pub fn validate(document: &JsonValue, kind: Option<Kind>) -> Result<(), Error> {
    let kind = kind.unwrap_or_else(|| infer_kind(document));
    match kind {
        Kind::Position => coordinates::position(document),
        Kind::MultiPoint => coordinates::multi_point(document),
        Kind::LineString => coordinates::line_string(document, false),
        Kind::LinearRing => coordinates::line_string(document, true),
        Kind::MultiLineString => coordinates::multi_line_string(document, false),
        Kind::Polygon => coordinates::polygon(document),
        Kind::MultiPolygon => coordinates::multi_polygon(document),
        Kind::Geometry => objects::geometry(document),
        Kind::Feature => objects::feature(document),
        Kind::FeatureCollection => objects::feature_collection(document),
        Kind::Properties => objects::properties(document),
        Kind::Crs => crs::crs_object(document),
    }
}

/// Validates a GeoJSON geometry, feature or feature collection.
///
/// With `detailed` unset the outcome is `Ok(true)` or `Ok(false)` and never an
/// error. With `detailed` set, the first failure is returned as `Err`.
pub fn validate_geojson(document: &JsonValue, detailed: bool) -> Result<bool, Error> {
    match validate(document, None) {
        Ok(()) => Ok(true),
        Err(error) if detailed => Err(error),
        Err(error) => {
            debug!("document rejected: {}", error);
            Ok(false)
        }
    }
}

/// Shorthand for the silent mode of [`validate_geojson`].
pub fn is_valid(document: &JsonValue) -> bool {
    validate(document, None).is_ok()
}

fn infer_kind(document: &JsonValue) -> Kind {
    match document_type(document) {
        Some("Feature") => Kind::Feature,
        Some("FeatureCollection") => Kind::FeatureCollection,
        _ => Kind::Geometry,
    }
}
