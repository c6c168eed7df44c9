//! Shape rules for coordinate arrays, from a single position up to the
//! four-level nesting of a MultiPolygon.

use serde_json::Value as JsonValue;

use crate::geometry::GeometryType;
use crate::utils::error::Error;

fn members(value: &JsonValue) -> Result<&Vec<JsonValue>, Error> {
    value.as_array().ok_or_else(|| Error::NotArray(value.clone()))
}

/// A position: an array of at least two numbers.
pub fn position(value: &JsonValue) -> Result<(), Error> {
    let coordinates = members(value)?;
    if let Some(bad) = coordinates.iter().find(|member| !member.is_number()) {
        return Err(Error::NotNumber(bad.clone()));
    }
    if coordinates.len() < 2 {
        return Err(Error::TooFewCoordinates(value.clone()));
    }
    Ok(())
}

/// An array of positions. With `linear_ring` the first and last positions
/// must be equal component-wise.
pub fn line_string(value: &JsonValue, linear_ring: bool) -> Result<(), Error> {
    let positions = members(value)?;
    positions.iter().try_for_each(position)?;
    if linear_ring && !is_closed(positions) {
        return Err(Error::UnclosedLinearRing(value.clone()));
    }
    Ok(())
}

pub fn multi_point(value: &JsonValue) -> Result<(), Error> {
    line_string(value, false)
}

pub fn multi_line_string(value: &JsonValue, linear_ring: bool) -> Result<(), Error> {
    members(value)?
        .iter()
        .try_for_each(|line| line_string(line, linear_ring))
}

pub fn polygon(value: &JsonValue) -> Result<(), Error> {
    multi_line_string(value, true)
}

pub fn multi_polygon(value: &JsonValue) -> Result<(), Error> {
    members(value)?.iter().try_for_each(polygon)
}

/// Validates `coordinates` with the shape rule matching `kind`.
///
/// A GeometryCollection has no coordinates of its own, so any value is
/// reported as malformed for it.
pub fn for_type(kind: GeometryType, coordinates: &JsonValue) -> Result<(), Error> {
    match kind {
        GeometryType::Point => position(coordinates),
        GeometryType::MultiPoint => multi_point(coordinates),
        GeometryType::LineString => line_string(coordinates, false),
        GeometryType::MultiLineString => multi_line_string(coordinates, false),
        GeometryType::Polygon => polygon(coordinates),
        GeometryType::MultiPolygon => multi_polygon(coordinates),
        GeometryType::GeometryCollection => Err(Error::MalformedGeoJson(coordinates.clone())),
    }
}

/// A bounding box holds `stride * 2` numbers.
pub fn bbox(value: &JsonValue, stride: usize) -> Result<(), Error> {
    position(value)?;
    if members(value)?.len() != stride * 2 {
        return Err(Error::BboxLengthMismatch(value.clone()));
    }
    Ok(())
}

fn is_closed(positions: &[JsonValue]) -> bool {
    let (Some(first), Some(last)) = (positions.first(), positions.last()) else {
        return false;
    };
    let (Some(first), Some(last)) = (first.as_array(), last.as_array()) else {
        return false;
    };
    first.iter().enumerate().all(|(i, component)| {
        matches!(
            (component.as_f64(), last.get(i).and_then(JsonValue::as_f64)),
            (Some(a), Some(b)) if a == b
        )
    })
}
