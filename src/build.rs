//! Validating constructors for typed GeoJSON objects.
//!
//! Each builder assembles the document, checks it with the validation rules
//! and only then converts it into the `geojson` model. Collections and
//! features move a single CRS declared anywhere below them to their own top
//! level, where it is kept as a foreign member.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use log::debug;
use serde::Serialize;
use serde_json::{Value as JsonValue, json};

use crate::geometry::GeometryType;
use crate::utils::error::Error;
use crate::utils::structure::migrate_crs;
use crate::validation::{coordinates, objects};

/// Converts any serializable GeoJSON value into a plain document.
pub fn to_document<T: Serialize>(value: &T) -> Result<JsonValue, Error> {
    Ok(serde_json::to_value(value)?)
}

/// A geometry of type `kind` holding `coords`.
pub fn geometry(kind: GeometryType, coords: JsonValue) -> Result<Geometry, Error> {
    coordinates::for_type(kind, &coords)?;
    let document = json!({"type": kind.as_str(), "coordinates": coords});
    objects::geometry(&document)?;
    Ok(serde_json::from_value(document)?)
}

pub fn geometry_collection(geometries: Vec<JsonValue>) -> Result<Geometry, Error> {
    geometries.iter().try_for_each(objects::geometry)?;
    let mut document = json!({"type": "GeometryCollection", "geometries": geometries});
    hoist_crs(&mut document);
    objects::geometry(&document)?;
    Ok(serde_json::from_value(document)?)
}

/// A feature with an optional geometry and optional properties.
pub fn feature(geometry: Option<JsonValue>, properties: Option<JsonObject>) -> Result<Feature, Error> {
    if let Some(geometry) = &geometry {
        objects::geometry(geometry)?;
    }
    let properties = properties.map(JsonValue::Object);
    if let Some(properties) = &properties {
        objects::properties(properties)?;
    }
    let mut document = json!({
        "type": "Feature",
        "geometry": geometry.unwrap_or(JsonValue::Null),
        "properties": properties.unwrap_or(JsonValue::Null),
    });
    hoist_crs(&mut document);
    objects::feature(&document)?;
    Ok(serde_json::from_value(document)?)
}

pub fn feature_collection(features: Vec<JsonValue>) -> Result<FeatureCollection, Error> {
    features.iter().try_for_each(objects::feature)?;
    let mut document = json!({"type": "FeatureCollection", "features": features});
    hoist_crs(&mut document);
    objects::feature_collection(&document)?;
    Ok(serde_json::from_value(document)?)
}

fn hoist_crs(document: &mut JsonValue) {
    if migrate_crs(document) {
        debug!("moved CRS declaration to the top of the new {}", document["type"]);
    }
}
