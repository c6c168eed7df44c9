//! Whole-object rules: geometries, features, their collections and properties.

use serde_json::Value as JsonValue;

use crate::geometry::GeometryType;
use crate::utils::error::Error;
use crate::utils::structure::{document_stride, first_coordinates, stride};
use crate::validation::{coordinates, crs};

/// Members that are present and not null.
fn present<'a>(object: &'a JsonValue, key: &str) -> Option<&'a JsonValue> {
    object.get(key).filter(|value| !value.is_null())
}

fn check_bbox(object: &JsonValue, stride: usize) -> Result<(), Error> {
    match present(object, "bbox") {
        Some(bbox) => coordinates::bbox(bbox, stride),
        None => Ok(()),
    }
}

pub fn geometry(geom: &JsonValue) -> Result<(), Error> {
    let Some(geom_type) = present(geom, "type") else {
        return Err(Error::MalformedGeoJson(geom.clone()));
    };
    crs::single_crs(geom)?;
    let kind = geom_type
        .as_str()
        .and_then(GeometryType::from_name)
        .ok_or_else(|| Error::UnsupportedGeometryType(geom_type.clone()))?;
    if kind == GeometryType::GeometryCollection {
        return geometry_collection(geom);
    }
    let coords = present(geom, "coordinates").ok_or_else(|| Error::MalformedGeoJson(geom.clone()))?;
    coordinates::for_type(kind, coords)?;
    check_bbox(geom, stride(coords))
}

pub fn geometry_collection(geom: &JsonValue) -> Result<(), Error> {
    let geometries = present(geom, "geometries").ok_or_else(|| Error::MalformedGeoJson(geom.clone()))?;
    let members = geometries
        .as_array()
        .ok_or_else(|| Error::NotArray(geometries.clone()))?;
    members.iter().try_for_each(geometry)?;
    check_bbox(geom, document_stride(geom))
}

pub fn feature(feat: &JsonValue) -> Result<(), Error> {
    match feat.get("type") {
        Some(JsonValue::String(name)) if name == "Feature" => {}
        other => {
            return Err(Error::UnsupportedFeatureType(other.cloned().unwrap_or(JsonValue::Null)));
        }
    }
    crs::single_crs(feat)?;
    let geom = null_or_object(feat, "geometry")?;
    if let Some(geom) = geom {
        geometry(geom)?;
    }
    if let Some(props) = null_or_object(feat, "properties")? {
        properties(props)?;
    }
    let geometry_stride = geom
        .and_then(first_coordinates)
        .map(stride)
        .unwrap_or(0);
    check_bbox(feat, geometry_stride)
}

pub fn feature_collection(feat: &JsonValue) -> Result<(), Error> {
    match feat.get("type") {
        Some(JsonValue::String(name)) if name == "FeatureCollection" => {}
        other => {
            return Err(Error::UnsupportedFeatureType(other.cloned().unwrap_or(JsonValue::Null)));
        }
    }
    let features = feat.get("features").unwrap_or(&JsonValue::Null);
    let members = features
        .as_array()
        .ok_or_else(|| Error::NotArray(features.clone()))?;
    crs::single_crs(feat)?;
    members.iter().try_for_each(feature)?;
    check_bbox(feat, document_stride(feat))
}

/// A flat mapping from names to strings, numbers, booleans or nulls.
pub fn properties(props: &JsonValue) -> Result<(), Error> {
    let members = props
        .as_object()
        .ok_or_else(|| Error::NotObject(props.clone()))?;
    match members.values().find(|value| !is_primitive(value)) {
        Some(value) => Err(Error::NotPrimitive(value.clone())),
        None => Ok(()),
    }
}

fn is_primitive(value: &JsonValue) -> bool {
    !matches!(value, JsonValue::Array(_) | JsonValue::Object(_))
}

// A missing member is reported like any other value that is neither null nor
// an object.
fn null_or_object<'a>(feat: &'a JsonValue, key: &str) -> Result<Option<&'a JsonValue>, Error> {
    match feat.get(key) {
        None => Err(Error::MustBeNullOrObject(JsonValue::Null)),
        Some(JsonValue::Null) => Ok(None),
        Some(value) if value.is_object() => Ok(Some(value)),
        Some(value) => Err(Error::MustBeNullOrObject(value.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_valid_geometry() {
        assert!(geometry(&json!({"type": "Point", "coordinates": [0, 0]})).is_ok());
        assert!(geometry(&json!({"type": "Point", "coordinates": [0, 0], "bbox": [0, 0, 0, 0]})).is_ok());
    }

    #[test]
    fn test_geometry_without_type() {
        let input = json!({"coordinates": [0, 0]});
        let error = geometry(&input).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedGeoJson);
        assert_eq!(error.part(), Some(&input));
    }

    #[test]
    fn test_unsupported_geometry_type() {
        let error = geometry(&json!({"type": "BadPoint", "coordinates": [0, 0]})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnsupportedGeometryType);
        assert_eq!(error.part(), Some(&json!("BadPoint")));
    }

    #[test]
    fn test_geometry_without_coordinates() {
        let input = json!({"type": "Point"});
        let error = geometry(&input).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedGeoJson);
        assert_eq!(error.part(), Some(&input));
    }

    #[test]
    fn test_geometry_with_invalid_crs() {
        let error = geometry(&json!({"type": "Point", "coordinates": [0, 0],
            "crs": {"type": "wrongName", "properties": {"wrongName": "EPSG:WRONGCRS"}}}))
        .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidCrsType);
        assert_eq!(error.part(), Some(&json!("wrongName")));
    }

    #[test]
    fn test_geometry_bbox_length() {
        let error = geometry(&json!({"type": "Point", "coordinates": [0, 0], "bbox": [0, 0, 0]})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BboxLengthMismatch);
        assert_eq!(error.part(), Some(&json!([0, 0, 0])));
    }

    #[test]
    fn test_geometry_collection() {
        let input = json!({"type": "GeometryCollection", "geometries": [{"type": "Point", "coordinates": [0, 0]}]});
        assert!(geometry(&input).is_ok());

        let not_array = json!({"type": "GeometryCollection", "geometries": {"type": "Point", "coordinates": [0, 0]}});
        let error = geometry(&not_array).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotArray);
        assert_eq!(error.part(), Some(&not_array["geometries"]));

        let bad_bbox = json!({"type": "GeometryCollection",
            "geometries": [{"type": "Point", "coordinates": [0, 0]}], "bbox": [0, 0, 0]});
        assert_eq!(geometry(&bad_bbox).unwrap_err().kind(), ErrorKind::BboxLengthMismatch);

        let missing = json!({"type": "GeometryCollection"});
        assert_eq!(geometry(&missing).unwrap_err().kind(), ErrorKind::MalformedGeoJson);
    }

    #[test]
    fn test_feature() {
        assert!(feature(&json!({"type": "Feature",
            "geometry": {"type": "Point", "coordinates": [0, 0]}, "properties": null})).is_ok());
        assert!(feature(&json!({"type": "Feature", "geometry": null, "properties": null})).is_ok());
    }

    #[test]
    fn test_feature_members_must_be_null_or_object() {
        let error = feature(&json!({"type": "Feature", "geometry": 2, "properties": null})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MustBeNullOrObject);
        assert_eq!(error.part(), Some(&json!(2)));

        let error = feature(&json!({"type": "Feature", "geometry": null, "properties": 2})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MustBeNullOrObject);
        assert_eq!(error.part(), Some(&json!(2)));

        let error = feature(&json!({"type": "Feature", "properties": null})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MustBeNullOrObject);
        assert_eq!(error.part(), Some(&JsonValue::Null));

        let error = feature(&json!({"type": "Feature", "geometry": null})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MustBeNullOrObject);
        assert_eq!(error.to_string(), "null must be null, or an object.");
    }

    #[test]
    fn test_feature_with_invalid_children() {
        let error = feature(&json!({"type": "Feature",
            "geometry": {"type": "BadPoint", "coordinates": [0, 0]}, "properties": null}))
        .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnsupportedGeometryType);
        assert_eq!(error.part(), Some(&json!("BadPoint")));

        let error = feature(&json!({"type": "Feature", "geometry": null,
            "properties": {"type": "Point", "coordinates": [0, 0, 0, 0]}}))
        .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotPrimitive);
        assert_eq!(error.part(), Some(&json!([0, 0, 0, 0])));
    }

    #[test]
    fn test_feature_crs_and_bbox() {
        let error = feature(&json!({"type": "Feature", "geometry": null, "properties": null,
            "crs": {"type": "wrongName", "properties": {"wrongName": "EPSG:WRONGCRS"}}}))
        .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidCrsType);

        let error = feature(&json!({"type": "Feature", "geometry": null, "properties": null, "bbox": [0, 0, 0]}))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BboxLengthMismatch);

        assert!(feature(&json!({"type": "Feature", "properties": null, "bbox": [0, 0, 0, 1, 1, 1],
            "geometry": {"type": "Point", "coordinates": [0, 0, 0]}})).is_ok());
    }

    #[test]
    fn test_feature_type() {
        let error = feature(&json!({"type": "Point", "coordinates": [0, 0]})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnsupportedFeatureType);
        assert_eq!(error.part(), Some(&json!("Point")));
    }

    #[test]
    fn test_feature_collection() {
        let input = json!({"type": "FeatureCollection",
            "features": [{"type": "Feature", "geometry": null, "properties": null}]});
        assert!(feature_collection(&input).is_ok());

        let not_array = json!({"type": "FeatureCollection",
            "features": {"type": "Feature", "geometry": null, "properties": null}});
        let error = feature_collection(&not_array).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotArray);
        assert_eq!(error.part(), Some(&not_array["features"]));

        let error = feature_collection(&json!({"type": "Feature", "features": []})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnsupportedFeatureType);
        assert_eq!(error.part(), Some(&json!("Feature")));
    }

    #[test]
    fn test_feature_collection_bbox_uses_first_coordinates() {
        let input = json!({"type": "FeatureCollection", "bbox": [0, 0, 0, 1, 1, 1], "features": [
            {"type": "Feature", "geometry": null, "properties": null},
            {"type": "Feature", "properties": null, "geometry": {"type": "Point", "coordinates": [0, 0, 0]}}
        ]});
        assert!(feature_collection(&input).is_ok());
    }

    #[test]
    fn test_properties() {
        assert!(properties(&json!({"a": "b", "c": 1, "d": true, "e": null})).is_ok());

        let error = properties(&json!([1, 2])).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotObject);

        let error = properties(&json!({"a": {"b": 1}})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotPrimitive);
        assert_eq!(error.part(), Some(&json!({"b": 1})));

        let error = properties(&json!({"bbox": [0, 0, 0, 0]})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotPrimitive);
        assert_eq!(error.part(), Some(&json!([0, 0, 0, 0])));
    }
}
