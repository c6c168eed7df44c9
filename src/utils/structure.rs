use log::trace;
use serde_json::Value as JsonValue;

/// Result of a CRS walk: how many declarations were found and the last one seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrsSearch {
    pub count: usize,
    pub last: Option<JsonValue>,
}

impl CrsSearch {
    fn absorb(&mut self, other: CrsSearch) {
        self.count += other.count;
        if other.last.is_some() {
            self.last = other.last;
        }
    }
}

/// Number of dimensions of the first position in a coordinate array.
///
/// Assumes the array was validated beforehand. Anything that is not an array
/// has a stride of zero.
pub fn stride(coordinates: &JsonValue) -> usize {
    match coordinates.as_array() {
        Some(members) => match members.first() {
            Some(first) if first.is_array() => stride(first),
            _ => members.len(),
        },
        None => 0,
    }
}

/// Stride of the first coordinates reachable from `document`, zero if there are none.
pub fn document_stride(document: &JsonValue) -> usize {
    first_coordinates(document).map(stride).unwrap_or(0)
}

/// First coordinate array encountered in a depth-first walk of a geometry,
/// feature or feature collection.
pub fn first_coordinates(document: &JsonValue) -> Option<&JsonValue> {
    match document_type(document) {
        Some("GeometryCollection") => document
            .get("geometries")
            .and_then(JsonValue::as_array)
            .and_then(|geometries| geometries.first())
            .and_then(first_coordinates),
        Some("Feature") => match document.get("geometry") {
            Some(geometry) if geometry.is_object() => first_coordinates(geometry),
            _ => None,
        },
        Some("FeatureCollection") => document
            .get("features")
            .and_then(JsonValue::as_array)?
            .iter()
            .filter_map(first_coordinates)
            .find(|coordinates| !is_empty_array(coordinates)),
        _ => document.get("coordinates"),
    }
}

/// Counts every CRS declaration in the subtree of `document`.
pub fn search_crs(document: &JsonValue) -> CrsSearch {
    let mut found = CrsSearch::default();
    if let Some(crs) = declared_crs(document) {
        found.count += 1;
        found.last = Some(crs.clone());
    }
    for child in children(document) {
        found.absorb(search_crs(child));
    }
    found
}

/// Same walk as [`search_crs`], removing each declaration as it is found.
pub fn search_crs_and_remove(document: &mut JsonValue) -> CrsSearch {
    let mut found = CrsSearch::default();
    if declared_crs(document).is_some() {
        if let Some(crs) = document.as_object_mut().and_then(|object| object.remove("crs")) {
            found.count += 1;
            found.last = Some(crs);
        }
    }
    let child_key = match document_type(document) {
        Some("GeometryCollection") => "geometries",
        Some("Feature") => "geometry",
        Some("FeatureCollection") => "features",
        _ => return found,
    };
    match document.get_mut(child_key) {
        Some(JsonValue::Array(members)) => {
            for member in members.iter_mut() {
                found.absorb(search_crs_and_remove(member));
            }
        }
        Some(child) if child.is_object() => found.absorb(search_crs_and_remove(child)),
        _ => {}
    }
    found
}

/// Moves the CRS declared anywhere in `document` to its top level.
///
/// Returns `false` when the subtree has no CRS at all.
pub fn migrate_crs(document: &mut JsonValue) -> bool {
    let found = search_crs_and_remove(document);
    match (found.last, document.as_object_mut()) {
        (Some(crs), Some(object)) if found.count > 0 => {
            trace!("hoisting CRS {} out of {} declaration(s)", crs, found.count);
            object.insert("crs".to_string(), crs);
            true
        }
        _ => false,
    }
}

pub(crate) fn document_type(document: &JsonValue) -> Option<&str> {
    document.get("type").and_then(JsonValue::as_str)
}

pub(crate) fn declared_crs(document: &JsonValue) -> Option<&JsonValue> {
    document.get("crs").filter(|crs| !crs.is_null())
}

fn children(document: &JsonValue) -> Vec<&JsonValue> {
    match document_type(document) {
        Some("GeometryCollection") => array_members(document, "geometries"),
        Some("Feature") => document
            .get("geometry")
            .filter(|geometry| geometry.is_object())
            .into_iter()
            .collect(),
        Some("FeatureCollection") => array_members(document, "features"),
        _ => Vec::new(),
    }
}

fn array_members<'a>(document: &'a JsonValue, key: &str) -> Vec<&'a JsonValue> {
    document
        .get(key)
        .and_then(JsonValue::as_array)
        .map(|members| members.iter().collect())
        .unwrap_or_default()
}

fn is_empty_array(value: &JsonValue) -> bool {
    value.as_array().is_some_and(|members| members.is_empty())
}
