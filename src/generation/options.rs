use geojson::JsonObject;
use rand::Rng;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::generation::random::{random_bbox, random_property_sample};
use crate::geometry::GeometryType;
use crate::utils::error::Error;
use crate::validation::{coordinates, objects};

pub const DEFAULT_VERTICES: usize = 5;
pub const DEFAULT_STRIDE: usize = 2;

/// Parameters controlling the shape of randomly generated GeoJSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    #[serde(rename = "type")]
    pub geometry_type: GeometryType,
    pub vertices: usize,
    pub stride: usize,
    pub bbox: Vec<f64>,
    pub num_prop: usize,
    pub prop_sample: Option<JsonObject>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            geometry_type: GeometryType::Point,
            vertices: DEFAULT_VERTICES,
            stride: DEFAULT_STRIDE,
            bbox: random_bbox(DEFAULT_STRIDE),
            num_prop: 0,
            prop_sample: None,
        }
    }
}

impl GenerationOptions {
    /// Reads options from a JSON object such as
    /// `{"type": "Polygon", "vertices": 8, "stride": 3, "numProp": 2}`.
    ///
    /// Members that are missing or null take their defaults. Members that are
    /// present are checked before any default is filled in, and the completed
    /// record is checked again afterwards.
    pub fn from_json(raw: &JsonValue) -> Result<Self, Error> {
        Self::from_json_with_rng(raw, &mut rand::thread_rng())
    }

    /// Same as [`from_json`](Self::from_json), drawing a missing property
    /// sample from `rng`.
    pub fn from_json_with_rng<R: Rng + ?Sized>(raw: &JsonValue, rng: &mut R) -> Result<Self, Error> {
        if !raw.is_object() && !raw.is_null() {
            return Err(Error::NotObject(raw.clone()));
        }
        let member = |key| present(raw, key);

        let vertices = member("vertices").map(parse_count).transpose()?;
        let stride = member("stride")
            .map(|value| match whole_number(value) {
                Some(stride) if stride >= 2 => Ok(stride as usize),
                _ => Err(Error::InvalidStride(value.clone())),
            })
            .transpose()?
            .unwrap_or(DEFAULT_STRIDE);
        let geometry_type = member("type")
            .map(|value| {
                value
                    .as_str()
                    .and_then(GeometryType::from_name)
                    .filter(GeometryType::is_generatable)
                    .ok_or_else(|| Error::UnsupportedGeometryType(value.clone()))
            })
            .transpose()?
            .unwrap_or(GeometryType::Point);
        let num_prop = member("numProp").map(parse_count).transpose()?.unwrap_or(0);
        let prop_sample = match member("propSample") {
            Some(sample) if num_prop > 0 => {
                objects::properties(sample)?;
                sample.as_object().cloned()
            }
            Some(_) => return Err(Error::MissingRequiredField("number of properties".into())),
            None => None,
        };
        if let Some(sample) = &prop_sample {
            check_sample_size(num_prop, sample)?;
        }
        if let Some(bbox) = member("bbox") {
            coordinates::bbox(bbox, stride)?;
        }
        let bbox = match member("bbox").and_then(JsonValue::as_array) {
            Some(bbox) => bbox.iter().filter_map(JsonValue::as_f64).collect(),
            None => random_bbox(stride),
        };
        let prop_sample = match prop_sample {
            Some(sample) => Some(sample),
            None => random_property_sample(rng, num_prop),
        };

        let options = Self {
            geometry_type,
            vertices: vertices.unwrap_or(DEFAULT_VERTICES),
            stride,
            bbox,
            num_prop,
            prop_sample,
        };
        options.validate()?;
        Ok(options)
    }

    /// Checks the invariants of a complete record.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.geometry_type.is_generatable() {
            return Err(Error::UnsupportedGeometryType(self.geometry_type.as_str().into()));
        }
        if self.stride < 2 {
            return Err(Error::InvalidStride(self.stride.into()));
        }
        coordinates::bbox(&serde_json::json!(self.bbox), self.stride)?;
        match &self.prop_sample {
            Some(sample) => {
                objects::properties(&JsonValue::Object(sample.clone()))?;
                check_sample_size(self.num_prop, sample)
            }
            None if self.num_prop > 0 => {
                Err(Error::MissingRequiredField("sample of properties".into()))
            }
            None => Ok(()),
        }
    }

    pub fn to_json(&self) -> Result<JsonValue, Error> {
        Ok(serde_json::to_value(self)?)
    }
}

fn present<'a>(raw: &'a JsonValue, key: &str) -> Option<&'a JsonValue> {
    raw.get(key).filter(|value| !value.is_null())
}

/// Non-negative integers, including floats with no fractional part.
fn whole_number(value: &JsonValue) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|number| number.fract() == 0.0 && *number >= 0.0 && *number <= u64::MAX as f64)
            .map(|number| number as u64)
    })
}

/// A non-negative integer count.
pub(crate) fn parse_count(value: &JsonValue) -> Result<usize, Error> {
    whole_number(value)
        .map(|count| count as usize)
        .ok_or_else(|| Error::NotInteger(value.clone()))
}

pub(crate) fn check_sample_size(num_prop: usize, sample: &JsonObject) -> Result<(), Error> {
    if sample.len() != num_prop {
        return Err(Error::PropSampleCountMismatch);
    }
    Ok(())
}
