use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value as JsonValue;

use crate::build;
use crate::generation::options::{GenerationOptions, check_sample_size};
use crate::generation::random::{
    random_array, random_coordinates, random_properties, random_property_sample,
};
use crate::geometry::GeometryType;
use crate::utils::error::Error;
use crate::validation::objects;

/// Generates random geometries, features and feature collections that always
/// pass validation.
#[derive(Debug, Clone)]
pub struct RandomFactory {
    options: GenerationOptions,
    rng: StdRng,
}

impl Default for RandomFactory {
    fn default() -> Self {
        Self {
            options: GenerationOptions::default(),
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomFactory {
    pub fn new(options: GenerationOptions) -> Result<Self, Error> {
        options.validate()?;
        Ok(Self {
            options,
            rng: StdRng::from_entropy(),
        })
    }

    /// A factory whose output is reproducible for a given `seed`.
    pub fn with_seed(options: GenerationOptions, seed: u64) -> Result<Self, Error> {
        options.validate()?;
        Ok(Self {
            options,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// See [`GenerationOptions::from_json`].
    pub fn from_json(raw: &JsonValue) -> Result<Self, Error> {
        Self::new(GenerationOptions::from_json(raw)?)
    }

    /// Reads options like [`from_json`](Self::from_json), with every random
    /// draw, including a generated property sample, taken from `seed`.
    pub fn from_json_seeded(raw: &JsonValue, seed: u64) -> Result<Self, Error> {
        let mut rng = StdRng::seed_from_u64(seed);
        let options = GenerationOptions::from_json_with_rng(raw, &mut rng)?;
        Ok(Self { options, rng })
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Changes the vertex count of subsequent geometries. `None` keeps the
    /// current value.
    pub fn set_vertices(&mut self, vertices: Option<usize>) {
        if let Some(vertices) = vertices {
            self.options.vertices = vertices;
        }
    }

    /// Changes the property options of subsequent features.
    ///
    /// `None` keeps the current options. Without a sample, one of `num_prop`
    /// members is generated; an explicit sample must hold exactly `num_prop`
    /// primitive members.
    pub fn set_properties(
        &mut self,
        num_prop: Option<usize>,
        prop_sample: Option<JsonObject>,
    ) -> Result<(), Error> {
        let Some(num_prop) = num_prop else {
            return Ok(());
        };
        let prop_sample = match prop_sample {
            Some(sample) if num_prop > 0 => {
                objects::properties(&JsonValue::Object(sample.clone()))?;
                check_sample_size(num_prop, &sample)?;
                Some(sample)
            }
            _ => random_property_sample(&mut self.rng, num_prop),
        };
        self.options.num_prop = num_prop;
        self.options.prop_sample = prop_sample;
        Ok(())
    }

    pub fn generate_geometry(&mut self) -> Result<Geometry, Error> {
        let GenerationOptions {
            geometry_type,
            vertices,
            stride,
            ref bbox,
            ..
        } = self.options;
        let coords = match geometry_type {
            GeometryType::Point => serde_json::to_value(random_coordinates(&mut self.rng, stride, bbox))?,
            GeometryType::LineString => random_array(&mut self.rng, 1, vertices, bbox),
            GeometryType::Polygon => {
                let mut coords = random_array(&mut self.rng, 2, vertices, bbox);
                if let Some(ring) = coords.get_mut(0).and_then(JsonValue::as_array_mut) {
                    if let Some(first) = ring.first().cloned() {
                        ring.push(first);
                    }
                }
                coords
            }
            other => return Err(Error::UnsupportedGeometryType(other.as_str().into())),
        };
        build::geometry(geometry_type, coords)
    }

    pub fn generate_feature(&mut self) -> Result<Feature, Error> {
        let geometry = self.generate_geometry()?;
        let properties = match (&self.options.prop_sample, self.options.num_prop) {
            (Some(sample), num_prop) if num_prop > 0 => Some(random_properties(&mut self.rng, sample)),
            _ => None,
        };
        build::feature(Some(build::to_document(&geometry)?), properties)
    }

    /// A collection of `count` independently generated features.
    pub fn generate_features(&mut self, count: usize) -> Result<FeatureCollection, Error> {
        let features = (0..count)
            .map(|_| self.generate_feature().and_then(|feature| build::to_document(&feature)))
            .collect::<Result<Vec<_>, Error>>()?;
        debug!(
            "generated {} {} feature(s) with stride {}",
            count, self.options.geometry_type, self.options.stride
        );
        build::feature_collection(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;
    use crate::validation::{is_valid, validate_geojson};
    use serde_json::json;

    fn factory(raw: JsonValue) -> RandomFactory {
        RandomFactory::from_json(&raw).unwrap()
    }

    #[test]
    fn test_default_factory() {
        let factory = RandomFactory::default();
        assert_eq!(factory.options(), &GenerationOptions::default());
    }

    #[test]
    fn test_options_are_kept() {
        let factory = factory(json!({"type": "LineString", "stride": 2, "vertices": 3,
            "bbox": [0, 0, 0, 0], "numProp": 0, "propSample": null}));
        let options = factory.options();
        assert_eq!(options.geometry_type, GeometryType::LineString);
        assert_eq!(options.vertices, 3);
        assert_eq!(options.bbox, vec![0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_set_vertices() {
        let mut factory = RandomFactory::default();
        factory.set_vertices(Some(10));
        assert_eq!(factory.options().vertices, 10);
        factory.set_vertices(None);
        assert_eq!(factory.options().vertices, 10);
        factory.set_vertices(Some(0));
        assert_eq!(factory.options().vertices, 0);
    }

    #[test]
    fn test_set_properties() {
        let mut factory = RandomFactory::default();
        let sample = json!({"id": 0, "str": "abc"}).as_object().cloned().unwrap();
        factory.set_properties(Some(2), Some(sample.clone())).unwrap();
        assert_eq!(factory.options().num_prop, 2);
        assert_eq!(factory.options().prop_sample.as_ref(), Some(&sample));

        factory.set_properties(None, None).unwrap();
        assert_eq!(factory.options().num_prop, 2);
        assert_eq!(factory.options().prop_sample.as_ref(), Some(&sample));

        factory.set_properties(Some(0), None).unwrap();
        assert_eq!(factory.options().num_prop, 0);
        assert_eq!(factory.options().prop_sample, None);

        factory.set_properties(Some(6), None).unwrap();
        assert_eq!(factory.options().prop_sample.as_ref().map(|s| s.len()), Some(6));
    }

    #[test]
    fn test_set_properties_rejects_bad_samples() {
        let mut factory = RandomFactory::default();
        let bad = json!({"bbox": [0, 0, 0, 0]}).as_object().cloned().unwrap();
        let error = factory.set_properties(Some(1), Some(bad)).unwrap_err();
        assert_eq!(error.to_string(), "[0,0,0,0] is not a primitive.");

        let short = json!({"id": 0}).as_object().cloned().unwrap();
        let error = factory.set_properties(Some(3), Some(short)).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::PropSampleCountMismatch);
        assert_eq!(factory.options().num_prop, 0);
    }

    #[test]
    fn test_generate_geometries() {
        for geometry_type in ["Point", "LineString", "Polygon"] {
            let mut factory = factory(json!({"type": geometry_type}));
            let geometry = factory.generate_geometry().unwrap();
            let document = build::to_document(&geometry).unwrap();
            assert_eq!(document["type"], json!(geometry_type));
            assert!(validate_geojson(&document, true).unwrap());
        }
    }

    #[test]
    fn test_generated_polygon_ring_is_closed() {
        let mut factory = factory(json!({"type": "Polygon", "vertices": 4, "stride": 3}));
        let geometry = factory.generate_geometry().unwrap();
        match geometry.value {
            geojson::Value::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0].len(), 5);
                assert_eq!(rings[0].first(), rings[0].last());
                assert_eq!(rings[0][0].len(), 3);
            }
            other => panic!("expected a polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_generate_feature() {
        let mut factory = factory(json!({"numProp": 4}));
        let feature = factory.generate_feature().unwrap();
        let properties = feature.properties.clone().unwrap();
        let sample = factory.options().prop_sample.clone().unwrap();
        assert_eq!(properties.len(), 4);
        for (key, value) in &sample {
            assert_eq!(properties[key].is_null(), value.is_null());
        }
        assert!(is_valid(&build::to_document(&feature).unwrap()));
    }

    #[test]
    fn test_generate_features() {
        let mut factory = RandomFactory::default();
        let collection = factory.generate_features(10).unwrap();
        assert_eq!(collection.features.len(), 10);
        assert!(validate_geojson(&build::to_document(&collection).unwrap(), true).unwrap());
    }

    #[test]
    fn test_seeded_factories_agree_on_generated_properties() {
        let raw = json!({"type": "Polygon", "numProp": 3});
        let mut first = RandomFactory::from_json_seeded(&raw, 42).unwrap();
        let mut second = RandomFactory::from_json_seeded(&raw, 42).unwrap();
        assert_eq!(first.options(), second.options());
        assert_eq!(first.generate_feature().unwrap(), second.generate_feature().unwrap());
        assert_eq!(first.generate_features(5).unwrap(), second.generate_features(5).unwrap());
    }

    #[test]
    fn test_seeded_factories_agree() {
        let options = GenerationOptions::from_json(&json!({"type": "LineString"})).unwrap();
        let mut first = RandomFactory::with_seed(options.clone(), 12345).unwrap();
        let mut second = RandomFactory::with_seed(options, 12345).unwrap();
        assert_eq!(first.generate_geometry().unwrap(), second.generate_geometry().unwrap());
    }
}
