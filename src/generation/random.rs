use geojson::{JsonObject, Position};
use rand::Rng;
use serde_json::{Value as JsonValue, json};

/// Longitude and latitude limits: min lon, min lat, max lon, max lat.
pub const DEFAULT_BBOX: [f64; 4] = [-180.0, -90.0, 180.0, 90.0];

/// Deepest ocean trench and highest summit, in metres.
pub const ELEVATION_RANGE: [f64; 2] = [-10994.0, 8848.0];

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// A position with `stride` dimensions, dimension `i` drawn from
/// `[bbox[i], bbox[stride + i])` and rounded to six decimals.
pub fn random_coordinates<R: Rng + ?Sized>(rng: &mut R, stride: usize, bbox: &[f64]) -> Position {
    (0..stride)
        .map(|i| {
            let (min, max) = (bbox[i], bbox[stride + i]);
            round6(rng.r#gen::<f64>() * (max - min) + min)
        })
        .collect()
}

/// Default bounding box for `stride` dimensions. Dimensions beyond the second
/// span the elevation range.
pub fn random_bbox(stride: usize) -> Vec<f64> {
    let lower = (0..stride).map(|i| match i {
        0 | 1 => DEFAULT_BBOX[i],
        _ => ELEVATION_RANGE[0],
    });
    let upper = (0..stride).map(|i| match i {
        0 | 1 => DEFAULT_BBOX[i + 2],
        _ => ELEVATION_RANGE[1],
    });
    lower.chain(upper).collect()
}

/// `vertices` random positions inside `bbox`.
pub fn random_positions<R: Rng + ?Sized>(rng: &mut R, vertices: usize, bbox: &[f64]) -> Vec<Position> {
    let stride = bbox.len() / 2;
    (0..vertices)
        .map(|_| random_coordinates(rng, stride, bbox))
        .collect()
}

/// `vertices` random positions wrapped in `depth - 1` extra single-member
/// arrays: depth 1 is shaped like a LineString, depth 2 like a Polygon.
///
/// Rings are left open; closing them is up to the caller.
pub fn random_array<R: Rng + ?Sized>(rng: &mut R, depth: usize, vertices: usize, bbox: &[f64]) -> JsonValue {
    let mut coords = json!(random_positions(rng, vertices, bbox));
    for _ in 1..depth {
        coords = JsonValue::Array(vec![coords]);
    }
    coords
}

/// A property sample with `num_prop` members whose values cycle through a
/// string, a number, a boolean and a null. `None` when `num_prop` is zero.
///
/// Keys are three characters long, or longer once `num_prop` would fill more
/// than half of the three-character key space.
pub fn random_property_sample<R: Rng + ?Sized>(rng: &mut R, num_prop: usize) -> Option<JsonObject> {
    let archetypes = [json!("abc"), json!(123), json!(true), JsonValue::Null];
    let key_len = key_length(num_prop);
    let mut sample = JsonObject::new();
    while sample.len() < num_prop {
        let key = random_string(rng, key_len);
        if !sample.contains_key(&key) {
            let value = archetypes[sample.len() % archetypes.len()].clone();
            sample.insert(key, value);
        }
    }
    if sample.is_empty() { None } else { Some(sample) }
}

// Shortest base-36 key length, at least 3, with room for twice `num_prop` keys.
fn key_length(num_prop: usize) -> usize {
    let wanted = num_prop.saturating_mul(2) as u128;
    let mut len = 3;
    while (BASE36.len() as u128).pow(len as u32) < wanted {
        len += 1;
    }
    len
}

/// One random value per member of `sample`, shaped like the sample's value.
pub fn random_properties<R: Rng + ?Sized>(rng: &mut R, sample: &JsonObject) -> JsonObject {
    sample
        .iter()
        .map(|(key, value)| (key.clone(), random_property(rng, value)))
        .collect()
}

/// A random value of the same type as `sample`: strings keep their length,
/// numbers their order of magnitude.
pub fn random_property<R: Rng + ?Sized>(rng: &mut R, sample: &JsonValue) -> JsonValue {
    match sample {
        JsonValue::Bool(_) => JsonValue::Bool(rng.r#gen()),
        JsonValue::String(text) => JsonValue::String(random_string(rng, text.chars().count())),
        JsonValue::Number(number) => number
            .as_f64()
            .map(|magnitude| same_magnitude(rng, magnitude))
            .map(json_number)
            .unwrap_or(JsonValue::Null),
        _ => JsonValue::Null,
    }
}

fn same_magnitude<R: Rng + ?Sized>(rng: &mut R, sample: f64) -> f64 {
    if sample == 0.0 || !sample.is_finite() {
        return 0.0;
    }
    let magnitude = sample.abs();
    let mut exp = magnitude.log10().floor() as i32;
    // log10 may land one off for exact powers of ten
    if 10f64.powi(exp + 1) <= magnitude {
        exp += 1;
    } else if 10f64.powi(exp) > magnitude {
        exp -= 1;
    }
    let (low, high) = (10f64.powi(exp), 10f64.powi(exp + 1));
    let mut value = rng.r#gen::<f64>() * (high - low) + low;
    if exp >= 0 {
        value = value.floor();
    }
    if value >= high {
        value = low;
    }
    value.copysign(sample)
}

fn json_number(value: f64) -> JsonValue {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

fn random_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}
