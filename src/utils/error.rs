use serde_json::Value as JsonValue;
use thiserror::Error;

/// Closed set of failure kinds reported by validation and generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotArray,
    NotNumber,
    NotInteger,
    InvalidStride,
    UnsupportedGeometryType,
    MalformedGeoJson,
    UnsupportedFeatureType,
    BboxLengthMismatch,
    NotObject,
    NotPrimitive,
    MustBeNullOrObject,
    TooFewCoordinates,
    MultipleCrs,
    CrsNotAtTop,
    InvalidCrsShape,
    InvalidCrsType,
    NonDereferenceableUri,
    UnclosedLinearRing,
    MissingRequiredField,
    PropSampleCountMismatch,
    Conversion,
}

// Every variant carries the offending part of the document, rendered as JSON
// text in the message.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} is not an array.")]
    NotArray(JsonValue),
    #[error("{0} is not a number.")]
    NotNumber(JsonValue),
    #[error("{0} must be an integer.")]
    NotInteger(JsonValue),
    #[error("{0} must be an integer, and greater than two.")]
    InvalidStride(JsonValue),
    #[error(
        "{0} is an invalid geometry type. For the random factory the supported types are Point, LineString, and Polygon."
    )]
    UnsupportedGeometryType(JsonValue),
    #[error("Invalid GeoJSON: {0}.")]
    MalformedGeoJson(JsonValue),
    #[error("{0} is an invalid feature type.")]
    UnsupportedFeatureType(JsonValue),
    #[error("Array {0} has wrong number of members.")]
    BboxLengthMismatch(JsonValue),
    #[error("{0} is not an object.")]
    NotObject(JsonValue),
    #[error("{0} is not a primitive.")]
    NotPrimitive(JsonValue),
    #[error("{0} must be null, or an object.")]
    MustBeNullOrObject(JsonValue),
    #[error(
        "Invalid coordinate array: {0}. There must be at least two coordinates in a position, and four in a bounding box."
    )]
    TooFewCoordinates(JsonValue),
    #[error("There are more than one CRS definitions in the GeoJSON.")]
    MultipleCrs,
    #[error("CRS {0} must be on the top level.")]
    CrsNotAtTop(JsonValue),
    #[error("Invalid CRS: {0}.")]
    InvalidCrsShape(JsonValue),
    #[error("{0} is an invalid CRS type. Valid types are name, and link.")]
    InvalidCrsType(JsonValue),
    #[error("{0} must be a dereferenceable URI.")]
    NonDereferenceableUri(JsonValue),
    #[error("{0} must be a LinearRing (it must be closed).")]
    UnclosedLinearRing(JsonValue),
    #[error("Missing {0}.")]
    MissingRequiredField(JsonValue),
    #[error("Sample of properties must contain members equal to number of properties.")]
    PropSampleCountMismatch,
    #[error("Error converting GeoJSON: {0}")]
    Conversion(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotArray(_) => ErrorKind::NotArray,
            Error::NotNumber(_) => ErrorKind::NotNumber,
            Error::NotInteger(_) => ErrorKind::NotInteger,
            Error::InvalidStride(_) => ErrorKind::InvalidStride,
            Error::UnsupportedGeometryType(_) => ErrorKind::UnsupportedGeometryType,
            Error::MalformedGeoJson(_) => ErrorKind::MalformedGeoJson,
            Error::UnsupportedFeatureType(_) => ErrorKind::UnsupportedFeatureType,
            Error::BboxLengthMismatch(_) => ErrorKind::BboxLengthMismatch,
            Error::NotObject(_) => ErrorKind::NotObject,
            Error::NotPrimitive(_) => ErrorKind::NotPrimitive,
            Error::MustBeNullOrObject(_) => ErrorKind::MustBeNullOrObject,
            Error::TooFewCoordinates(_) => ErrorKind::TooFewCoordinates,
            Error::MultipleCrs => ErrorKind::MultipleCrs,
            Error::CrsNotAtTop(_) => ErrorKind::CrsNotAtTop,
            Error::InvalidCrsShape(_) => ErrorKind::InvalidCrsShape,
            Error::InvalidCrsType(_) => ErrorKind::InvalidCrsType,
            Error::NonDereferenceableUri(_) => ErrorKind::NonDereferenceableUri,
            Error::UnclosedLinearRing(_) => ErrorKind::UnclosedLinearRing,
            Error::MissingRequiredField(_) => ErrorKind::MissingRequiredField,
            Error::PropSampleCountMismatch => ErrorKind::PropSampleCountMismatch,
            Error::Conversion(_) => ErrorKind::Conversion,
        }
    }

    /// The fragment of the input that caused the failure, if the kind has one.
    pub fn part(&self) -> Option<&JsonValue> {
        match self {
            Error::NotArray(part)
            | Error::NotNumber(part)
            | Error::NotInteger(part)
            | Error::InvalidStride(part)
            | Error::UnsupportedGeometryType(part)
            | Error::MalformedGeoJson(part)
            | Error::UnsupportedFeatureType(part)
            | Error::BboxLengthMismatch(part)
            | Error::NotObject(part)
            | Error::NotPrimitive(part)
            | Error::MustBeNullOrObject(part)
            | Error::TooFewCoordinates(part)
            | Error::CrsNotAtTop(part)
            | Error::InvalidCrsShape(part)
            | Error::InvalidCrsType(part)
            | Error::NonDereferenceableUri(part)
            | Error::UnclosedLinearRing(part)
            | Error::MissingRequiredField(part) => Some(part),
            Error::MultipleCrs | Error::PropSampleCountMismatch | Error::Conversion(_) => None,
        }
    }
}
