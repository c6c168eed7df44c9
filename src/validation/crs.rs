use serde_json::Value as JsonValue;
use url::Url;

use crate::utils::error::Error;
use crate::utils::structure::{declared_crs, search_crs};

/// At most one CRS may be declared in the subtree of `object`, and when there
/// is one it must be declared on `object` itself.
pub fn single_crs(object: &JsonValue) -> Result<(), Error> {
    let found = search_crs(object);
    match (found.count, declared_crs(object)) {
        (0, _) => Ok(()),
        (1, Some(crs)) => crs_object(crs),
        (1, None) => Err(Error::CrsNotAtTop(found.last.unwrap_or(JsonValue::Null))),
        _ => Err(Error::MultipleCrs),
    }
}

/// A named or linked coordinate reference system.
pub fn crs_object(crs: &JsonValue) -> Result<(), Error> {
    let invalid = || Error::InvalidCrsShape(crs.clone());
    let crs_type = match crs.get("type") {
        Some(JsonValue::Null) | None => return Err(invalid()),
        Some(crs_type) => crs_type,
    };
    match crs_type.as_str() {
        Some("name") => crs_member(crs, "name").map(|_| ()).ok_or_else(invalid),
        Some("link") => {
            let href = crs_member(crs, "href").ok_or_else(invalid)?;
            if is_dereferenceable(href) {
                Ok(())
            } else {
                Err(Error::NonDereferenceableUri(href.into()))
            }
        }
        _ => Err(Error::InvalidCrsType(crs_type.clone())),
    }
}

fn crs_member<'a>(crs: &'a JsonValue, name: &str) -> Option<&'a str> {
    crs.get("properties")
        .and_then(|properties| properties.get(name))
        .and_then(JsonValue::as_str)
}

fn is_dereferenceable(href: &str) -> bool {
    match Url::parse(href) {
        Ok(url) => !url.scheme().is_empty() && url.host().is_some(),
        Err(_) => false,
    }
}
