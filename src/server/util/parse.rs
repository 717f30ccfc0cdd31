//! Lenient parsing of form values.
//!
//! Admin forms post structured fields JSON-encoded inside multipart text parts. A
//! malformed part usually degrades to a sensible default instead of failing the
//! request; reviews are the exception, since their ratings are validated.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::robot::ManufacturerDto;

/// Whether a query flag such as `?admin=true` is switched on.
pub fn is_truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true") | Some("1") | Some("yes")
    )
}

/// Default number of entries per listing page.
pub const DEFAULT_PAGE_LIMIT: u64 = 10;
/// Largest page a client may request.
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Resolves 1-based pagination query values.
///
/// Missing or zero pages become page 1; the limit defaults to [`DEFAULT_PAGE_LIMIT`]
/// and is clamped to `1..=MAX_PAGE_LIMIT`.
pub fn page_bounds(page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    let page = page.filter(|p| *p > 0).unwrap_or(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
    (page, limit)
}

/// Parses a category list.
///
/// Accepts a JSON array, or a string holding a JSON array. Any other string is
/// split on commas, so a plain name becomes a single-element list. Entries are
/// trimmed, blanks dropped and duplicates removed keeping the first occurrence.
pub fn parse_categories(value: &Value) -> Vec<String> {
    let raw: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(value_as_string).collect(),
        Value::String(s) => match serde_json::from_str::<Vec<Value>>(s) {
            Ok(items) => items.iter().filter_map(value_as_string).collect(),
            Err(_) => s.split(',').map(str::to_string).collect(),
        },
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    };

    let mut categories: Vec<String> = Vec::with_capacity(raw.len());
    for category in raw {
        let category = category.trim();
        if !category.is_empty() && !categories.iter().any(|c| c == category) {
            categories.push(category.to_string());
        }
    }
    categories
}

/// Parses a JSON document field, falling back to `T::default()` on malformed input.
pub fn parse_json_or_default<T: DeserializeOwned + Default>(field: &str, value: &Value) -> T {
    let parsed = match value {
        Value::String(s) if s.trim().is_empty() => return T::default(),
        Value::String(s) => serde_json::from_str(s),
        other => serde_json::from_value(other.clone()),
    };

    parsed.unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed '{}' field: {}", field, e);
        T::default()
    })
}

/// Parses a JSON document field that must be well formed.
///
/// Blank values yield `T::default()`; anything else that does not deserialize is
/// returned as an error for the caller to report.
pub fn parse_json_strict<T: DeserializeOwned + Default>(
    value: &Value,
) -> Result<T, serde_json::Error> {
    match value {
        Value::String(s) if s.trim().is_empty() => Ok(T::default()),
        Value::String(s) => serde_json::from_str(s),
        other => serde_json::from_value(other.clone()),
    }
}

/// Parses a manufacturer given either as an object, a JSON-encoded object or a bare name.
///
/// # Returns
/// - `Some(ManufacturerDto)` - Manufacturer with a non-empty name
/// - `None` - No usable manufacturer name
pub fn parse_manufacturer(value: &Value) -> Option<ManufacturerDto> {
    let manufacturer = match value {
        Value::Object(_) => serde_json::from_value(value.clone()).ok(),
        Value::String(s) => match serde_json::from_str::<ManufacturerDto>(s) {
            Ok(m) => Some(m),
            Err(_) => Some(ManufacturerDto {
                name: s.clone(),
                ..Default::default()
            }),
        },
        _ => None,
    }?;

    let name = manufacturer.name.trim().to_string();
    if name.is_empty() {
        return None;
    }

    Some(ManufacturerDto {
        name,
        country: manufacturer.country.filter(|c| !c.trim().is_empty()),
        website: manufacturer.website.filter(|w| !w.trim().is_empty()),
    })
}

/// Reads a text value, trimming surrounding whitespace.
pub fn parse_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => value_as_string(other).map(|s| s.trim().to_string()),
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
