//! Schema validation helpers for Serendigo JSON5 configuration.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Expected JSON shape of a leaf field.
#[derive(Debug, Clone, Copy)]
enum Kind {
    String,
    /// String or null.
    OptString,
    Integer,
    Number,
    StringArray,
    /// String array or null.
    OptStringArray,
}

const ROOT_KEYS: &[&str] = &[
    "$schema",
    "server",
    "providers",
    "search",
    "store",
    "media",
    "guide",
];

const SERVER_FIELDS: &[(&str, Kind)] = &[("bind", Kind::String), ("cors_origins", Kind::StringArray)];

const PROVIDERS_FIELDS: &[(&str, Kind)] = &[("timeout_secs", Kind::Integer), ("language", Kind::String)];

const GOOGLE_FIELDS: &[(&str, Kind)] = &[("api_key", Kind::OptString), ("base_url", Kind::String)];

const HOTPEPPER_FIELDS: &[(&str, Kind)] = &[("api_key", Kind::OptString), ("base_url", Kind::String)];

const EVENTS_FIELDS: &[(&str, Kind)] = &[
    ("geocoder_url", Kind::String),
    ("search_url", Kind::String),
    ("api_key", Kind::OptString),
    ("user_agent", Kind::String),
    ("count", Kind::Integer),
];

const SEARCH_FIELDS: &[(&str, Kind)] = &[
    ("chain_brands", Kind::OptStringArray),
    ("history_scan_limit", Kind::Integer),
];

const STORE_FIELDS: &[(&str, Kind)] = &[("database_url", Kind::String)];

const MEDIA_FIELDS: &[(&str, Kind)] = &[("root", Kind::String), ("public_prefix", Kind::String)];

const GUIDE_FIELDS: &[(&str, Kind)] = &[
    ("api_key", Kind::OptString),
    ("base_url", Kind::String),
    ("text_model", Kind::String),
    ("speech_model", Kind::String),
    ("voice", Kind::String),
    ("temperature", Kind::Number),
    ("timeout_secs", Kind::Integer),
];

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(map, ROOT_KEYS, layer, "")?;

    if let Some(value) = map.get("$schema") {
        check_kind(value, Kind::String, layer, "$schema")?;
    }
    if let Some(value) = map.get("server") {
        validate_section(value, SERVER_FIELDS, &[], layer, "server")?;
    }
    if let Some(value) = map.get("providers") {
        validate_providers(value, layer, "providers")?;
    }
    if let Some(value) = map.get("search") {
        validate_section(value, SEARCH_FIELDS, &[], layer, "search")?;
    }
    if let Some(value) = map.get("store") {
        validate_section(value, STORE_FIELDS, &[], layer, "store")?;
    }
    if let Some(value) = map.get("media") {
        validate_section(value, MEDIA_FIELDS, &[], layer, "media")?;
    }
    if let Some(value) = map.get("guide") {
        validate_section(value, GUIDE_FIELDS, &[], layer, "guide")?;
    }
    Ok(())
}

/// Validate the "providers" block and its per-provider children.
fn validate_providers(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let children = ["google", "hotpepper", "events"];
    let map = validate_section(value, PROVIDERS_FIELDS, &children, layer, path)?;
    for (child, fields) in [
        ("google", GOOGLE_FIELDS),
        ("hotpepper", HOTPEPPER_FIELDS),
        ("events", EVENTS_FIELDS),
    ] {
        if let Some(value) = map.get(child) {
            validate_section(value, fields, &[], layer, &join_path(path, child))?;
        }
    }
    Ok(())
}

/// Validate an object whose keys are the given leaf fields plus nested children.
fn validate_section<'a>(
    value: &'a Value,
    fields: &[(&str, Kind)],
    children: &[&str],
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    let map = expect_object(value, layer, path)?;
    let allowed: Vec<&str> = fields
        .iter()
        .map(|(key, _)| *key)
        .chain(children.iter().copied())
        .collect();
    ensure_allowed_keys(map, &allowed, layer, path)?;
    for (key, kind) in fields {
        if let Some(value) = map.get(*key) {
            check_kind(value, *kind, layer, &join_path(path, key))?;
        }
    }
    Ok(map)
}

fn check_kind(value: &Value, kind: Kind, layer: &str, path: &str) -> Result<(), ConfigError> {
    let ok = match kind {
        Kind::String => value.is_string(),
        Kind::OptString => value.is_string() || value.is_null(),
        Kind::Integer => value.is_u64(),
        Kind::Number => value.is_number(),
        Kind::StringArray => is_string_array(value),
        Kind::OptStringArray => value.is_null() || is_string_array(value),
    };
    if ok {
        return Ok(());
    }
    let expected = match kind {
        Kind::String | Kind::OptString => "expected string",
        Kind::Integer => "expected non-negative integer",
        Kind::Number => "expected number",
        Kind::StringArray | Kind::OptStringArray => "expected array of strings",
    };
    Err(invalid_field(layer, path, expected))
}

fn is_string_array(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|entries| entries.iter().all(Value::is_string))
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
