//! Query-string decoding for the detour and place-lookup endpoints.
//!
//! Search parameters arrive as raw pairs so that `categories` and
//! `exclude_ids` can repeat.

use serendigo_rs_protocol::{
    DEFAULT_PREDICTION_LIMIT, DetourType, MAX_PREDICTION_LIMIT, SearchQuery, TravelMode,
    ValidationError,
};
use serendigo_rs_providers::directory::is_photo_reference;
use serendigo_rs_store::MAX_HISTORY_LIMIT;
use std::str::FromStr;

fn invalid(field: &'static str, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field,
        message: message.into(),
    }
}

fn parse_number<T: FromStr>(field: &'static str, raw: &str) -> Result<T, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(field, format!("{raw:?} is not a valid number")))
}

fn parse_bool(field: &'static str, raw: &str) -> Result<bool, ValidationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(field, format!("{raw:?} is not a boolean"))),
    }
}

#[derive(Default)]
struct SearchParams {
    lat: Option<f64>,
    lng: Option<f64>,
    minutes: Option<u32>,
    mode: Option<TravelMode>,
    detour_type: Option<DetourType>,
    categories: Vec<String>,
    radius_m: Option<u32>,
    local_only: bool,
    history_only: bool,
    exclude_ids: Vec<String>,
    seed: Option<u64>,
}

/// Build and validate a [`SearchQuery`] from query-string pairs.
///
/// Unknown keys are ignored; a repeated scalar key keeps its last value.
pub fn search_query(pairs: Vec<(String, String)>) -> Result<SearchQuery, ValidationError> {
    let mut params = SearchParams::default();
    for (key, value) in pairs {
        match key.as_str() {
            "lat" => params.lat = Some(parse_number("lat", &value)?),
            "lng" => params.lng = Some(parse_number("lng", &value)?),
            "minutes" => params.minutes = Some(parse_number("minutes", &value)?),
            "mode" => params.mode = Some(value.parse()?),
            "detour_type" => params.detour_type = Some(value.parse()?),
            "categories" => {
                let category = value.trim();
                if !category.is_empty() {
                    params.categories.push(category.to_string());
                }
            }
            "radius_m" => params.radius_m = Some(parse_number("radius_m", &value)?),
            "local_only" => params.local_only = parse_bool("local_only", &value)?,
            "history_only" => params.history_only = parse_bool("history_only", &value)?,
            "exclude_ids" => params.exclude_ids.push(value),
            "seed" => params.seed = Some(parse_number("seed", &value)?),
            _ => {}
        }
    }

    let mut query = SearchQuery::new(
        params.lat.ok_or(ValidationError::MissingField("lat"))?,
        params.lng.ok_or(ValidationError::MissingField("lng"))?,
        params.minutes.ok_or(ValidationError::MissingField("minutes"))?,
        params.mode.ok_or(ValidationError::MissingField("mode"))?,
        params
            .detour_type
            .ok_or(ValidationError::MissingField("detour_type"))?,
    )
    .with_categories(params.categories)
    .local_only(params.local_only)
    .history_only(params.history_only);
    query.radius_m = params.radius_m;
    query.exclude_ids = params.exclude_ids;
    query.seed = params.seed;
    query.validate()?;
    Ok(query)
}

/// Required `detour_type` of a choose request.
pub fn detour_type(raw: Option<&str>) -> Result<DetourType, ValidationError> {
    raw.ok_or(ValidationError::MissingField("detour_type"))?
        .parse()
}

/// History page size; absent means the recorder default.
pub fn history_limit(raw: Option<i64>) -> Result<Option<usize>, ValidationError> {
    match raw {
        None => Ok(None),
        Some(limit) if (1..=MAX_HISTORY_LIMIT as i64).contains(&limit) => Ok(Some(limit as usize)),
        Some(limit) => Err(invalid(
            "limit",
            format!("{limit} is outside 1..={MAX_HISTORY_LIMIT}"),
        )),
    }
}

/// Largest photo width the proxy forwards.
pub const MAX_PHOTO_WIDTH: u32 = 1600;
pub const DEFAULT_PHOTO_WIDTH: u32 = 400;

/// A required, non-blank text parameter, trimmed.
pub fn required_text(field: &'static str, raw: Option<&str>) -> Result<String, ValidationError> {
    let value = raw.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(value.to_string())
}

pub fn prediction_limit(raw: Option<i64>) -> Result<usize, ValidationError> {
    match raw {
        None => Ok(DEFAULT_PREDICTION_LIMIT),
        Some(limit) if (1..=MAX_PREDICTION_LIMIT as i64).contains(&limit) => Ok(limit as usize),
        Some(limit) => Err(invalid(
            "limit",
            format!("{limit} is outside 1..={MAX_PREDICTION_LIMIT}"),
        )),
    }
}

pub fn photo_reference(raw: Option<&str>) -> Result<String, ValidationError> {
    let reference = required_text("reference", raw)?;
    if !is_photo_reference(&reference) {
        return Err(invalid("reference", "expected letters, digits, '-' or '_'"));
    }
    Ok(reference)
}

pub fn photo_width(raw: Option<i64>) -> Result<u32, ValidationError> {
    match raw {
        None => Ok(DEFAULT_PHOTO_WIDTH),
        Some(width) if (1..=i64::from(MAX_PHOTO_WIDTH)).contains(&width) => Ok(width as u32),
        Some(width) => Err(invalid(
            "maxwidth",
            format!("{width} is outside 1..={MAX_PHOTO_WIDTH}"),
        )),
    }
}
