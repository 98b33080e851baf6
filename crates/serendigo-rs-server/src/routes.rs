//! Route handlers.

use crate::error::ApiError;
use crate::params;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use serendigo_rs_core::ServiceContext;
use serendigo_rs_store::DestinationStore;
use serendigo_rs_protocol::{
    ChosenDetour, DEFAULT_DESTINATION_LIMIT, Destination, GuideRequest, GuideResponse,
    HistoryRecord, MAX_DESTINATION_LIMIT, NewDestination, PlaceDetails, PlacePrediction,
    Suggestion, ValidationError,
};
use serendigo_rs_providers::PHOTO_ROUTE;
use std::sync::Arc;
use tower_http::services::ServeDir;

type AppState = Arc<ServiceContext>;

/// All API routes plus the static media mount, without middleware.
pub fn router(context: Arc<ServiceContext>) -> Router {
    let media = ServeDir::new(context.media.root());
    Router::new()
        .route("/health", get(health))
        .route("/detour/search", get(search))
        .route("/detour/choose", post(choose))
        .route("/detour/history", get(history))
        .route("/destinations", post(create_destination).get(list_destinations))
        .route("/destinations/{id}/guide", post(generate_guide))
        .route("/places/predictions", get(place_predictions))
        .route("/places/details", get(place_details))
        .route(PHOTO_ROUTE, get(place_photo))
        .nest_service("/media", media)
        .with_state(context)
}

fn query<T>(extracted: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    extracted
        .map(|Query(value)| value)
        .map_err(|rejection| ApiError::Malformed(rejection.body_text()))
}

fn body<T>(extracted: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    extracted
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::Malformed(rejection.body_text()))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn search(
    State(context): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Suggestion>>, ApiError> {
    let search_query = params::search_query(query(pairs)?)?;
    let suggestions = context.engine.search(&search_query).await?;
    Ok(Json(suggestions))
}

#[derive(Debug, Deserialize)]
struct ChooseParams {
    detour_type: Option<String>,
}

async fn choose(
    State(context): State<AppState>,
    choose_params: Result<Query<ChooseParams>, QueryRejection>,
    chosen: Result<Json<ChosenDetour>, JsonRejection>,
) -> Result<Json<HistoryRecord>, ApiError> {
    let detour_type = params::detour_type(query(choose_params)?.detour_type.as_deref())?;
    let chosen = body(chosen)?;
    chosen.validate()?;
    let record = context.recorder.choose(chosen, detour_type).await?;
    Ok(Json(record))
}

#[derive(Debug, Deserialize)]
struct HistoryParams {
    limit: Option<i64>,
}

async fn history(
    State(context): State<AppState>,
    history_params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<Vec<HistoryRecord>>, ApiError> {
    let limit = params::history_limit(query(history_params)?.limit)?;
    Ok(Json(context.recorder.list(limit).await?))
}

async fn create_destination(
    State(context): State<AppState>,
    payload: Result<Json<NewDestination>, JsonRejection>,
) -> Result<Json<Destination>, ApiError> {
    let payload = body(payload)?;
    payload.validate()?;
    let destination = context.destinations.create(payload).await?;
    info!(
        "destination saved (id={}, place_id={})",
        destination.id, destination.place_id
    );
    Ok(Json(destination))
}

#[derive(Debug, Deserialize)]
struct PageParams {
    skip: Option<i64>,
    limit: Option<i64>,
}

async fn list_destinations(
    State(context): State<AppState>,
    page: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Vec<Destination>>, ApiError> {
    let page = query(page)?;
    let skip = page.skip.unwrap_or(0);
    if skip < 0 {
        return Err(ValidationError::InvalidField {
            field: "skip",
            message: format!("{skip} must not be negative"),
        }
        .into());
    }
    let limit = page.limit.unwrap_or(DEFAULT_DESTINATION_LIMIT as i64);
    if !(1..=MAX_DESTINATION_LIMIT as i64).contains(&limit) {
        return Err(ValidationError::InvalidField {
            field: "limit",
            message: format!("{limit} is outside 1..={MAX_DESTINATION_LIMIT}"),
        }
        .into());
    }
    let destinations = context
        .destinations
        .list(skip as usize, limit as usize)
        .await?;
    Ok(Json(destinations))
}

async fn generate_guide(
    State(context): State<AppState>,
    Path(id): Path<String>,
    raw: Bytes,
) -> Result<Json<GuideResponse>, ApiError> {
    // An empty body means every option takes its default.
    let request: GuideRequest = if raw.iter().all(u8::is_ascii_whitespace) {
        GuideRequest::default()
    } else {
        serde_json::from_slice(&raw).map_err(|err| ApiError::Malformed(err.to_string()))?
    };
    let response = context.guide.generate(&id, &request).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct PredictionParams {
    input: Option<String>,
    limit: Option<i64>,
}

#[derive(Debug, Serialize)]
struct PredictionList {
    items: Vec<PlacePrediction>,
}

async fn place_predictions(
    State(context): State<AppState>,
    prediction_params: Result<Query<PredictionParams>, QueryRejection>,
) -> Result<Json<PredictionList>, ApiError> {
    let prediction_params = query(prediction_params)?;
    let input = params::required_text("input", prediction_params.input.as_deref())?;
    let limit = params::prediction_limit(prediction_params.limit)?;
    let items = context.places.predictions(&input, limit).await?;
    Ok(Json(PredictionList { items }))
}

#[derive(Debug, Deserialize)]
struct DetailsParams {
    place_id: Option<String>,
}

async fn place_details(
    State(context): State<AppState>,
    details_params: Result<Query<DetailsParams>, QueryRejection>,
) -> Result<Json<PlaceDetails>, ApiError> {
    let place_id = params::required_text("place_id", query(details_params)?.place_id.as_deref())?;
    match context.places.details(&place_id).await? {
        Some(details) => Ok(Json(details)),
        None => Err(ApiError::NotFound(format!("place {place_id}"))),
    }
}

#[derive(Debug, Deserialize)]
struct PhotoParams {
    reference: Option<String>,
    maxwidth: Option<i64>,
}

async fn place_photo(
    State(context): State<AppState>,
    photo_params: Result<Query<PhotoParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let photo_params = query(photo_params)?;
    let reference = params::photo_reference(photo_params.reference.as_deref())?;
    let width = params::photo_width(photo_params.maxwidth)?;
    let photo = context.places.photo(&reference, width).await?;
    Ok((
        [
            (header::CONTENT_TYPE, photo.content_type),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        photo.bytes,
    ))
}
