//! REST API routes.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::state::AppState;
use skywatch_core::{annotate_nearby, closest, BoundingBox, FlightSummary, SearchCenter};

const NO_MATCHES: &str = "No matching aircraft found.";
const NO_AIRCRAFT_NEARBY: &str = "No aircraft found nearby.";
const MODEL_NOT_FOUND: &str = "Specified aircraft model not found.";

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get_flights", get(get_flights))
        .route("/around", get(around))
        .route("/identify", get(identify))
        .route("/flight", get(flight))
        .route("/nearbyairports", get(nearby_airports))
        .route("/nextoverhead", get(next_overhead))
        .route("/aircraftinfo", get(aircraft_info))
}

// === Request types ===

#[derive(Debug, Deserialize)]
pub struct BoundingBoxQuery {
    pub lamin: Option<String>,
    pub lamax: Option<String>,
    pub lomin: Option<String>,
    pub lomax: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PointQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    /// Search radius forwarded to the airport lookup
    pub distance: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdentifyQuery {
    pub desc: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FlightQuery {
    pub flight_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AircraftInfoQuery {
    #[serde(rename = "type")]
    pub model: Option<String>,
}

// === Parameter validation ===

fn required<'a>(name: &'static str, value: &'a Option<String>) -> ApiResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingParameter(name))
}

fn required_f64(name: &'static str, value: &Option<String>) -> ApiResult<f64> {
    let raw = required(name, value)?;
    parse_f64(name, raw)
}

fn parse_f64(name: &'static str, raw: &str) -> ApiResult<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ApiError::InvalidParameter {
            name,
            value: raw.to_string(),
        })
}

impl PointQuery {
    fn center(&self) -> ApiResult<SearchCenter> {
        Ok(SearchCenter::new(
            required_f64("lat", &self.lat)?,
            required_f64("lon", &self.lon)?,
        ))
    }
}

impl BoundingBoxQuery {
    fn bbox(&self) -> ApiResult<BoundingBox> {
        Ok(BoundingBox::new(
            required_f64("lamin", &self.lamin)?,
            required_f64("lamax", &self.lamax)?,
            required_f64("lomin", &self.lomin)?,
            required_f64("lomax", &self.lomax)?,
        ))
    }
}

fn access_key(state: &AppState) -> ApiResult<&str> {
    state
        .config()
        .aviationstack_api_key
        .as_deref()
        .ok_or(ApiError::MissingCredential)
}

// === Handlers ===

/// All flights inside an explicit bounding box.
async fn get_flights(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BoundingBoxQuery>,
) -> ApiResult<Json<Value>> {
    let bbox = query.bbox()?;
    let states = state.states().states_in(&bbox).await?;
    let flights: Vec<FlightSummary> = states.iter().map(FlightSummary::from).collect();
    Ok(Json(json!({ "flights": flights })))
}

/// Flights around a point, annotated with their distance.
async fn around(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PointQuery>,
) -> ApiResult<Json<Value>> {
    let center = query.center()?;
    let states = state.states().states_in(&center.bounding_box()).await?;
    let flights = annotate_nearby(center, &states);
    tracing::debug!(lat = center.lat, lon = center.lon, count = flights.len(), "Nearby flights");
    Ok(Json(json!({ "flights": flights })))
}

/// Closest positioned aircraft to a point.
async fn next_overhead(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PointQuery>,
) -> ApiResult<Json<Value>> {
    let center = query.center()?;
    let states = state.states().states_in(&center.bounding_box()).await?;
    let body = match closest(center, &states) {
        Some(aircraft) => json!({ "next_overhead": aircraft }),
        None => json!({ "message": NO_AIRCRAFT_NEARBY }),
    };
    Ok(Json(body))
}

/// Visual identification from a free-text description.
async fn identify(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdentifyQuery>,
) -> ApiResult<Json<Value>> {
    let desc = required("desc", &query.desc)?;
    let matches = state.reference().match_keywords(desc);
    if matches.is_empty() {
        return Ok(Json(json!({ "matches": [], "message": NO_MATCHES })));
    }
    Ok(Json(json!({ "matches": matches })))
}

/// Reference row for one aircraft model.
async fn aircraft_info(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AircraftInfoQuery>,
) -> ApiResult<Json<Value>> {
    let model = required("type", &query.model)?;
    let row = state
        .reference()
        .find_model(model)
        .map_err(|_| ApiError::NotFound(MODEL_NOT_FOUND))?;
    Ok(Json(json!({ "info": row })))
}

/// Flight metadata by flight number, passed through from the metadata API.
async fn flight(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FlightQuery>,
) -> ApiResult<Json<Value>> {
    let flight_number = required("flight_number", &query.flight_number)?;
    let key = access_key(&state)?;
    let data = state.metadata().flights(key, flight_number).await?;
    Ok(Json(json!({ "flights": data })))
}

/// Airports near a point, passed through from the metadata API.
async fn nearby_airports(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PointQuery>,
) -> ApiResult<Json<Value>> {
    let center = query.center()?;
    let distance = query
        .distance
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|raw| parse_f64("distance", raw))
        .transpose()?;
    let key = access_key(&state)?;
    let data = state
        .metadata()
        .nearby_airports(key, center.lat, center.lon, distance)
        .await?;
    Ok(Json(json!({ "airports": data })))
}
