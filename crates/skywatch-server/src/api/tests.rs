use axum::{
    body::Body,
    extract::Query,
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use crate::{api, config::Config, state::AppState};
use skywatch_core::ReferenceTable;

const REFERENCE_CSV: &str = "\
Aircraft Model,Engine Configuration,Tail Configuration,Wing Configuration,Distinctive Features
Boeing 737,Twin engine,Conventional tail,Low swept wing,Flat-bottomed engine nacelles
ATR 72,Twin turboprop,T-tail,High straight wing,Propellers
Cessna 172,Single piston,Conventional tail,High straight wing,Strut-braced wing
";

fn zurich_states() -> Value {
    json!({
        "time": 1_700_000_000,
        "states": [
            ["4b1805", "SWR12A  ", "Switzerland", 1_699_999_990, 1_699_999_995,
             8.70, 47.55, 1219.2, false, 98.3, 274.0, -3.9, null, 1280.2, "1000", false, 0],
            ["4b1806", "EDW44   ", "Switzerland", 1_699_999_990, 1_699_999_995,
             8.57, 47.46, 800.0, false, 80.1, 140.0, 2.0, null, 830.0, "1000", false, 0],
            ["3c6444", "DLH9LF  ", "Germany", null, 1_699_999_900,
             null, null, null, true, 0.0, null, null, null, null, null, false, 0]
        ]
    })
}

/// Serve a fake state-vector and metadata API on an ephemeral port.
async fn spawn_upstream(states: Value) -> String {
    let app = Router::new()
        .route(
            "/opensky/states/all",
            get(move || {
                let states = states.clone();
                async move { Json(states) }
            }),
        )
        .route(
            "/aviationstack/flights",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                Json(json!({
                    "pagination": {"count": 1},
                    "data": [{
                        "flight": {"iata": params.get("flight_iata")},
                        "airline": {"name": "Swiss"}
                    }]
                }))
            }),
        )
        .route(
            "/aviationstack/airports",
            get(|| async {
                Json(json!({
                    "data": [
                        {"airport_name": "Zurich", "iata_code": "ZRH"},
                        {"airport_name": "Basel", "iata_code": "BSL"}
                    ]
                }))
            }),
        )
        .route(
            "/broken/states/all",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind upstream");
    let addr = listener.local_addr().expect("upstream addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve upstream") });
    format!("http://{addr}")
}

async fn setup_app_with(states: Value, api_key: Option<&str>) -> Router {
    let upstream = spawn_upstream(states).await;
    let mut config = Config::from_env();
    config.opensky_url = format!("{upstream}/opensky");
    config.opensky_username = None;
    config.opensky_password = None;
    config.opensky_timeout = Duration::from_secs(5);
    config.aviationstack_url = format!("{upstream}/aviationstack");
    config.aviationstack_api_key = api_key.map(str::to_string);

    let reference = ReferenceTable::from_reader(REFERENCE_CSV.as_bytes()).expect("reference");
    let state = Arc::new(AppState::new(config, reference).expect("state"));
    api::routes().with_state(state)
}

async fn setup_app() -> Router {
    setup_app_with(zurich_states(), Some("test-key")).await
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&bytes).expect("parse json"))
}

#[tokio::test]
async fn get_flights_returns_every_upstream_vector() {
    let app = setup_app().await;
    let (status, body) =
        get_json(&app, "/get_flights?lamin=45.8&lamax=47.8&lomin=5.9&lomax=10.5").await;
    assert_eq!(status, StatusCode::OK);

    let flights = body["flights"].as_array().unwrap();
    assert_eq!(flights.len(), 3);
    assert_eq!(flights[0]["callsign"], "SWR12A");
    assert_eq!(flights[0]["altitude"], 1219.2);
    assert_eq!(flights[0]["speed"], 98.3);
    assert_eq!(flights[2]["latitude"], Value::Null);
}

#[tokio::test]
async fn get_flights_empty_when_upstream_has_none() {
    let app = setup_app_with(json!({"time": 1, "states": null}), None).await;
    let (status, body) = get_json(&app, "/get_flights?lamin=0&lamax=1&lomin=0&lomax=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"flights": []}));
}

#[tokio::test]
async fn get_flights_validates_parameters() {
    let app = setup_app().await;
    let (status, body) = get_json(&app, "/get_flights?lamin=0&lamax=1&lomin=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("lomax"));

    let (status, _) = get_json(&app, "/get_flights?lamin=abc&lamax=1&lomin=0&lomax=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upstream_failure_is_internal_error() {
    let upstream = spawn_upstream(zurich_states()).await;
    let mut config = Config::from_env();
    config.opensky_url = format!("{upstream}/broken");
    config.opensky_username = None;
    config.opensky_password = None;
    let reference = ReferenceTable::from_reader(REFERENCE_CSV.as_bytes()).unwrap();
    let app = api::routes().with_state(Arc::new(AppState::new(config, reference).unwrap()));

    let (status, body) = get_json(&app, "/get_flights?lamin=0&lamax=1&lomin=0&lomax=1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("503"));

    let (status, _) = get_json(&app, "/nextoverhead?lat=47.45&lon=8.56").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn around_annotates_positioned_flights() {
    let app = setup_app().await;
    let (status, body) = get_json(&app, "/around?lat=47.45&lon=8.56").await;
    assert_eq!(status, StatusCode::OK);

    let flights = body["flights"].as_array().unwrap();
    assert_eq!(flights.len(), 2);
    assert_eq!(flights[0]["icao24"], "4b1805");
    assert_eq!(flights[1]["icao24"], "4b1806");
    let far = flights[0]["distance_km"].as_f64().unwrap();
    let near = flights[1]["distance_km"].as_f64().unwrap();
    assert!(near < far);
    assert!(near > 0.0 && near < 2.0, "got {near}");
}

#[tokio::test]
async fn around_requires_coordinates() {
    let app = setup_app().await;
    let (status, _) = get_json(&app, "/around?lat=47.45").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn next_overhead_returns_closest() {
    let app = setup_app().await;
    let (status, body) = get_json(&app, "/nextoverhead?lat=47.45&lon=8.56").await;
    assert_eq!(status, StatusCode::OK);

    let overhead = &body["next_overhead"];
    assert_eq!(overhead["icao24"], "4b1806");
    assert_eq!(overhead["callsign"], "EDW44");
    assert!(overhead["distance_km"].as_f64().unwrap() < 2.0);
}

#[tokio::test]
async fn next_overhead_without_candidates() {
    let app = setup_app_with(json!({"time": 1, "states": []}), None).await;
    let (status, body) = get_json(&app, "/nextoverhead?lat=47.45&lon=8.56").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "No aircraft found nearby."}));

    let (status, _) = get_json(&app, "/nextoverhead?lon=8.56").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn identify_orders_by_overlap() {
    let app = setup_app().await;
    let (status, body) = get_json(&app, "/identify?desc=twin+engine+straight+wing").await;
    assert_eq!(status, StatusCode::OK);
    // 737: twin, engine x2, wing = 4; ATR: twin, straight, wing = 3; Cessna: straight, wing x2 = 3
    assert_eq!(body["matches"], json!(["Boeing 737", "ATR 72", "Cessna 172"]));
}

#[tokio::test]
async fn identify_without_matches() {
    let app = setup_app().await;
    let (status, body) = get_json(&app, "/identify?desc=purple+balloon").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"matches": [], "message": "No matching aircraft found."})
    );

    let (status, _) = get_json(&app, "/identify").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn aircraft_info_lookup() {
    let app = setup_app().await;
    let (status, body) = get_json(&app, "/aircraftinfo?type=atr%2072").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["Aircraft Model"], "ATR 72");
    assert_eq!(body["info"]["Tail Configuration"], "T-tail");

    let (status, body) = get_json(&app, "/aircraftinfo?type=Concorde").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Specified aircraft model not found."}));

    let (status, _) = get_json(&app, "/aircraftinfo").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn flight_passes_data_through() {
    let app = setup_app().await;
    let (status, body) = get_json(&app, "/flight?flight_number=LX318").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"flights": [{"flight": {"iata": "LX318"}, "airline": {"name": "Swiss"}}]})
    );

    let (status, _) = get_json(&app, "/flight").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn metadata_requires_credential() {
    let app = setup_app_with(zurich_states(), None).await;
    let (status, body) = get_json(&app, "/flight?flight_number=LX318").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "API key not configured");

    let (status, _) = get_json(&app, "/nearbyairports?lat=47.45&lon=8.56").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // Missing parameters are reported before the credential
    let (status, _) = get_json(&app, "/flight").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn nearby_airports_passes_data_through() {
    let app = setup_app().await;
    let (status, body) = get_json(&app, "/nearbyairports?lat=47.45&lon=8.56&distance=50").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["airports"].as_array().unwrap().len(), 2);
    assert_eq!(body["airports"][0]["iata_code"], "ZRH");

    let (status, _) = get_json(&app, "/nearbyairports?lat=47.45").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(&app, "/nearbyairports?lat=47.45&lon=8.56&distance=far").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
