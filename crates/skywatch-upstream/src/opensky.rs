//! Live state-vector API client.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use skywatch_core::{BoundingBox, StateVector};

use crate::error::UpstreamError;

/// Credentials for the state-vector API. Anonymous access is used when absent.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// HTTP client for the `/states/all` endpoint.
#[derive(Debug, Clone)]
pub struct StateVectorClient {
    client: Client,
    base_url: String,
    auth: Option<BasicAuth>,
}

// Positional layout of one entry in the `states` array.
const ICAO24: usize = 0;
const CALLSIGN: usize = 1;
const ORIGIN_COUNTRY: usize = 2;
const LAST_CONTACT: usize = 4;
const LONGITUDE: usize = 5;
const LATITUDE: usize = 6;
const BARO_ALTITUDE: usize = 7;
const ON_GROUND: usize = 8;
const VELOCITY: usize = 9;
const TRUE_TRACK: usize = 10;
const VERTICAL_RATE: usize = 11;
const GEO_ALTITUDE: usize = 13;

impl StateVectorClient {
    pub fn new(
        base_url: impl Into<String>,
        auth: Option<BasicAuth>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(UpstreamError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Fetch every state vector currently reported inside `bbox`.
    pub async fn states_in(&self, bbox: &BoundingBox) -> Result<Vec<StateVector>, UpstreamError> {
        const CONTEXT: &str = "state vector request failed";
        let url = format!("{}/states/all", self.base_url);

        let mut request = self.client.get(&url).query(&[
            ("lamin", bbox.lamin),
            ("lamax", bbox.lamax),
            ("lomin", bbox.lomin),
            ("lomax", bbox.lomax),
        ]);
        if let Some(auth) = &self.auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }

        let response = request
            .send()
            .await
            .map_err(|source| UpstreamError::Request {
                context: CONTEXT,
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                context: CONTEXT,
                status,
                body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|source| UpstreamError::Request {
                context: "failed to parse state vector response",
                source,
            })?;

        let states = parse_states(&payload);
        tracing::debug!(count = states.len(), ?bbox, "Fetched state vectors");
        Ok(states)
    }
}

/// Decode the `states` array of a `/states/all` payload.
///
/// A `null` or missing array yields no vectors. Rows without an icao24 are skipped.
pub fn parse_states(payload: &Value) -> Vec<StateVector> {
    let Some(rows) = payload.get("states").and_then(Value::as_array) else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| {
            let parsed = row.as_array().and_then(|fields| parse_row(fields));
            if parsed.is_none() {
                tracing::warn!(%row, "Skipping malformed state vector");
            }
            parsed
        })
        .collect()
}

fn parse_row(fields: &[Value]) -> Option<StateVector> {
    let text = |idx: usize| fields.get(idx).and_then(Value::as_str);
    let number = |idx: usize| fields.get(idx).and_then(Value::as_f64);

    let icao24 = text(ICAO24)?.to_string();
    let callsign = text(CALLSIGN)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    let last_contact = fields
        .get(LAST_CONTACT)
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

    Some(StateVector {
        icao24,
        callsign,
        origin_country: text(ORIGIN_COUNTRY).unwrap_or_default().to_string(),
        latitude: number(LATITUDE),
        longitude: number(LONGITUDE),
        baro_altitude_m: number(BARO_ALTITUDE),
        geo_altitude_m: number(GEO_ALTITUDE),
        velocity_mps: number(VELOCITY),
        true_track_deg: number(TRUE_TRACK),
        vertical_rate_mps: number(VERTICAL_RATE),
        on_ground: fields
            .get(ON_GROUND)
            .and_then(Value::as_bool)
            .unwrap_or(false),
        last_contact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn sample_payload() -> Value {
        json!({
            "time": 1_700_000_000,
            "states": [
                ["4b1805", "SWR12A  ", "Switzerland", 1_699_999_990, 1_699_999_995,
                 8.56, 47.46, 1219.2, false, 98.3, 274.0, -3.9, null, 1280.2, "1000", false, 0],
                ["3c6444", null, "Germany", null, 1_699_999_900,
                 null, null, null, true, 0.0, null, null, null, null, null, false, 0],
                "not a row",
                [null, "BAD"]
            ]
        })
    }

    #[test]
    fn parses_rows_and_trims_callsign() {
        let states = parse_states(&sample_payload());
        assert_eq!(states.len(), 2);

        let first = &states[0];
        assert_eq!(first.icao24, "4b1805");
        assert_eq!(first.callsign.as_deref(), Some("SWR12A"));
        assert_eq!(first.position(), Some((47.46, 8.56)));
        assert_eq!(first.baro_altitude_m, Some(1219.2));
        assert_eq!(first.geo_altitude_m, Some(1280.2));
        assert_eq!(first.velocity_mps, Some(98.3));
        assert_eq!(
            first.last_contact.map(|t| t.timestamp()),
            Some(1_699_999_995)
        );

        let second = &states[1];
        assert_eq!(second.callsign, None);
        assert_eq!(second.position(), None);
        assert!(second.on_ground);
    }

    #[test]
    fn null_states_yield_empty_list() {
        assert!(parse_states(&json!({"time": 1, "states": null})).is_empty());
        assert!(parse_states(&json!({"time": 1})).is_empty());
    }

    #[tokio::test]
    async fn states_in_sends_bbox_query() {
        let app = Router::new().route(
            "/api/states/all",
            get(|Query(params): Query<HashMap<String, f64>>| async move {
                assert_eq!(params.get("lamin"), Some(&45.8));
                assert_eq!(params.get("lamax"), Some(&47.8));
                assert_eq!(params.get("lomin"), Some(&5.9));
                assert_eq!(params.get("lomax"), Some(&10.5));
                Json(sample_payload())
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let client = StateVectorClient::new(
            format!("http://{addr}/api/"),
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        let states = client
            .states_in(&BoundingBox::new(45.8, 47.8, 5.9, 10.5))
            .await
            .unwrap();
        assert_eq!(states.len(), 2);
    }

    #[tokio::test]
    async fn states_in_reports_error_status() {
        let app = Router::new().route(
            "/states/all",
            get(|| async { (axum::http::StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let client =
            StateVectorClient::new(format!("http://{addr}"), None, Duration::from_secs(5)).unwrap();
        let err = client
            .states_in(&BoundingBox::new(0.0, 1.0, 0.0, 1.0))
            .await
            .unwrap_err();
        match err {
            UpstreamError::Status { status, body, .. } => {
                assert_eq!(status.as_u16(), 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
