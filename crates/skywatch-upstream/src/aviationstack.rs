//! Flight and airport metadata API client.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::error::UpstreamError;

/// Every metadata call is bounded by this timeout.
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for flight-number and nearby-airport lookups.
///
/// Responses are passed through untouched: callers receive the `data` field as-is.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    client: Client,
    base_url: String,
}

impl MetadataClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(METADATA_TIMEOUT)
            .build()
            .map_err(UpstreamError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Look up flights by IATA flight number.
    pub async fn flights(&self, access_key: &str, flight_number: &str) -> Result<Value, UpstreamError> {
        self.fetch_data(
            "flights",
            &[("access_key", access_key), ("flight_iata", flight_number)],
            "flight lookup failed",
        )
        .await
    }

    /// Look up airports near a point, optionally within `distance_km`.
    pub async fn nearby_airports(
        &self,
        access_key: &str,
        lat: f64,
        lon: f64,
        distance_km: Option<f64>,
    ) -> Result<Value, UpstreamError> {
        let lat = lat.to_string();
        let lon = lon.to_string();
        let distance = distance_km.map(|d| d.to_string());

        let mut params = vec![
            ("access_key", access_key),
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
        ];
        if let Some(distance) = distance.as_deref() {
            params.push(("distance", distance));
        }

        self.fetch_data("airports", &params, "nearby airport lookup failed")
            .await
    }

    async fn fetch_data(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        context: &'static str,
    ) -> Result<Value, UpstreamError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|source| UpstreamError::Request { context, source })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                context,
                status,
                body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|source| UpstreamError::Request { context, source })?;

        extract_data(payload, context)
    }
}

/// Pull the `data` field out of a metadata response.
///
/// A missing field yields an empty array. An `error` object is surfaced as [`UpstreamError::Api`].
pub fn extract_data(mut payload: Value, context: &'static str) -> Result<Value, UpstreamError> {
    if let Some(error) = payload.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(UpstreamError::Api { context, message });
    }

    Ok(payload
        .get_mut("data")
        .map(Value::take)
        .unwrap_or_else(|| Value::Array(Vec::new())))
}
