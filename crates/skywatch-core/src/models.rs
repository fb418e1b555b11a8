//! Core data models for the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One aircraft's reported position at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    pub icao24: String,
    /// Callsign with the upstream space padding removed
    pub callsign: Option<String>,
    pub origin_country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub baro_altitude_m: Option<f64>,
    pub geo_altitude_m: Option<f64>,
    /// Ground speed in m/s
    pub velocity_mps: Option<f64>,
    pub true_track_deg: Option<f64>,
    pub vertical_rate_mps: Option<f64>,
    #[serde(default)]
    pub on_ground: bool,
    pub last_contact: Option<DateTime<Utc>>,
}

impl StateVector {
    /// Both coordinates, if the aircraft reported a position.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Flight shape returned by the listing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSummary {
    pub callsign: Option<String>,
    pub icao24: String,
    pub origin_country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl From<&StateVector> for FlightSummary {
    fn from(state: &StateVector) -> Self {
        Self {
            callsign: state.callsign.clone(),
            icao24: state.icao24.clone(),
            origin_country: state.origin_country.clone(),
            latitude: state.latitude,
            longitude: state.longitude,
            altitude: state.baro_altitude_m,
            speed: state.velocity_mps,
            distance_km: None,
        }
    }
}

/// Closest aircraft to a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverheadAircraft {
    pub callsign: Option<String>,
    pub icao24: String,
    pub distance_km: f64,
}

/// Static visual-identification record for one aircraft model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftReferenceRow {
    #[serde(rename = "Aircraft Model")]
    pub model: String,
    #[serde(rename = "Engine Configuration", default)]
    pub engine_configuration: String,
    #[serde(rename = "Tail Configuration", default)]
    pub tail_configuration: String,
    #[serde(rename = "Wing Configuration", default)]
    pub wing_configuration: String,
    #[serde(rename = "Distinctive Features", default)]
    pub distinctive_features: String,
}

impl AircraftReferenceRow {
    /// The four clue fields joined with spaces.
    pub fn clue_text(&self) -> String {
        [
            self.engine_configuration.as_str(),
            self.tail_configuration.as_str(),
            self.wing_configuration.as_str(),
            self.distinctive_features.as_str(),
        ]
        .join(" ")
    }
}
