//! Proximity search over state vectors returned for a bounding box.

use crate::geo::{haversine_km, BoundingBox};
use crate::models::{FlightSummary, OverheadAircraft, StateVector};

/// Buffer radius around the query point, in kilometers.
pub const SEARCH_BUFFER_KM: f64 = 30.0;

/// Center of a proximity query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchCenter {
    pub lat: f64,
    pub lon: f64,
}

impl SearchCenter {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Box to request from the state-vector API for this center.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::around(self.lat, self.lon, SEARCH_BUFFER_KM)
    }

    pub fn distance_km(&self, lat: f64, lon: f64) -> f64 {
        haversine_km(self.lat, self.lon, lat, lon)
    }
}

/// Every positioned vector annotated with its distance, in upstream order.
///
/// No radius cutoff is applied beyond the bounding box, so corner results can exceed the buffer.
pub fn annotate_nearby(center: SearchCenter, states: &[StateVector]) -> Vec<FlightSummary> {
    states
        .iter()
        .filter_map(|state| {
            let (lat, lon) = state.position()?;
            let mut summary = FlightSummary::from(state);
            summary.distance_km = Some(center.distance_km(lat, lon));
            Some(summary)
        })
        .collect()
}

/// The positioned vector nearest to `center`. The first one wins on ties.
pub fn closest(center: SearchCenter, states: &[StateVector]) -> Option<OverheadAircraft> {
    let mut best: Option<(&StateVector, f64)> = None;
    for state in states {
        let Some((lat, lon)) = state.position() else {
            continue;
        };
        let distance = center.distance_km(lat, lon);
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((state, distance));
        }
    }

    best.map(|(state, distance_km)| OverheadAircraft {
        callsign: state.callsign.clone(),
        icao24: state.icao24.clone(),
        distance_km,
    })
}
