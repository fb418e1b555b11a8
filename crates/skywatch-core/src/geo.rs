//! Great-circle distance and bounding-box helpers.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree used when turning a radius into a box.
/// Applied to longitude as well, so boxes are wider than the radius away from the equator.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Calculate haversine distance between two points in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Rectangular lat/lon region used to query the state-vector API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lamin: f64,
    pub lamax: f64,
    pub lomin: f64,
    pub lomax: f64,
}

impl BoundingBox {
    pub fn new(lamin: f64, lamax: f64, lomin: f64, lomax: f64) -> Self {
        Self {
            lamin,
            lamax,
            lomin,
            lomax,
        }
    }

    /// Box centered on a point, extending `buffer_km` in every direction.
    pub fn around(lat: f64, lon: f64, buffer_km: f64) -> Self {
        let buffer_deg = buffer_km / KM_PER_DEGREE;
        Self {
            lamin: lat - buffer_deg,
            lamax: lat + buffer_deg,
            lomin: lon - buffer_deg,
            lomax: lon + buffer_deg,
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lamin && lat <= self.lamax && lon >= self.lomin && lon <= self.lomax
    }
}
