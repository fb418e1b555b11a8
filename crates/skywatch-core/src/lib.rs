//! SkyWatch core - geo math, proximity search and the aircraft reference table.

pub mod geo;
pub mod models;
pub mod proximity;
pub mod reference;

pub use geo::{haversine_km, BoundingBox};
pub use models::{AircraftReferenceRow, FlightSummary, OverheadAircraft, StateVector};
pub use proximity::{annotate_nearby, closest, SearchCenter, SEARCH_BUFFER_KM};
pub use reference::{ModelNotFound, ReferenceError, ReferenceTable};
