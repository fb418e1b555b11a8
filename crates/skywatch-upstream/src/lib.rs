//! SkyWatch upstream - HTTP clients for third-party flight data.
//!
//! Two providers are wrapped:
//! - the crowdsourced ADS-B state-vector API (OpenSky REST shape)
//! - the commercial flight and airport metadata API (aviationstack REST shape)

pub mod aviationstack;
pub mod error;
pub mod opensky;

pub use aviationstack::MetadataClient;
pub use error::UpstreamError;
pub use opensky::{BasicAuth, StateVectorClient};
