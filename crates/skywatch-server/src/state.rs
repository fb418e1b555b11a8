//! Shared application state.

use skywatch_core::ReferenceTable;
use skywatch_upstream::{MetadataClient, StateVectorClient, UpstreamError};

use crate::config::Config;

/// Read-only state shared by every request handler.
pub struct AppState {
    config: Config,
    reference: ReferenceTable,
    states: StateVectorClient,
    metadata: MetadataClient,
}

impl AppState {
    pub fn new(config: Config, reference: ReferenceTable) -> Result<Self, UpstreamError> {
        let states = StateVectorClient::new(
            config.opensky_url.clone(),
            config.opensky_auth(),
            config.opensky_timeout,
        )?;
        let metadata = MetadataClient::new(config.aviationstack_url.clone())?;
        Ok(Self {
            config,
            reference,
            states,
            metadata,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    pub fn states(&self) -> &StateVectorClient {
        &self.states
    }

    pub fn metadata(&self) -> &MetadataClient {
        &self.metadata
    }
}
