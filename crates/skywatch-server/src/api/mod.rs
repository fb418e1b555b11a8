//! API routes for the gateway.

pub mod error;
mod routes;

pub use error::{ApiError, ApiResult};

use axum::Router;

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}

#[cfg(test)]
mod tests;
