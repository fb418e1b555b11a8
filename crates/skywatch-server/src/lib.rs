//! Shared library surface for the gateway server and its tests.

pub mod api;
pub mod config;
pub mod state;
