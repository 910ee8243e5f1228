//! Shared building blocks for the VidGrab website backend.
//!
//! Models, configuration, the GitHub release client, and the
//! download-counts aggregator used by the API server.
pub mod aggregator;
pub mod config;
pub mod countdown;
pub mod errors;
pub mod github;
pub mod models;
pub mod notes;
pub mod text;
