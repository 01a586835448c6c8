//! API server for Papermill.
//!
//! Provides the HTTP REST surface over the orchestration engine.

pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

pub use config::Config;
pub use state::AppState;
