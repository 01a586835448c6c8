//! Server configuration from the environment.

use std::net::SocketAddr;

use anyhow::Context;

/// Generative model used when a request does not name one.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the server binds to.
    pub addr: SocketAddr,
    /// API key for the Gemini backend.
    pub gemini_api_key: String,
    /// Default generative model.
    pub default_model: String,
}

impl Config {
    /// Read configuration from `PAPERMILL_ADDR`, `GEMINI_API_KEY`, and
    /// `PAPERMILL_MODEL`. Only the API key is required.
    pub fn from_env() -> anyhow::Result<Self> {
        let addr = std::env::var("PAPERMILL_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()
            .context("invalid PAPERMILL_ADDR")?;
        let gemini_api_key =
            std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY environment variable not set")?;
        let default_model =
            std::env::var("PAPERMILL_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            addr,
            gemini_api_key,
            default_model,
        })
    }
}
