//! Error types for the Polymarket MCP server

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Order value {value} exceeds maximum allowed {max}")]
    OrderTooLarge { value: f64, max: f64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Polymarket SDK error: {0}")]
    Sdk(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
