//! Polymarket MCP Server
//!
//! A Model Context Protocol server exposing Polymarket's public APIs and
//! authenticated order management as MCP tools:
//! - CLOB market data (prices, order books, spreads, history)
//! - Gamma event and market discovery
//! - Data API analytics (open interest, positions, activity)
//! - Order placement and cancellation via the Polymarket client SDK
//!
//! # Safety Model
//!
//! - Trading tools enforce a per-order value cap before any network call
//! - A dry-run mode echoes intended actions without executing them
//! - Private keys and API credentials are held as redacted secrets
//! - The wire format is text: every tool result crosses the MCP boundary
//!   as a string

pub mod clients;
pub mod config;
pub mod http;
pub mod server;
pub mod tools;
pub mod trading;

mod error;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use server::Server;
pub use tools::Registry;
pub use trading::TradingClient;
