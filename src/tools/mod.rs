//! MCP tool surface
//!
//! Every client method is exposed as one named, described, typed tool.
//! Tool output always crosses the boundary as text: JSON results are
//! serialized, and the few endpoints that answer with a bare string
//! (health check, server time) pass it through unwrapped.

mod clob;
mod data;
mod gamma;
mod trading;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::trading::TradingClient;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// What a tool hands back across the text-only boundary.
#[derive(Debug)]
pub enum ToolOutput {
    /// Raw string, passed through unmodified.
    Text(String),
    /// JSON value, serialized before crossing the boundary.
    Json(Value),
}

impl ToolOutput {
    pub fn render(&self) -> String {
        match self {
            ToolOutput::Text(s) => s.clone(),
            ToolOutput::Json(v) => v.to_string(),
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON Schema for the tool's arguments.
    fn input_schema(&self) -> Value;
    async fn call(&self, args: &Value) -> Result<ToolOutput>;
}

/// Static name-to-tool table, built once at startup.
pub struct Registry {
    tools: BTreeMap<&'static str, Box<dyn Tool>>,
}

impl Registry {
    pub fn new(config: &Config) -> Self {
        let trading = Arc::new(TradingClient::new(config.clone()));

        let mut tools: Vec<Box<dyn Tool>> = Vec::new();
        tools.extend(clob::tools(config));
        tools.extend(gamma::tools(config));
        tools.extend(data::tools(config));
        tools.extend(trading::tools(trading));

        Self {
            tools: tools.into_iter().map(|t| (t.name(), t)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool descriptors for `tools/list`.
    pub fn list(&self) -> Vec<Value> {
        self.tools
            .values()
            .map(|t| {
                json!({
                    "name": t.name(),
                    "description": t.description(),
                    "inputSchema": t.input_schema(),
                })
            })
            .collect()
    }

    pub async fn call(&self, name: &str, args: &Value) -> Result<ToolOutput> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;
        tool.call(args).await
    }
}

// ------------------------------------------------------------------
// Argument extraction helpers
// ------------------------------------------------------------------

pub(crate) fn required_str(args: &Value, key: &str) -> Result<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidArgument(format!("Missing '{key}'")))
}

pub(crate) fn required_f64(args: &Value, key: &str) -> Result<f64> {
    args.get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| Error::InvalidArgument(format!("Missing '{key}'")))
}

pub(crate) fn optional_str(args: &Value, key: &str) -> Option<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn optional_u64(args: &Value, key: &str) -> Option<u64> {
    args.get(key).and_then(|v| v.as_u64())
}

pub(crate) fn optional_i64(args: &Value, key: &str) -> Option<i64> {
    args.get(key).and_then(|v| v.as_i64())
}

pub(crate) fn optional_f64(args: &Value, key: &str) -> Option<f64> {
    args.get(key).and_then(|v| v.as_f64())
}

pub(crate) fn optional_bool(args: &Value, key: &str) -> Option<bool> {
    args.get(key).and_then(|v| v.as_bool())
}

/// Split a comma-separated ID list, trimming whitespace.
pub(crate) fn split_ids(ids: &str) -> Vec<String> {
    ids.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
