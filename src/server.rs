//! MCP server over stdio
//!
//! Speaks JSON-RPC 2.0, one message per line on stdin, one response per
//! line on stdout. Logging goes to stderr so the protocol stream stays
//! clean. Tool failures come back as `isError` tool results; only
//! protocol-level problems (bad JSON, unknown method or tool) become
//! JSON-RPC error objects.

use crate::error::Error;
use crate::tools::Registry;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

const PROTOCOL_VERSION: &str = "2024-11-05";

const SERVER_INSTRUCTIONS: &str =
    "Polymarket MCP server providing full access to prediction market data and trading. \
     Use the Gamma tools (search_events, search_markets) to discover markets, then use \
     CLOB tools (get_price, get_order_book, get_midpoint, etc.) to retrieve real-time \
     trading data using the token IDs from the Gamma results. Use get_price_history for \
     trend analysis and get_open_interest for conviction signals. Use get_positions, \
     get_trade_history, and get_activity for account monitoring. Use place_order, \
     cancel_order, etc. for trading (requires API credentials in .env).";

#[derive(Deserialize)]
struct Request {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

pub struct Server {
    registry: Registry,
}

impl Server {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Run the stdio loop until stdin closes.
    pub async fn serve(&self) -> std::io::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut lines = stdin.lines();

        tracing::info!(tools = self.registry.len(), "MCP server listening on stdio");

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                let mut payload = response.to_string();
                payload.push('\n');
                stdout.write_all(payload.as_bytes()).await?;
                stdout.flush().await?;
            }
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one incoming line. Returns `None` for notifications, which
    /// get no response.
    async fn handle_line(&self, line: &str) -> Option<Value> {
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                return Some(error_response(
                    Value::Null,
                    -32700,
                    &format!("Parse error: {e}"),
                ))
            }
        };

        let is_notification = request.id.is_none();
        if request.method.starts_with("notifications/") {
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {"tools": {}},
                    "serverInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                    "instructions": SERVER_INSTRUCTIONS,
                }
            }),
            "ping" => json!({"jsonrpc": "2.0", "id": id, "result": {}}),
            "tools/list" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {"tools": self.registry.list()}
            }),
            "tools/call" => self.handle_tool_call(id, &request.params).await,
            other => error_response(id, -32601, &format!("Method not found: {other}")),
        };

        // A malformed client could send a request method without an id;
        // answering would desynchronize the stream.
        if is_notification {
            return None;
        }
        Some(response)
    }

    async fn handle_tool_call(&self, id: Value, params: &Value) -> Value {
        let Some(name) = params.get("name").and_then(|v| v.as_str()) else {
            return error_response(id, -32602, "Missing tool name");
        };
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        tracing::debug!(tool = name, "tools/call");

        match self.registry.call(name, &arguments).await {
            Ok(output) => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "content": [{"type": "text", "text": output.render()}]
                }
            }),
            Err(Error::UnknownTool(name)) => {
                error_response(id, -32602, &format!("Unknown tool: {name}"))
            }
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool call failed");
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": {
                        "content": [{"type": "text", "text": e.to_string()}],
                        "isError": true
                    }
                })
            }
        }
    }
}

fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {"code": code, "message": message}
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn server() -> Server {
        Server::new(Registry::new(&Config {
            dry_run: true,
            ..Config::default()
        }))
    }

    #[tokio::test]
    async fn initialize_reports_tool_capability() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn initialized_notification_gets_no_response() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn tools_list_includes_descriptors() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
            .await
            .unwrap();
        let tools = response["result"]["tools"].as_array().unwrap();
        assert!(tools.iter().any(|t| t["name"] == "place_order"));
        assert!(tools.iter().any(|t| t["name"] == "search_events"));
    }

    #[tokio::test]
    async fn tool_call_result_is_text_content() {
        let response = server()
            .handle_line(
                r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"place_order","arguments":{"token_id":"123","price":0.1,"size":5.0,"side":"BUY"}}}"#,
            )
            .await
            .unwrap();
        let content = &response["result"]["content"][0];
        assert_eq!(content["type"], "text");
        let text: Value = serde_json::from_str(content["text"].as_str().unwrap()).unwrap();
        assert_eq!(text["dry_run"], true);
        assert_eq!(text["would_place"]["order_value"], 0.5);
    }

    #[tokio::test]
    async fn oversized_order_surfaces_as_tool_error() {
        let response = server()
            .handle_line(
                r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"place_order","arguments":{"token_id":"123","price":0.5,"size":300.0,"side":"BUY"}}}"#,
            )
            .await
            .unwrap();
        assert_eq!(response["result"]["isError"], true);
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("150"));
        assert!(text.contains("100"));
    }

    #[tokio::test]
    async fn unknown_tool_is_protocol_error() {
        let response = server()
            .handle_line(
                r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"no_such_tool"}}"#,
            )
            .await
            .unwrap();
        assert_eq!(response["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn unknown_method_is_protocol_error() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":6,"method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(response["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn malformed_json_is_parse_error() {
        let response = server().handle_line("{not json").await.unwrap();
        assert_eq!(response["error"]["code"], -32700);
    }
}
