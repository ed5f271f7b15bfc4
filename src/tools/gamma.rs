//! Gamma discovery tools
//!
//! Event and market search over the Gamma API. The free-text `query`
//! argument is matched via slug, mirroring what the API supports.

use super::{optional_bool, optional_str, optional_u64, required_str, Tool, ToolOutput};
use crate::clients::{EventsQuery, GammaClient, MarketsQuery};
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

pub(super) fn tools(config: &Config) -> Vec<Box<dyn Tool>> {
    let gamma = GammaClient::new(&config.gamma_url);
    vec![
        Box::new(SearchEvents(gamma.clone())),
        Box::new(GetEvent(gamma.clone())),
        Box::new(SearchMarkets(gamma.clone())),
        Box::new(GetMarket(gamma)),
    ]
}

struct SearchEvents(GammaClient);

#[async_trait]
impl Tool for SearchEvents {
    fn name(&self) -> &'static str {
        "search_events"
    }

    fn description(&self) -> &'static str {
        "Search and discover Polymarket prediction events. Events are top-level containers \
         that group related markets; for example, an event \"2024 US Presidential Election\" \
         may contain markets for each candidate. This is the best starting point for \
         exploring what's available on Polymarket."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search term to filter events by title or description (matched via slug)."
                },
                "tag": {
                    "type": "string",
                    "description": "Category tag to filter by (e.g. \"politics\", \"crypto\", \"sports\")."
                },
                "active": {
                    "type": "boolean",
                    "description": "If true, only return currently active/open events."
                },
                "closed": {
                    "type": "boolean",
                    "description": "If true, only return resolved/closed events."
                },
                "order": {
                    "type": "string",
                    "description": "Field to sort by (e.g. \"volume\", \"created_at\", \"end_date_iso\")."
                },
                "ascending": {
                    "type": "boolean",
                    "description": "Sort direction. False for descending (default)."
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results to return."
                },
                "offset": {
                    "type": "integer",
                    "description": "Pagination offset for results."
                }
            },
            "additionalProperties": false
        })
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let query = EventsQuery {
            slug: optional_str(args, "query"),
            tag: optional_str(args, "tag"),
            active: optional_bool(args, "active"),
            closed: optional_bool(args, "closed"),
            order: optional_str(args, "order"),
            ascending: optional_bool(args, "ascending"),
            limit: optional_u64(args, "limit"),
            offset: optional_u64(args, "offset"),
            id: None,
        };
        Ok(ToolOutput::Json(self.0.events(&query).await?))
    }
}

struct GetEvent(GammaClient);

#[async_trait]
impl Tool for GetEvent {
    fn name(&self) -> &'static str {
        "get_event"
    }

    fn description(&self) -> &'static str {
        "Get detailed information about a specific Polymarket event. Returns event \
         metadata along with all markets belonging to this event, including their \
         current prices, volumes, and outcome tokens."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "event_id": {
                    "type": "string",
                    "description": "The Gamma event ID (numeric string)."
                }
            },
            "required": ["event_id"],
            "additionalProperties": false
        })
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let event_id = required_str(args, "event_id")?;
        Ok(ToolOutput::Json(self.0.event(&event_id).await?))
    }
}

struct SearchMarkets(GammaClient);

#[async_trait]
impl Tool for SearchMarkets {
    fn name(&self) -> &'static str {
        "search_markets"
    }

    fn description(&self) -> &'static str {
        "Search and discover individual Polymarket markets. Each market represents a \
         single yes/no question with tradeable outcome tokens. Markets contain CLOB \
         token IDs needed for price and order book queries."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search term to filter markets by title (matched via slug)."
                },
                "tag": {
                    "type": "string",
                    "description": "Category tag to filter by."
                },
                "active": {
                    "type": "boolean",
                    "description": "If true, only return currently active/tradeable markets."
                },
                "closed": {
                    "type": "boolean",
                    "description": "If true, only return resolved/settled markets."
                },
                "condition_id": {
                    "type": "string",
                    "description": "Filter by on-chain condition ID."
                },
                "clob_token_ids": {
                    "type": "string",
                    "description": "Filter by CLOB token IDs."
                },
                "order": {
                    "type": "string",
                    "description": "Field to sort by."
                },
                "ascending": {
                    "type": "boolean",
                    "description": "Sort direction."
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results."
                },
                "offset": {
                    "type": "integer",
                    "description": "Pagination offset."
                }
            },
            "additionalProperties": false
        })
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let query = MarketsQuery {
            slug: optional_str(args, "query"),
            tag: optional_str(args, "tag"),
            active: optional_bool(args, "active"),
            closed: optional_bool(args, "closed"),
            condition_id: optional_str(args, "condition_id"),
            clob_token_ids: optional_str(args, "clob_token_ids"),
            order: optional_str(args, "order"),
            ascending: optional_bool(args, "ascending"),
            limit: optional_u64(args, "limit"),
            offset: optional_u64(args, "offset"),
            id: None,
        };
        Ok(ToolOutput::Json(self.0.markets(&query).await?))
    }
}

struct GetMarket(GammaClient);

#[async_trait]
impl Tool for GetMarket {
    fn name(&self) -> &'static str {
        "get_gamma_market"
    }

    fn description(&self) -> &'static str {
        "Get detailed information about a specific Polymarket market. Returns full \
         market metadata including question, description, outcomes, CLOB token IDs, \
         condition ID, volume, and resolution details."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "market_id_or_slug": {
                    "type": "string",
                    "description": "The Gamma market ID (numeric) or URL slug."
                }
            },
            "required": ["market_id_or_slug"],
            "additionalProperties": false
        })
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let id_or_slug = required_str(args, "market_id_or_slug")?;
        Ok(ToolOutput::Json(self.0.market(&id_or_slug).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn search_events_maps_query_to_slug() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/events")
            .match_query(Matcher::UrlEncoded("slug".into(), "election".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let tool = SearchEvents(GammaClient::new(&server.url()));
        tool.call(&json!({"query": "election"})).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn search_markets_drops_absent_filters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/markets")
            .match_query(Matcher::UrlEncoded("limit".into(), "3".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let tool = SearchMarkets(GammaClient::new(&server.url()));
        tool.call(&json!({"limit": 3})).await.unwrap();
        mock.assert_async().await;
    }
}
