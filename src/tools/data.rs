//! Data API tools
//!
//! Analytics and account data: open interest, positions, trade history,
//! and the activity log. User-scoped tools resolve the wallet address
//! from configuration; when none is set they return a structured
//! `{"error": ...}` payload instead of failing, so the calling agent can
//! recover, and no request leaves the process.

use super::{optional_f64, optional_str, optional_u64, Tool, ToolOutput};
use crate::clients::{ActivityQuery, DataClient, PositionsQuery, TradesQuery};
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

pub(super) fn tools(config: &Config) -> Vec<Box<dyn Tool>> {
    let data = DataClient::new(&config.data_url);
    let wallet = config.wallet_address.clone();
    vec![
        Box::new(OpenInterest(data.clone())),
        Box::new(Positions {
            data: data.clone(),
            wallet: wallet.clone(),
        }),
        Box::new(TradeHistory(data.clone())),
        Box::new(Activity { data, wallet }),
    ]
}

fn missing_wallet() -> ToolOutput {
    ToolOutput::Json(json!({"error": "POLYMARKET_WALLET_ADDRESS not set in .env"}))
}

struct OpenInterest(DataClient);

#[async_trait]
impl Tool for OpenInterest {
    fn name(&self) -> &'static str {
        "get_open_interest"
    }

    fn description(&self) -> &'static str {
        "Get open interest (total shares outstanding) for a market. High open interest \
         indicates strong market conviction and liquidity. Compare with volume to gauge \
         whether new money is entering the market."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "condition_id": {
                    "type": "string",
                    "description": "The on-chain condition ID. Omit for global aggregate."
                }
            },
            "additionalProperties": false
        })
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let result = self
            .0
            .open_interest(optional_str(args, "condition_id"))
            .await?;
        Ok(ToolOutput::Json(result))
    }
}

struct Positions {
    data: DataClient,
    wallet: Option<String>,
}

#[async_trait]
impl Tool for Positions {
    fn name(&self) -> &'static str {
        "get_positions"
    }

    fn description(&self) -> &'static str {
        "Get your current positions / holdings. Returns position data including size, \
         average entry price, and P&L for each outcome token you hold. Uses \
         POLYMARKET_WALLET_ADDRESS from .env."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "market": {
                    "type": "string",
                    "description": "Filter by market condition ID."
                },
                "event_id": {
                    "type": "string",
                    "description": "Filter by event ID."
                },
                "size_threshold": {
                    "type": "number",
                    "description": "Minimum position size to include."
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
        let Some(user) = self.wallet.clone() else {
            return Ok(missing_wallet());
        };
        let query = PositionsQuery {
            user,
            market: optional_str(args, "market"),
            event_id: optional_str(args, "event_id"),
            size_threshold: optional_f64(args, "size_threshold"),
            limit: optional_u64(args, "limit"),
            offset: optional_u64(args, "offset"),
        };
        Ok(ToolOutput::Json(self.data.positions(&query).await?))
    }
}

struct TradeHistory(DataClient);

#[async_trait]
impl Tool for TradeHistory {
    fn name(&self) -> &'static str {
        "get_trade_history"
    }

    fn description(&self) -> &'static str {
        "Get historical trades for a user or market. Returns executed trade records \
         with price, size, side, and timestamp."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "user": {
                    "type": "string",
                    "description": "Wallet address to query trades for."
                },
                "market": {
                    "type": "string",
                    "description": "Filter by market condition ID."
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
        let query = TradesQuery {
            user: optional_str(args, "user"),
            market: optional_str(args, "market"),
            limit: optional_u64(args, "limit"),
            offset: optional_u64(args, "offset"),
        };
        Ok(ToolOutput::Json(self.0.trades(&query).await?))
    }
}

struct Activity {
    data: DataClient,
    wallet: Option<String>,
}

#[async_trait]
impl Tool for Activity {
    fn name(&self) -> &'static str {
        "get_activity"
    }

    fn description(&self) -> &'static str {
        "Get your activity log (trades, splits, merges, rewards). Provides a complete \
         audit trail of all account activity. Uses POLYMARKET_WALLET_ADDRESS from .env."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "market": {
                    "type": "string",
                    "description": "Filter by market condition ID."
                },
                "activity_type": {
                    "type": "string",
                    "description": "Filter by type: TRADE, SPLIT, MERGE, REDEEM, REWARD, CONVERSION."
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
        let Some(user) = self.wallet.clone() else {
            return Ok(missing_wallet());
        };
        let query = ActivityQuery {
            user,
            market: optional_str(args, "market"),
            activity_type: optional_str(args, "activity_type"),
            limit: optional_u64(args, "limit"),
            offset: optional_u64(args, "offset"),
        };
        Ok(ToolOutput::Json(self.data.activity(&query).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The client points at an unroutable host: if the missing-wallet
    // path ever issued a request these tests would hang or error.

    #[tokio::test]
    async fn positions_without_wallet_returns_error_payload() {
        let tool = Positions {
            data: DataClient::new("http://unused.invalid"),
            wallet: None,
        };
        let output = tool.call(&json!({})).await.unwrap();
        let value: Value = serde_json::from_str(&output.render()).unwrap();
        assert_eq!(value["error"], "POLYMARKET_WALLET_ADDRESS not set in .env");
    }

    #[tokio::test]
    async fn activity_without_wallet_returns_error_payload() {
        let tool = Activity {
            data: DataClient::new("http://unused.invalid"),
            wallet: None,
        };
        let output = tool.call(&json!({"activity_type": "TRADE"})).await.unwrap();
        let value: Value = serde_json::from_str(&output.render()).unwrap();
        assert!(value["error"].as_str().unwrap().contains("POLYMARKET_WALLET_ADDRESS"));
    }
}
