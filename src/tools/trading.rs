//! Authenticated trading tools
//!
//! Order placement, cancellation, and account queries. These tools spend
//! real money; the order-value cap and the dry-run flag are enforced in
//! [`TradingClient`] before anything reaches the venue.

use super::{
    optional_bool, optional_str, required_f64, required_str, split_ids, Tool, ToolOutput,
};
use crate::error::Result;
use crate::trading::{OrderArgs, TradingClient};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub(super) fn tools(trading: Arc<TradingClient>) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(PlaceOrder(trading.clone())),
        Box::new(CancelOrder(trading.clone())),
        Box::new(CancelAllOrders(trading.clone())),
        Box::new(CancelOrders(trading.clone())),
        Box::new(OpenOrders(trading.clone())),
        Box::new(GetOrder(trading.clone())),
        Box::new(BalanceAllowance(trading)),
    ]
}

struct PlaceOrder(Arc<TradingClient>);

#[async_trait]
impl Tool for PlaceOrder {
    fn name(&self) -> &'static str {
        "place_order"
    }

    fn description(&self) -> &'static str {
        "Place a limit order on a Polymarket market. This spends real money! The order \
         value (price x size) is checked against POLYMARKET_MAX_ORDER_SIZE before \
         submission. Set POLYMARKET_DRY_RUN=true in .env to simulate without executing."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "token_id": {
                    "type": "string",
                    "description": "The CLOB token ID for the outcome (YES or NO side)."
                },
                "price": {
                    "type": "number",
                    "description": "Limit price between 0.01 and 0.99 (probability)."
                },
                "size": {
                    "type": "number",
                    "description": "Number of shares to buy/sell."
                },
                "side": {
                    "type": "string",
                    "enum": ["BUY", "SELL"],
                    "description": "\"BUY\" or \"SELL\"."
                },
                "order_type": {
                    "type": "string",
                    "enum": ["GTC", "FOK", "GTD", "FAK"],
                    "description": "Order type. GTC (Good-Til-Cancelled, default), FOK (Fill-Or-Kill), GTD (Good-Til-Date), FAK (Fill-And-Kill)."
                },
                "tick_size": {
                    "type": "string",
                    "description": "Market tick size (\"0.1\", \"0.01\", \"0.001\", \"0.0001\")."
                },
                "neg_risk": {
                    "type": "boolean",
                    "description": "Whether the market uses negative risk."
                }
            },
            "required": ["token_id", "price", "size", "side"],
            "additionalProperties": false
        })
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let order = OrderArgs {
            token_id: required_str(args, "token_id")?,
            price: required_f64(args, "price")?,
            size: required_f64(args, "size")?,
            side: required_str(args, "side")?,
            order_type: optional_str(args, "order_type").unwrap_or_else(|| "GTC".to_string()),
            tick_size: optional_str(args, "tick_size").unwrap_or_else(|| "0.01".to_string()),
            neg_risk: optional_bool(args, "neg_risk").unwrap_or(false),
        };
        Ok(ToolOutput::Json(self.0.place_order(&order).await?))
    }
}

struct CancelOrder(Arc<TradingClient>);

#[async_trait]
impl Tool for CancelOrder {
    fn name(&self) -> &'static str {
        "cancel_order"
    }

    fn description(&self) -> &'static str {
        "Cancel a specific open order by its ID."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "order_id": {
                    "type": "string",
                    "description": "The order ID returned when the order was placed."
                }
            },
            "required": ["order_id"],
            "additionalProperties": false
        })
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let order_id = required_str(args, "order_id")?;
        Ok(ToolOutput::Json(self.0.cancel_order(&order_id).await?))
    }
}

struct CancelAllOrders(Arc<TradingClient>);

#[async_trait]
impl Tool for CancelAllOrders {
    fn name(&self) -> &'static str {
        "cancel_all_orders"
    }

    fn description(&self) -> &'static str {
        "Cancel ALL open orders. Emergency kill switch. Use this to immediately exit \
         all pending positions."
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {}, "additionalProperties": false})
    }

    async fn call(&self, _args: &Value) -> Result<ToolOutput> {
        Ok(ToolOutput::Json(self.0.cancel_all_orders().await?))
    }
}

struct CancelOrders(Arc<TradingClient>);

#[async_trait]
impl Tool for CancelOrders {
    fn name(&self) -> &'static str {
        "cancel_orders"
    }

    fn description(&self) -> &'static str {
        "Cancel multiple orders by their IDs."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "order_ids": {
                    "type": "string",
                    "description": "Comma-separated list of order IDs to cancel."
                }
            },
            "required": ["order_ids"],
            "additionalProperties": false
        })
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let ids = split_ids(&required_str(args, "order_ids")?);
        Ok(ToolOutput::Json(self.0.cancel_orders(&ids).await?))
    }
}

struct OpenOrders(Arc<TradingClient>);

#[async_trait]
impl Tool for OpenOrders {
    fn name(&self) -> &'static str {
        "get_open_orders"
    }

    fn description(&self) -> &'static str {
        "Get all open/pending orders for your account."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "market": {
                    "type": "string",
                    "description": "Filter by market condition ID."
                },
                "asset_id": {
                    "type": "string",
                    "description": "Filter by specific token ID."
                }
            },
            "additionalProperties": false
        })
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let market = optional_str(args, "market");
        let asset_id = optional_str(args, "asset_id");
        Ok(ToolOutput::Json(self.0.open_orders(market, asset_id).await?))
    }
}

struct GetOrder(Arc<TradingClient>);

#[async_trait]
impl Tool for GetOrder {
    fn name(&self) -> &'static str {
        "get_order"
    }

    fn description(&self) -> &'static str {
        "Get details and status of a specific order."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "order_id": {
                    "type": "string",
                    "description": "The order ID to look up."
                }
            },
            "required": ["order_id"],
            "additionalProperties": false
        })
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let order_id = required_str(args, "order_id")?;
        Ok(ToolOutput::Json(self.0.order(&order_id).await?))
    }
}

struct BalanceAllowance(Arc<TradingClient>);

#[async_trait]
impl Tool for BalanceAllowance {
    fn name(&self) -> &'static str {
        "get_balance_allowance"
    }

    fn description(&self) -> &'static str {
        "Get your USDC balance and approval status on Polymarket."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "asset_type": {
                    "type": "string",
                    "enum": ["COLLATERAL", "CONDITIONAL"],
                    "description": "\"COLLATERAL\" for USDC balance, \"CONDITIONAL\" for outcome token balance (requires token_id)."
                },
                "token_id": {
                    "type": "string",
                    "description": "Required when asset_type is CONDITIONAL."
                }
            },
            "additionalProperties": false
        })
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let asset_type =
            optional_str(args, "asset_type").unwrap_or_else(|| "COLLATERAL".to_string());
        let token_id = optional_str(args, "token_id");
        Ok(ToolOutput::Json(
            self.0.balance_allowance(&asset_type, token_id).await?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::Error;

    fn dry_run_trading() -> Arc<TradingClient> {
        Arc::new(TradingClient::new(Config {
            dry_run: true,
            ..Config::default()
        }))
    }

    #[tokio::test]
    async fn place_order_defaults_type_to_gtc() {
        let tool = PlaceOrder(dry_run_trading());
        let output = tool
            .call(&json!({
                "token_id": "123",
                "price": 0.1,
                "size": 5.0,
                "side": "BUY"
            }))
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&output.render()).unwrap();
        assert_eq!(value["would_place"]["order_type"], "GTC");
        assert_eq!(value["would_place"]["order_value"], 0.5);
    }

    #[tokio::test]
    async fn place_order_over_cap_fails_even_in_dry_run() {
        let tool = PlaceOrder(dry_run_trading());
        let err = tool
            .call(&json!({
                "token_id": "123",
                "price": 0.5,
                "size": 300.0,
                "side": "BUY"
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::OrderTooLarge { .. }));
    }

    #[tokio::test]
    async fn cancel_orders_splits_comma_list() {
        let tool = CancelOrders(dry_run_trading());
        let output = tool
            .call(&json!({"order_ids": "0xa, 0xb,0xc"}))
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&output.render()).unwrap();
        assert_eq!(value["would_cancel"], json!(["0xa", "0xb", "0xc"]));
    }

    #[tokio::test]
    async fn place_order_requires_price() {
        let tool = PlaceOrder(dry_run_trading());
        let err = tool
            .call(&json!({"token_id": "123", "size": 5.0, "side": "BUY"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
