//! CLOB market-data tools
//!
//! Read-only tools over the order-book venue: market listings, order
//! books, prices, spreads, and per-market metadata.

use super::{optional_i64, optional_str, optional_u64, required_str, split_ids, Tool, ToolOutput};
use crate::clients::{ClobClient, PriceHistoryQuery};
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

pub(super) fn tools(config: &Config) -> Vec<Box<dyn Tool>> {
    let clob = ClobClient::new(&config.clob_url);
    vec![
        Box::new(HealthCheck(clob.clone())),
        Box::new(ServerTime(clob.clone())),
        Box::new(Markets(clob.clone())),
        Box::new(SimplifiedMarkets(clob.clone())),
        Box::new(SamplingMarkets(clob.clone())),
        Box::new(SamplingSimplifiedMarkets(clob.clone())),
        Box::new(Market(clob.clone())),
        Box::new(MarketTradesEvents(clob.clone())),
        Box::new(OrderBook(clob.clone())),
        Box::new(OrderBooks(clob.clone())),
        Box::new(Price(clob.clone())),
        Box::new(Prices(clob.clone())),
        Box::new(Midpoint(clob.clone())),
        Box::new(Midpoints(clob.clone())),
        Box::new(Spread(clob.clone())),
        Box::new(Spreads(clob.clone())),
        Box::new(LastTradePrice(clob.clone())),
        Box::new(LastTradesPrices(clob.clone())),
        Box::new(TickSize(clob.clone())),
        Box::new(NegRisk(clob.clone())),
        Box::new(FeeRate(clob.clone())),
        Box::new(PriceHistory(clob)),
    ]
}

fn no_args_schema() -> Value {
    json!({"type": "object", "properties": {}, "additionalProperties": false})
}

fn cursor_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "next_cursor": {
                "type": "string",
                "description": "Pagination cursor from a previous response. Omit for the first page."
            }
        },
        "additionalProperties": false
    })
}

fn condition_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "condition_id": {
                "type": "string",
                "description": "The on-chain condition ID of the market."
            }
        },
        "required": ["condition_id"],
        "additionalProperties": false
    })
}

fn token_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "token_id": {
                "type": "string",
                "description": "The CLOB token ID for the outcome (YES or NO side of a market)."
            }
        },
        "required": ["token_id"],
        "additionalProperties": false
    })
}

fn token_ids_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "token_ids": {
                "type": "string",
                "description": "Comma-separated list of CLOB token IDs."
            }
        },
        "required": ["token_ids"],
        "additionalProperties": false
    })
}

struct HealthCheck(ClobClient);

#[async_trait]
impl Tool for HealthCheck {
    fn name(&self) -> &'static str {
        "clob_health_check"
    }

    fn description(&self) -> &'static str {
        "Check if the Polymarket CLOB API server is online and operational."
    }

    fn input_schema(&self) -> Value {
        no_args_schema()
    }

    async fn call(&self, _args: &Value) -> Result<ToolOutput> {
        // The venue answers with a bare string; it crosses the boundary
        // unwrapped rather than re-encoded as JSON.
        Ok(ToolOutput::Text(self.0.health_check().await?))
    }
}

struct ServerTime(ClobClient);

#[async_trait]
impl Tool for ServerTime {
    fn name(&self) -> &'static str {
        "clob_server_time"
    }

    fn description(&self) -> &'static str {
        "Get the current Polymarket CLOB server timestamp."
    }

    fn input_schema(&self) -> Value {
        no_args_schema()
    }

    async fn call(&self, _args: &Value) -> Result<ToolOutput> {
        Ok(ToolOutput::Text(self.0.server_time().await?))
    }
}

struct Markets(ClobClient);

#[async_trait]
impl Tool for Markets {
    fn name(&self) -> &'static str {
        "get_clob_markets"
    }

    fn description(&self) -> &'static str {
        "Get a paginated list of all markets on the Polymarket CLOB. Returns market data \
         including condition IDs, token IDs, and trading parameters. Use next_cursor from \
         a previous response to paginate through results."
    }

    fn input_schema(&self) -> Value {
        cursor_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let result = self.0.markets(optional_str(args, "next_cursor")).await?;
        Ok(ToolOutput::Json(result))
    }
}

struct SimplifiedMarkets(ClobClient);

#[async_trait]
impl Tool for SimplifiedMarkets {
    fn name(&self) -> &'static str {
        "get_clob_simplified_markets"
    }

    fn description(&self) -> &'static str {
        "Get a paginated compact list of CLOB markets (less detail, faster)."
    }

    fn input_schema(&self) -> Value {
        cursor_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let result = self
            .0
            .simplified_markets(optional_str(args, "next_cursor"))
            .await?;
        Ok(ToolOutput::Json(result))
    }
}

struct SamplingMarkets(ClobClient);

#[async_trait]
impl Tool for SamplingMarkets {
    fn name(&self) -> &'static str {
        "get_clob_sampling_markets"
    }

    fn description(&self) -> &'static str {
        "Get a paginated list of CLOB markets eligible for liquidity rewards."
    }

    fn input_schema(&self) -> Value {
        cursor_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let result = self
            .0
            .sampling_markets(optional_str(args, "next_cursor"))
            .await?;
        Ok(ToolOutput::Json(result))
    }
}

struct SamplingSimplifiedMarkets(ClobClient);

#[async_trait]
impl Tool for SamplingSimplifiedMarkets {
    fn name(&self) -> &'static str {
        "get_clob_sampling_simplified_markets"
    }

    fn description(&self) -> &'static str {
        "Get a compact paginated list of reward-eligible CLOB markets."
    }

    fn input_schema(&self) -> Value {
        cursor_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let result = self
            .0
            .sampling_simplified_markets(optional_str(args, "next_cursor"))
            .await?;
        Ok(ToolOutput::Json(result))
    }
}

struct Market(ClobClient);

#[async_trait]
impl Tool for Market {
    fn name(&self) -> &'static str {
        "get_clob_market"
    }

    fn description(&self) -> &'static str {
        "Get detailed information about a single CLOB market."
    }

    fn input_schema(&self) -> Value {
        condition_id_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let condition_id = required_str(args, "condition_id")?;
        Ok(ToolOutput::Json(self.0.market(&condition_id).await?))
    }
}

struct MarketTradesEvents(ClobClient);

#[async_trait]
impl Tool for MarketTradesEvents {
    fn name(&self) -> &'static str {
        "get_market_trades_events"
    }

    fn description(&self) -> &'static str {
        "Get live trade activity/events for a specific market."
    }

    fn input_schema(&self) -> Value {
        condition_id_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let condition_id = required_str(args, "condition_id")?;
        Ok(ToolOutput::Json(
            self.0.market_trades_events(&condition_id).await?,
        ))
    }
}

struct OrderBook(ClobClient);

#[async_trait]
impl Tool for OrderBook {
    fn name(&self) -> &'static str {
        "get_order_book"
    }

    fn description(&self) -> &'static str {
        "Get the full order book (bids and asks) for a specific outcome token. The order \
         book shows all open buy and sell orders at each price level."
    }

    fn input_schema(&self) -> Value {
        token_id_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let token_id = required_str(args, "token_id")?;
        Ok(ToolOutput::Json(self.0.order_book(&token_id).await?))
    }
}

struct OrderBooks(ClobClient);

#[async_trait]
impl Tool for OrderBooks {
    fn name(&self) -> &'static str {
        "get_order_books"
    }

    fn description(&self) -> &'static str {
        "Get order books for multiple tokens at once."
    }

    fn input_schema(&self) -> Value {
        token_ids_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let ids = split_ids(&required_str(args, "token_ids")?);
        Ok(ToolOutput::Json(self.0.order_books(&ids).await?))
    }
}

struct Price(ClobClient);

#[async_trait]
impl Tool for Price {
    fn name(&self) -> &'static str {
        "get_price"
    }

    fn description(&self) -> &'static str {
        "Get the current best price for a token on a given side. The price represents \
         the probability of the outcome (0.00 to 1.00)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "token_id": {
                    "type": "string",
                    "description": "The CLOB token ID for the outcome."
                },
                "side": {
                    "type": "string",
                    "enum": ["BUY", "SELL"],
                    "description": "Either \"BUY\" or \"SELL\"."
                }
            },
            "required": ["token_id", "side"],
            "additionalProperties": false
        })
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let token_id = required_str(args, "token_id")?;
        let side = required_str(args, "side")?;
        Ok(ToolOutput::Json(self.0.price(&token_id, &side).await?))
    }
}

struct Prices(ClobClient);

#[async_trait]
impl Tool for Prices {
    fn name(&self) -> &'static str {
        "get_prices"
    }

    fn description(&self) -> &'static str {
        "Get current best prices for multiple tokens at once, all on the same side."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "token_ids": {
                    "type": "string",
                    "description": "Comma-separated list of CLOB token IDs."
                },
                "side": {
                    "type": "string",
                    "enum": ["BUY", "SELL"],
                    "description": "Side to quote for every token."
                }
            },
            "required": ["token_ids", "side"],
            "additionalProperties": false
        })
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let ids = split_ids(&required_str(args, "token_ids")?);
        let side = required_str(args, "side")?;
        Ok(ToolOutput::Json(self.0.prices(&ids, &side).await?))
    }
}

struct Midpoint(ClobClient);

#[async_trait]
impl Tool for Midpoint {
    fn name(&self) -> &'static str {
        "get_midpoint"
    }

    fn description(&self) -> &'static str {
        "Get the mid-market price for a token. The midpoint is the average of the best \
         bid and best ask prices."
    }

    fn input_schema(&self) -> Value {
        token_id_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let token_id = required_str(args, "token_id")?;
        Ok(ToolOutput::Json(self.0.midpoint(&token_id).await?))
    }
}

struct Midpoints(ClobClient);

#[async_trait]
impl Tool for Midpoints {
    fn name(&self) -> &'static str {
        "get_midpoints"
    }

    fn description(&self) -> &'static str {
        "Get mid-market prices for multiple tokens at once."
    }

    fn input_schema(&self) -> Value {
        token_ids_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let ids = split_ids(&required_str(args, "token_ids")?);
        Ok(ToolOutput::Json(self.0.midpoints(&ids).await?))
    }
}

struct Spread(ClobClient);

#[async_trait]
impl Tool for Spread {
    fn name(&self) -> &'static str {
        "get_spread"
    }

    fn description(&self) -> &'static str {
        "Get the bid-ask spread for a token. The spread indicates market liquidity; \
         smaller spreads mean more liquid markets."
    }

    fn input_schema(&self) -> Value {
        token_id_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let token_id = required_str(args, "token_id")?;
        Ok(ToolOutput::Json(self.0.spread(&token_id).await?))
    }
}

struct Spreads(ClobClient);

#[async_trait]
impl Tool for Spreads {
    fn name(&self) -> &'static str {
        "get_spreads"
    }

    fn description(&self) -> &'static str {
        "Get bid-ask spreads for multiple tokens at once."
    }

    fn input_schema(&self) -> Value {
        token_ids_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let ids = split_ids(&required_str(args, "token_ids")?);
        Ok(ToolOutput::Json(self.0.spreads(&ids).await?))
    }
}

struct LastTradePrice(ClobClient);

#[async_trait]
impl Tool for LastTradePrice {
    fn name(&self) -> &'static str {
        "get_last_trade_price"
    }

    fn description(&self) -> &'static str {
        "Get the price at which the last trade was executed for a token."
    }

    fn input_schema(&self) -> Value {
        token_id_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let token_id = required_str(args, "token_id")?;
        Ok(ToolOutput::Json(self.0.last_trade_price(&token_id).await?))
    }
}

struct LastTradesPrices(ClobClient);

#[async_trait]
impl Tool for LastTradesPrices {
    fn name(&self) -> &'static str {
        "get_last_trades_prices"
    }

    fn description(&self) -> &'static str {
        "Get last trade prices for multiple tokens at once."
    }

    fn input_schema(&self) -> Value {
        token_ids_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let ids = split_ids(&required_str(args, "token_ids")?);
        Ok(ToolOutput::Json(self.0.last_trades_prices(&ids).await?))
    }
}

struct TickSize(ClobClient);

#[async_trait]
impl Tool for TickSize {
    fn name(&self) -> &'static str {
        "get_tick_size"
    }

    fn description(&self) -> &'static str {
        "Get the minimum tick size (price increment) for a token's market."
    }

    fn input_schema(&self) -> Value {
        token_id_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let token_id = required_str(args, "token_id")?;
        Ok(ToolOutput::Json(self.0.tick_size(&token_id).await?))
    }
}

struct NegRisk(ClobClient);

#[async_trait]
impl Tool for NegRisk {
    fn name(&self) -> &'static str {
        "get_neg_risk"
    }

    fn description(&self) -> &'static str {
        "Check whether a token's market uses negative risk."
    }

    fn input_schema(&self) -> Value {
        token_id_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let token_id = required_str(args, "token_id")?;
        Ok(ToolOutput::Json(self.0.neg_risk(&token_id).await?))
    }
}

struct FeeRate(ClobClient);

#[async_trait]
impl Tool for FeeRate {
    fn name(&self) -> &'static str {
        "get_fee_rate"
    }

    fn description(&self) -> &'static str {
        "Get the trading fee rate (in basis points) for a token's market."
    }

    fn input_schema(&self) -> Value {
        token_id_schema()
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let token_id = required_str(args, "token_id")?;
        Ok(ToolOutput::Json(self.0.fee_rate(&token_id).await?))
    }
}

struct PriceHistory(ClobClient);

#[async_trait]
impl Tool for PriceHistory {
    fn name(&self) -> &'static str {
        "get_price_history"
    }

    fn description(&self) -> &'static str {
        "Get historical price time-series for a token. Returns a list of {t, p} objects \
         (timestamp, price) for charting and trend analysis. Essential for identifying \
         momentum and reversals."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "token_id": {
                    "type": "string",
                    "description": "The CLOB token ID for the outcome."
                },
                "interval": {
                    "type": "string",
                    "enum": ["1h", "6h", "1d", "1w", "1m", "max"],
                    "description": "Preset window ending now. Mutually exclusive with start_ts/end_ts."
                },
                "fidelity": {
                    "type": "integer",
                    "description": "Data resolution in minutes (e.g. 60 for hourly, 1440 for daily)."
                },
                "start_ts": {
                    "type": "integer",
                    "description": "Start unix timestamp (UTC). Use with end_ts instead of interval."
                },
                "end_ts": {
                    "type": "integer",
                    "description": "End unix timestamp (UTC). Use with start_ts instead of interval."
                }
            },
            "required": ["token_id"],
            "additionalProperties": false
        })
    }

    async fn call(&self, args: &Value) -> Result<ToolOutput> {
        let query = PriceHistoryQuery {
            token_id: required_str(args, "token_id")?,
            interval: optional_str(args, "interval"),
            start_ts: optional_i64(args, "start_ts"),
            end_ts: optional_i64(args, "end_ts"),
            fidelity: optional_u64(args, "fidelity"),
        };
        Ok(ToolOutput::Json(self.0.price_history(&query).await?))
    }
}
