//! CLOB market-data client (read-only)
//!
//! One method per remote endpoint. Responses are passed through as opaque
//! JSON; this layer never reshapes what the venue returns. Batch methods
//! post `[{"token_id": ...}, ...]` bodies and rely on the venue answering
//! in the same order, which callers depend on to correlate by position.

use crate::error::{Error, Result};
use crate::http::Fetcher;
use serde_json::{json, Value};

/// Default pagination cursor: base64 of "0".
pub const INITIAL_CURSOR: &str = "MA==";

const INTERVALS: &[&str] = &["1h", "6h", "1d", "1w", "1m", "max"];

/// Query for `/prices-history`. A named interval and an explicit
/// timestamp range are mutually exclusive; supplying both is rejected
/// before any request is made.
#[derive(Debug, Clone, Default)]
pub struct PriceHistoryQuery {
    pub token_id: String,
    pub interval: Option<String>,
    pub start_ts: Option<i64>,
    pub end_ts: Option<i64>,
    /// Resolution of the returned series, in minutes.
    pub fidelity: Option<u64>,
}

impl PriceHistoryQuery {
    pub fn validate(&self) -> Result<()> {
        if let Some(interval) = &self.interval {
            if !INTERVALS.contains(&interval.as_str()) {
                return Err(Error::InvalidArgument(format!(
                    "interval must be one of {INTERVALS:?}, got '{interval}'"
                )));
            }
            if self.start_ts.is_some() || self.end_ts.is_some() {
                return Err(Error::InvalidArgument(
                    "interval and start_ts/end_ts are mutually exclusive".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct ClobClient {
    fetcher: Fetcher,
}

impl ClobClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            fetcher: Fetcher::new(base_url),
        }
    }

    /// GET `/`. The venue answers with a bare string, returned verbatim.
    pub async fn health_check(&self) -> Result<String> {
        self.fetcher.get_text("/").await
    }

    /// GET `/time`. Unix timestamp as a bare string.
    pub async fn server_time(&self) -> Result<String> {
        self.fetcher.get_text("/time").await
    }

    pub async fn markets(&self, next_cursor: Option<String>) -> Result<Value> {
        self.paginated("/markets", next_cursor).await
    }

    pub async fn simplified_markets(&self, next_cursor: Option<String>) -> Result<Value> {
        self.paginated("/simplified-markets", next_cursor).await
    }

    pub async fn sampling_markets(&self, next_cursor: Option<String>) -> Result<Value> {
        self.paginated("/sampling-markets", next_cursor).await
    }

    pub async fn sampling_simplified_markets(&self, next_cursor: Option<String>) -> Result<Value> {
        self.paginated("/sampling-simplified-markets", next_cursor).await
    }

    pub async fn market(&self, condition_id: &str) -> Result<Value> {
        self.fetcher
            .get_json(&format!("/markets/{condition_id}"), &[])
            .await
    }

    /// Live trade events for one market.
    pub async fn market_trades_events(&self, condition_id: &str) -> Result<Value> {
        self.fetcher
            .get_json(&format!("/live-activity/events/{condition_id}"), &[])
            .await
    }

    pub async fn order_book(&self, token_id: &str) -> Result<Value> {
        self.fetcher
            .get_json("/book", &[("token_id", Some(token_id.to_string()))])
            .await
    }

    pub async fn order_books(&self, token_ids: &[String]) -> Result<Value> {
        self.fetcher
            .post_json("/books", &batch_body(token_ids))
            .await
    }

    /// Best price for one token on one side of the book (BUY or SELL).
    /// The side is forwarded verbatim; the venue validates it.
    pub async fn price(&self, token_id: &str, side: &str) -> Result<Value> {
        self.fetcher
            .get_json(
                "/price",
                &[
                    ("token_id", Some(token_id.to_string())),
                    ("side", Some(side.to_string())),
                ],
            )
            .await
    }

    pub async fn prices(&self, token_ids: &[String], side: &str) -> Result<Value> {
        let body: Vec<Value> = token_ids
            .iter()
            .map(|id| json!({"token_id": id, "side": side}))
            .collect();
        self.fetcher.post_json("/prices", &body).await
    }

    pub async fn midpoint(&self, token_id: &str) -> Result<Value> {
        self.token_query("/midpoint", token_id).await
    }

    pub async fn midpoints(&self, token_ids: &[String]) -> Result<Value> {
        self.fetcher
            .post_json("/midpoints", &batch_body(token_ids))
            .await
    }

    pub async fn spread(&self, token_id: &str) -> Result<Value> {
        self.token_query("/spread", token_id).await
    }

    pub async fn spreads(&self, token_ids: &[String]) -> Result<Value> {
        self.fetcher
            .post_json("/spreads", &batch_body(token_ids))
            .await
    }

    pub async fn last_trade_price(&self, token_id: &str) -> Result<Value> {
        self.token_query("/last-trade-price", token_id).await
    }

    pub async fn last_trades_prices(&self, token_ids: &[String]) -> Result<Value> {
        self.fetcher
            .post_json("/last-trades-prices", &batch_body(token_ids))
            .await
    }

    pub async fn tick_size(&self, token_id: &str) -> Result<Value> {
        self.token_query("/tick-size", token_id).await
    }

    pub async fn neg_risk(&self, token_id: &str) -> Result<Value> {
        self.token_query("/neg-risk", token_id).await
    }

    pub async fn fee_rate(&self, token_id: &str) -> Result<Value> {
        self.token_query("/fee-rate", token_id).await
    }

    pub async fn price_history(&self, query: &PriceHistoryQuery) -> Result<Value> {
        query.validate()?;
        self.fetcher
            .get_json(
                "/prices-history",
                &[
                    ("market", Some(query.token_id.clone())),
                    ("interval", query.interval.clone()),
                    ("startTs", query.start_ts.map(|t| t.to_string())),
                    ("endTs", query.end_ts.map(|t| t.to_string())),
                    ("fidelity", query.fidelity.map(|f| f.to_string())),
                ],
            )
            .await
    }

    async fn paginated(&self, path: &str, next_cursor: Option<String>) -> Result<Value> {
        let cursor = next_cursor.unwrap_or_else(|| INITIAL_CURSOR.to_string());
        self.fetcher
            .get_json(path, &[("next_cursor", Some(cursor))])
            .await
    }

    async fn token_query(&self, path: &str, token_id: &str) -> Result<Value> {
        self.fetcher
            .get_json(path, &[("token_id", Some(token_id.to_string()))])
            .await
    }
}

/// Body for the batch endpoints, one `{"token_id": ...}` entry per input
/// id, in input order.
fn batch_body(token_ids: &[String]) -> Vec<Value> {
    token_ids.iter().map(|id| json!({"token_id": id})).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn batch_body_preserves_input_order() {
        let ids: Vec<String> = vec!["30".into(), "10".into(), "20".into()];
        let body = batch_body(&ids);
        assert_eq!(body.len(), 3);
        assert_eq!(body[0], json!({"token_id": "30"}));
        assert_eq!(body[1], json!({"token_id": "10"}));
        assert_eq!(body[2], json!({"token_id": "20"}));
    }

    #[test]
    fn price_history_rejects_interval_with_timestamps() {
        let query = PriceHistoryQuery {
            token_id: "123".to_string(),
            interval: Some("1d".to_string()),
            start_ts: Some(1_700_000_000),
            ..Default::default()
        };
        assert!(matches!(
            query.validate(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn price_history_rejects_unknown_interval() {
        let query = PriceHistoryQuery {
            token_id: "123".to_string(),
            interval: Some("2h".to_string()),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn price_history_accepts_timestamp_range_alone() {
        let query = PriceHistoryQuery {
            token_id: "123".to_string(),
            start_ts: Some(1_700_000_000),
            end_ts: Some(1_700_100_000),
            fidelity: Some(60),
            ..Default::default()
        };
        assert!(query.validate().is_ok());
    }

    #[tokio::test]
    async fn markets_defaults_to_initial_cursor() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/markets")
            .match_query(Matcher::UrlEncoded("next_cursor".into(), "MA==".into()))
            .with_status(200)
            .with_body(r#"{"data":[],"next_cursor":"LTE="}"#)
            .create_async()
            .await;

        let client = ClobClient::new(&server.url());
        client.markets(None).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn price_sends_side_verbatim() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/price")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("token_id".into(), "42".into()),
                Matcher::UrlEncoded("side".into(), "BUY".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"price":"0.52"}"#)
            .create_async()
            .await;

        let client = ClobClient::new(&server.url());
        let value = client.price("42", "BUY").await.unwrap();
        mock.assert_async().await;
        assert_eq!(value["price"], "0.52");
    }

    #[tokio::test]
    async fn health_check_passes_raw_string_through() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(200)
            .with_body("OK")
            .create_async()
            .await;

        let client = ClobClient::new(&server.url());
        assert_eq!(client.health_check().await.unwrap(), "OK");
    }

    #[tokio::test]
    async fn order_books_posts_batch_in_order() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/books")
            .match_body(Matcher::Json(json!([
                {"token_id": "2"},
                {"token_id": "1"}
            ])))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = ClobClient::new(&server.url());
        client
            .order_books(&["2".to_string(), "1".to_string()])
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
