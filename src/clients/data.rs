//! Data API client (read-only)
//!
//! Positions, trade history, activity logs, and open interest. The
//! wallet-address requirement for user-scoped reads is resolved at the
//! tool layer; this client just forwards what it is given.

use crate::error::Result;
use crate::http::Fetcher;
use serde_json::Value;

/// Filters for `/positions`.
#[derive(Debug, Clone, Default)]
pub struct PositionsQuery {
    /// Wallet address the positions belong to.
    pub user: String,
    /// Condition ID filter.
    pub market: Option<String>,
    pub event_id: Option<String>,
    /// Minimum position size to include.
    pub size_threshold: Option<f64>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl PositionsQuery {
    pub fn to_params(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("user", Some(self.user.clone())),
            ("market", self.market.clone()),
            ("event", self.event_id.clone()),
            ("sizeThreshold", self.size_threshold.map(|v| v.to_string())),
            ("limit", self.limit.map(|v| v.to_string())),
            ("offset", self.offset.map(|v| v.to_string())),
        ]
    }
}

/// Filters for `/trades`.
#[derive(Debug, Clone, Default)]
pub struct TradesQuery {
    pub user: Option<String>,
    pub market: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl TradesQuery {
    pub fn to_params(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("user", self.user.clone()),
            ("market", self.market.clone()),
            ("limit", self.limit.map(|v| v.to_string())),
            ("offset", self.offset.map(|v| v.to_string())),
        ]
    }
}

/// Filters for `/activity`. The activity type (TRADE, SPLIT, MERGE,
/// REDEEM, REWARD, CONVERSION) is forwarded without local validation.
#[derive(Debug, Clone, Default)]
pub struct ActivityQuery {
    pub user: String,
    pub market: Option<String>,
    pub activity_type: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ActivityQuery {
    pub fn to_params(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("user", Some(self.user.clone())),
            ("market", self.market.clone()),
            ("type", self.activity_type.clone()),
            ("limit", self.limit.map(|v| v.to_string())),
            ("offset", self.offset.map(|v| v.to_string())),
        ]
    }
}

#[derive(Clone)]
pub struct DataClient {
    fetcher: Fetcher,
}

impl DataClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            fetcher: Fetcher::new(base_url),
        }
    }

    /// Open interest for one market, or the global aggregate when no
    /// condition ID is given.
    pub async fn open_interest(&self, condition_id: Option<String>) -> Result<Value> {
        self.fetcher
            .get_json("/oi", &[("market", condition_id)])
            .await
    }

    pub async fn positions(&self, query: &PositionsQuery) -> Result<Value> {
        self.fetcher
            .get_json("/positions", &query.to_params())
            .await
    }

    pub async fn trades(&self, query: &TradesQuery) -> Result<Value> {
        self.fetcher.get_json("/trades", &query.to_params()).await
    }

    pub async fn activity(&self, query: &ActivityQuery) -> Result<Value> {
        self.fetcher.get_json("/activity", &query.to_params()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn positions_params_rename_fields() {
        let query = PositionsQuery {
            user: "0xabc".to_string(),
            event_id: Some("512".to_string()),
            size_threshold: Some(1.5),
            ..Default::default()
        };
        let params = query.to_params();
        assert!(params.contains(&("event", Some("512".to_string()))));
        assert!(params.contains(&("sizeThreshold", Some("1.5".to_string()))));
        assert!(params.contains(&("market", None)));
    }

    #[tokio::test]
    async fn open_interest_scopes_by_market() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/oi")
            .match_query(Matcher::UrlEncoded("market".into(), "0xcond".into()))
            .with_status(200)
            .with_body(r#"{"oi":"12000"}"#)
            .create_async()
            .await;

        let client = DataClient::new(&server.url());
        client
            .open_interest(Some("0xcond".to_string()))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn activity_forwards_type_unvalidated() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/activity")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("user".into(), "0xabc".into()),
                Matcher::UrlEncoded("type".into(), "REDEEM".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = DataClient::new(&server.url());
        client
            .activity(&ActivityQuery {
                user: "0xabc".to_string(),
                activity_type: Some("REDEEM".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
