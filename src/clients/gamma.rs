//! Gamma discovery client (read-only)
//!
//! Event and market search with optional filter bags. Each filter struct
//! has named `Option` fields and a `to_params` that only emits the
//! present pairs, so the Gamma API never sees a null-valued key.

use crate::error::Result;
use crate::http::Fetcher;
use serde_json::Value;

/// Filters for `/events`.
#[derive(Debug, Clone, Default)]
pub struct EventsQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Field to order by, e.g. "volume" or "created_at".
    pub order: Option<String>,
    pub ascending: Option<bool>,
    pub slug: Option<String>,
    pub tag: Option<String>,
    pub active: Option<bool>,
    pub closed: Option<bool>,
    pub id: Option<String>,
}

impl EventsQuery {
    pub fn to_params(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("limit", self.limit.map(|v| v.to_string())),
            ("offset", self.offset.map(|v| v.to_string())),
            ("order", self.order.clone()),
            ("ascending", self.ascending.map(|v| v.to_string())),
            ("slug", self.slug.clone()),
            ("tag", self.tag.clone()),
            ("active", self.active.map(|v| v.to_string())),
            ("closed", self.closed.map(|v| v.to_string())),
            ("id", self.id.clone()),
        ]
    }
}

/// Filters for `/markets`.
#[derive(Debug, Clone, Default)]
pub struct MarketsQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub order: Option<String>,
    pub ascending: Option<bool>,
    pub slug: Option<String>,
    pub tag: Option<String>,
    pub active: Option<bool>,
    pub closed: Option<bool>,
    /// Gamma market ID.
    pub id: Option<String>,
    pub clob_token_ids: Option<String>,
    pub condition_id: Option<String>,
}

impl MarketsQuery {
    pub fn to_params(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("limit", self.limit.map(|v| v.to_string())),
            ("offset", self.offset.map(|v| v.to_string())),
            ("order", self.order.clone()),
            ("ascending", self.ascending.map(|v| v.to_string())),
            ("slug", self.slug.clone()),
            ("tag", self.tag.clone()),
            ("active", self.active.map(|v| v.to_string())),
            ("closed", self.closed.map(|v| v.to_string())),
            ("id", self.id.clone()),
            ("clob_token_ids", self.clob_token_ids.clone()),
            ("condition_id", self.condition_id.clone()),
        ]
    }
}

#[derive(Clone)]
pub struct GammaClient {
    fetcher: Fetcher,
}

impl GammaClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            fetcher: Fetcher::new(base_url),
        }
    }

    pub async fn events(&self, query: &EventsQuery) -> Result<Value> {
        self.fetcher.get_json("/events", &query.to_params()).await
    }

    /// Detailed info for a single event, including its markets.
    pub async fn event(&self, event_id: &str) -> Result<Value> {
        self.fetcher
            .get_json(&format!("/events/{event_id}"), &[])
            .await
    }

    pub async fn markets(&self, query: &MarketsQuery) -> Result<Value> {
        self.fetcher.get_json("/markets", &query.to_params()).await
    }

    /// Single market by Gamma ID or slug. The API returns an object for
    /// an ID and a list for a slug; the shape is passed through as-is.
    pub async fn market(&self, id_or_slug: &str) -> Result<Value> {
        self.fetcher
            .get_json(&format!("/markets/{id_or_slug}"), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn empty_query_emits_no_params() {
        let query = EventsQuery::default();
        assert!(query.to_params().iter().all(|(_, v)| v.is_none()));
    }

    #[test]
    fn set_fields_serialize_as_strings() {
        let query = MarketsQuery {
            limit: Some(20),
            ascending: Some(false),
            slug: Some("us-election".to_string()),
            ..Default::default()
        };
        let params = query.to_params();
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .and_then(|(_, v)| v.clone())
        };
        assert_eq!(get("limit").as_deref(), Some("20"));
        assert_eq!(get("ascending").as_deref(), Some("false"));
        assert_eq!(get("slug").as_deref(), Some("us-election"));
        assert_eq!(get("condition_id"), None);
    }

    #[tokio::test]
    async fn events_sends_only_present_filters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/events")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "5".into()),
                Matcher::UrlEncoded("active".into(), "true".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = GammaClient::new(&server.url());
        client
            .events(&EventsQuery {
                limit: Some(5),
                active: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn market_detail_hits_path_segment() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/markets/will-it-rain")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = GammaClient::new(&server.url());
        client.market("will-it-rain").await.unwrap();
        mock.assert_async().await;
    }
}
