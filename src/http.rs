//! Shared HTTP fetch facade
//!
//! One [`Fetcher`] per backend service. The underlying reqwest client is
//! built once with a fixed timeout and an `Accept: application/json`
//! default header, then reused for every call. Query parameters whose
//! value is absent are dropped before the request is built, so the remote
//! API never sees a null or empty-valued key. Any non-2xx response becomes
//! [`Error::Http`] carrying the status and the raw body.

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Query parameter list with optional values; `None` entries are omitted.
pub type Params<'a> = &'a [(&'a str, Option<String>)];

#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    base_url: String,
}

impl Fetcher {
    pub fn new(base_url: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// GET `path`, keeping only the query parameters that have a value.
    pub async fn get_json(&self, path: &str, params: Params<'_>) -> Result<Value> {
        let present: Vec<(&str, &str)> = params
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (*k, v)))
            .collect();

        let response = self
            .client
            .get(self.url(path))
            .query(&present)
            .send()
            .await?;
        Self::check_status(response).await?.json().await.map_err(Error::from)
    }

    /// GET `path` and return the raw body without JSON decoding. Used by
    /// endpoints that answer with a bare string (health check, server time).
    pub async fn get_text(&self, path: &str) -> Result<String> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::check_status(response).await?.text().await.map_err(Error::from)
    }

    /// POST a JSON body to `path`.
    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::check_status(response).await?.json().await.map_err(Error::from)
    }

    fn url(&self, path: &str) -> String {
        if path == "/" {
            format!("{}/", self.base_url)
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::Http {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn absent_params_are_dropped() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/markets")
            .match_query(Matcher::UrlEncoded("limit".into(), "5".into()))
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let fetcher = Fetcher::new(&server.url());
        let value = fetcher
            .get_json(
                "/markets",
                &[("limit", Some("5".to_string())), ("slug", None)],
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn non_success_becomes_http_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/book")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let fetcher = Fetcher::new(&server.url());
        let err = fetcher.get_json("/book", &[]).await.unwrap_err();

        match err {
            Error::Http { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "not found");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_text_returns_raw_body() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/time")
            .with_status(200)
            .with_body("1700000000")
            .create_async()
            .await;

        let fetcher = Fetcher::new(&server.url());
        let body = fetcher.get_text("/time").await.unwrap();
        assert_eq!(body, "1700000000");
    }

    #[tokio::test]
    async fn post_json_sends_body_verbatim() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/books")
            .match_body(Matcher::Json(json!([{"token_id": "1"}, {"token_id": "2"}])))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let fetcher = Fetcher::new(&server.url());
        let body = json!([{"token_id": "1"}, {"token_id": "2"}]);
        fetcher.post_json("/books", &body).await.unwrap();
        mock.assert_async().await;
    }
}
