//! Authenticated order-management client
//!
//! Wraps the Polymarket SDK for order construction, signing, and
//! submission. Construction is cheap and never requires credentials;
//! the authenticated SDK client is created lazily on the first call
//! that needs it, at most once across concurrent callers.
//!
//! Every write passes through the safety guard first: the value cap
//! (`price * size <= max_order_size`) and the dry-run short-circuit
//! both run before any credential lookup or network activity.

use crate::config::{Config, PRIVATE_KEY_ENV};
use crate::error::{Error, Result};
use polymarket_client_sdk::auth::state::Authenticated;
use polymarket_client_sdk::auth::{LocalSigner, Normal, Signer};
use polymarket_client_sdk::clob::types::request::{BalanceAllowanceRequest, OrdersRequest};
use polymarket_client_sdk::clob::types::{AssetType, OrderType, Side};
use polymarket_client_sdk::clob::{Client, Config as ClobConfig};
use polymarket_client_sdk::types::{Decimal, U256};
use polymarket_client_sdk::POLYGON;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::future::Future;
use std::str::FromStr;
use tokio::sync::OnceCell;

type AuthenticatedClient = Client<Authenticated<Normal>>;

/// At-most-once async initialization shared across concurrent callers.
/// Racers wait for the in-flight attempt instead of starting their own;
/// a failed attempt leaves the cell empty so the next caller retries.
struct SharedInit<T> {
    cell: OnceCell<T>,
}

impl<T> SharedInit<T> {
    fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    async fn get_or_try_init<F, Fut>(&self, init: F) -> Result<&T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.cell.get_or_try_init(init).await
    }
}

/// Arguments for a single order placement.
#[derive(Debug, Clone)]
pub struct OrderArgs {
    pub token_id: String,
    /// Limit price in [0, 1].
    pub price: f64,
    /// Number of shares.
    pub size: f64,
    /// "BUY" or "SELL".
    pub side: String,
    /// GTC, FOK, GTD, or FAK.
    pub order_type: String,
    /// Accepted for caller convenience; the SDK resolves the live value.
    pub tick_size: String,
    /// Accepted for caller convenience; the SDK resolves the live value.
    pub neg_risk: bool,
}

pub struct TradingClient {
    config: Config,
    client: SharedInit<AuthenticatedClient>,
}

impl TradingClient {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: SharedInit::new(),
        }
    }

    pub fn dry_run(&self) -> bool {
        self.config.dry_run
    }

    /// Lazily authenticate against the CLOB, at most once across
    /// concurrent first calls.
    async fn client(&self) -> Result<&AuthenticatedClient> {
        self.client
            .get_or_try_init(|| self.authenticate())
            .await
    }

    async fn authenticate(&self) -> Result<AuthenticatedClient> {
        if self.config.api_credentials.is_some() {
            tracing::warn!(
                "Pre-derived API credentials are configured but the signing library derives \
                 its own from the private key; the supplied triple is not forwarded"
            );
        }

        let signer = self.signer()?;

        let client = Client::new(&self.config.clob_url, ClobConfig::default())
            .map_err(|e| Error::Sdk(format!("Failed to create CLOB client: {e}")))?
            .authentication_builder(&signer)
            .authenticate()
            .await
            .map_err(|e| Error::Sdk(format!("Authentication failed: {e}")))?;

        tracing::info!("Authenticated; API credentials derived from private key");

        Ok(client)
    }

    fn signer(&self) -> Result<impl Signer> {
        let key = self.config.private_key().ok_or_else(|| {
            Error::Config(format!(
                "{PRIVATE_KEY_ENV} not set. Cannot use authenticated endpoints."
            ))
        })?;
        let key = key.strip_prefix("0x").unwrap_or(key);

        LocalSigner::from_str(key)
            .map(|s| s.with_chain_id(Some(POLYGON)))
            .map_err(|e| Error::Config(format!("Invalid private key: {e}")))
    }

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    /// Create and submit a single order. The value cap and dry-run check
    /// run before the signer exists, so neither path needs credentials.
    pub async fn place_order(&self, args: &OrderArgs) -> Result<Value> {
        let order_value = args.price * args.size;
        if order_value > self.config.max_order_size {
            return Err(Error::OrderTooLarge {
                value: order_value,
                max: self.config.max_order_size,
            });
        }

        if self.config.dry_run {
            return Ok(json!({
                "dry_run": true,
                "would_place": {
                    "token_id": args.token_id,
                    "price": args.price,
                    "size": args.size,
                    "side": args.side,
                    "order_type": args.order_type,
                    "order_value": order_value,
                },
            }));
        }

        let token_id = U256::from_str(&args.token_id)
            .map_err(|e| Error::InvalidArgument(format!("Invalid token_id: {e}")))?;
        let side = parse_side(&args.side)?;
        let order_type = parse_order_type(&args.order_type)?;
        let price = Decimal::try_from(args.price)
            .map_err(|e| Error::InvalidArgument(format!("Invalid price: {e}")))?;
        let size = Decimal::try_from(args.size)
            .map_err(|e| Error::InvalidArgument(format!("Invalid size: {e}")))?;

        let client = self.client().await?;
        let signer = self.signer()?;

        let order = client
            .limit_order()
            .token_id(token_id)
            .price(price)
            .size(size)
            .side(side)
            .order_type(order_type)
            .build()
            .await
            .map_err(|e| Error::Sdk(format!("Failed to build order: {e}")))?;

        let signed = client
            .sign(&signer, order)
            .await
            .map_err(|e| Error::Sdk(format!("Failed to sign order: {e}")))?;

        tracing::info!(
            side = %args.side,
            size = args.size,
            price = args.price,
            token_id = %args.token_id,
            "Placing order"
        );

        let response = client
            .post_order(signed)
            .await
            .map_err(|e| Error::Sdk(format!("Failed to submit order: {e}")))?;

        // SDK 0.4.4 does not implement Serialize for PostOrderResponse,
        // so the verbatim pass-through enumerates every field by hand.
        venue_confirmation(&json!({
            "error_msg": response.error_msg,
            "making_amount": response.making_amount,
            "taking_amount": response.taking_amount,
            "order_id": response.order_id,
            "status": response.status,
            "success": response.success,
            "transaction_hashes": response.transaction_hashes,
            "trade_ids": response.trade_ids,
        }))
    }

    pub async fn cancel_order(&self, order_id: &str) -> Result<Value> {
        if self.config.dry_run {
            return Ok(json!({"dry_run": true, "would_cancel": order_id}));
        }

        let client = self.client().await?;
        tracing::info!(order_id, "Cancelling order");

        let response = client
            .cancel_order(order_id)
            .await
            .map_err(|e| Error::Sdk(format!("Failed to cancel order: {e}")))?;

        // SDK 0.4.4 does not implement Serialize for CancelOrdersResponse,
        // so the verbatim pass-through enumerates every field by hand.
        venue_confirmation(&json!({
            "canceled": response.canceled,
            "not_canceled": response.not_canceled,
        }))
    }

    /// Cancel ALL open orders (emergency kill switch).
    pub async fn cancel_all_orders(&self) -> Result<Value> {
        if self.config.dry_run {
            tracing::warn!("CANCEL ALL ORDERS triggered (dry run)");
            return Ok(json!({"dry_run": true, "would_cancel": "ALL"}));
        }

        let client = self.client().await?;
        tracing::warn!("CANCEL ALL ORDERS triggered");

        let response = client
            .cancel_all_orders()
            .await
            .map_err(|e| Error::Sdk(format!("Failed to cancel all orders: {e}")))?;

        venue_confirmation(&json!({
            "canceled": response.canceled,
            "not_canceled": response.not_canceled,
        }))
    }

    pub async fn cancel_orders(&self, order_ids: &[String]) -> Result<Value> {
        if self.config.dry_run {
            return Ok(json!({"dry_run": true, "would_cancel": order_ids}));
        }

        let client = self.client().await?;
        tracing::info!(count = order_ids.len(), "Cancelling orders");

        let mut canceled = Vec::new();
        let mut not_canceled = Map::new();
        for order_id in order_ids {
            let response = client
                .cancel_order(order_id)
                .await
                .map_err(|e| Error::Sdk(format!("Failed to cancel order {order_id}: {e}")))?;
            if let Value::Array(items) = serde_json::to_value(&response.canceled)? {
                canceled.extend(items);
            }
            if let Value::Object(entries) = serde_json::to_value(&response.not_canceled)? {
                not_canceled.extend(entries);
            }
        }

        Ok(json!({"canceled": canceled, "not_canceled": not_canceled}))
    }

    // ------------------------------------------------------------------
    // Authenticated reads (never dry-run gated; they spend nothing)
    // ------------------------------------------------------------------

    pub async fn order(&self, order_id: &str) -> Result<Value> {
        let client = self.client().await?;

        let order = client
            .order(order_id)
            .await
            .map_err(|e| Error::Sdk(format!("Failed to get order: {e}")))?;

        Ok(order_to_json(&order))
    }

    /// Open orders, optionally narrowed to one market or one outcome
    /// token. Filtering happens on the returned set.
    pub async fn open_orders(
        &self,
        market: Option<String>,
        asset_id: Option<String>,
    ) -> Result<Value> {
        let client = self.client().await?;

        let response = client
            .orders(&OrdersRequest::default(), None)
            .await
            .map_err(|e| Error::Sdk(format!("Failed to get open orders: {e}")))?;

        let orders: Vec<Value> = response
            .data
            .iter()
            .filter(|o| market.as_deref().is_none_or(|m| o.market.to_string() == m))
            .filter(|o| asset_id.as_deref().is_none_or(|a| o.asset_id.to_string() == a))
            .map(order_to_json)
            .collect();

        Ok(json!({"count": orders.len(), "orders": orders}))
    }

    /// USDC balance and approval status. COLLATERAL ignores the token
    /// ID; CONDITIONAL needs one, and that requirement is enforced by
    /// the venue, not here.
    pub async fn balance_allowance(
        &self,
        asset_type: &str,
        token_id: Option<String>,
    ) -> Result<Value> {
        let asset_type = match asset_type.to_uppercase().as_str() {
            "COLLATERAL" => AssetType::Collateral,
            "CONDITIONAL" => AssetType::Conditional,
            other => {
                return Err(Error::InvalidArgument(format!(
                    "asset_type must be COLLATERAL or CONDITIONAL, got '{other}'"
                )))
            }
        };

        let client = self.client().await?;

        let request = match token_id {
            Some(token_id) => {
                let token_id = U256::from_str(&token_id)
                    .map_err(|e| Error::InvalidArgument(format!("Invalid token_id: {e}")))?;
                BalanceAllowanceRequest::builder()
                    .asset_type(asset_type)
                    .token_id(token_id)
                    .build()
            }
            None => BalanceAllowanceRequest::builder()
                .asset_type(asset_type)
                .build(),
        };

        let response = client
            .balance_allowance(request)
            .await
            .map_err(|e| Error::Sdk(format!("Failed to get balance: {e}")))?;

        let allowances: Map<String, Value> = response
            .allowances
            .iter()
            .map(|(addr, val)| (format!("{addr:?}"), json!(val)))
            .collect();

        Ok(json!({
            "balance": response.balance.to_string(),
            "allowances": allowances,
        }))
    }
}

/// The venue's confirmation object, passed through verbatim. Fields this
/// layer never looks at (error messages, matched amounts) survive the
/// trip to the caller.
fn venue_confirmation<T: Serialize>(response: &T) -> Result<Value> {
    serde_json::to_value(response).map_err(Error::from)
}

fn parse_side(side: &str) -> Result<Side> {
    match side.to_uppercase().as_str() {
        "BUY" => Ok(Side::Buy),
        "SELL" => Ok(Side::Sell),
        other => Err(Error::InvalidArgument(format!(
            "side must be BUY or SELL, got '{other}'"
        ))),
    }
}

fn parse_order_type(order_type: &str) -> Result<OrderType> {
    match order_type.to_uppercase().as_str() {
        "GTC" => Ok(OrderType::GTC),
        "FOK" => Ok(OrderType::FOK),
        "GTD" => Ok(OrderType::GTD),
        "FAK" => Ok(OrderType::FAK),
        other => Err(Error::InvalidArgument(format!(
            "order_type must be GTC, FOK, GTD, or FAK, got '{other}'"
        ))),
    }
}

fn order_to_json(order: &polymarket_client_sdk::clob::types::response::OpenOrderResponse) -> Value {
    json!({
        "order_id": order.id,
        "status": format!("{:?}", order.status),
        "owner": order.owner.to_string(),
        "market": order.market,
        "token_id": order.asset_id,
        "side": format!("{:?}", order.side),
        "original_size": order.original_size.to_string(),
        "size_matched": order.size_matched.to_string(),
        "price": order.price.to_string(),
        "outcome": order.outcome,
        "order_type": format!("{:?}", order.order_type),
        "created_at": order.created_at.to_rfc3339(),
        "expiration": order.expiration.to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_args(price: f64, size: f64) -> OrderArgs {
        OrderArgs {
            token_id: "71321045679252212594626385532706912750332728571942532289631379312455583992563"
                .to_string(),
            price,
            size,
            side: "BUY".to_string(),
            order_type: "GTC".to_string(),
            tick_size: "0.01".to_string(),
            neg_risk: false,
        }
    }

    // No private key in any of these configs: if a test path ever
    // reached credential init or the network it would fail with a
    // Config error instead of the asserted outcome.

    #[tokio::test]
    async fn value_cap_rejects_before_any_network_call() {
        let client = TradingClient::new(Config::default());
        let err = client.place_order(&order_args(0.5, 300.0)).await.unwrap_err();
        match err {
            Error::OrderTooLarge { value, max } => {
                assert_eq!(value, 150.0);
                assert_eq!(max, 100.0);
            }
            other => panic!("expected OrderTooLarge, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dry_run_echoes_without_touching_signer() {
        let client = TradingClient::new(Config {
            dry_run: true,
            ..Config::default()
        });
        let result = client.place_order(&order_args(0.1, 5.0)).await.unwrap();
        assert_eq!(result["dry_run"], true);
        assert_eq!(result["would_place"]["order_value"], 0.5);
        assert_eq!(result["would_place"]["side"], "BUY");
        assert_eq!(result["would_place"]["order_type"], "GTC");
    }

    #[tokio::test]
    async fn cap_check_runs_before_dry_run_echo() {
        let client = TradingClient::new(Config {
            dry_run: true,
            ..Config::default()
        });
        let err = client.place_order(&order_args(0.9, 200.0)).await.unwrap_err();
        assert!(matches!(err, Error::OrderTooLarge { .. }));
    }

    #[tokio::test]
    async fn cancel_order_dry_run_echoes_id() {
        let client = TradingClient::new(Config {
            dry_run: true,
            ..Config::default()
        });
        let result = client.cancel_order("0xorder").await.unwrap();
        assert_eq!(result, json!({"dry_run": true, "would_cancel": "0xorder"}));
    }

    #[tokio::test]
    async fn cancel_all_dry_run_echoes_all() {
        let client = TradingClient::new(Config {
            dry_run: true,
            ..Config::default()
        });
        let result = client.cancel_all_orders().await.unwrap();
        assert_eq!(result["would_cancel"], "ALL");
    }

    #[tokio::test]
    async fn cancel_orders_dry_run_echoes_list() {
        let client = TradingClient::new(Config {
            dry_run: true,
            ..Config::default()
        });
        let ids = vec!["a".to_string(), "b".to_string()];
        let result = client.cancel_orders(&ids).await.unwrap();
        assert_eq!(result["would_cancel"], json!(["a", "b"]));
    }

    #[tokio::test]
    async fn authenticated_read_without_key_is_config_error() {
        let client = TradingClient::new(Config::default());
        let err = client.order("0xorder").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn order_type_parsing_covers_all_venue_types() {
        assert!(parse_order_type("gtc").is_ok());
        assert!(parse_order_type("FOK").is_ok());
        assert!(parse_order_type("GTD").is_ok());
        assert!(parse_order_type("FAK").is_ok());
        assert!(parse_order_type("IOC").is_err());
    }

    #[test]
    fn side_parsing_rejects_unknown() {
        assert!(parse_side("buy").is_ok());
        assert!(parse_side("SELL").is_ok());
        assert!(parse_side("HOLD").is_err());
    }

    #[test]
    fn venue_confirmation_keeps_every_field() {
        #[derive(Serialize)]
        struct Confirmation {
            order_id: String,
            success: bool,
            error_msg: String,
            status: String,
        }
        let value = venue_confirmation(&Confirmation {
            order_id: "0xabc".to_string(),
            success: true,
            error_msg: String::new(),
            status: "live".to_string(),
        })
        .unwrap();
        assert_eq!(value["order_id"], "0xabc");
        assert_eq!(value["success"], true);
        assert_eq!(value["status"], "live");
        assert_eq!(value["error_msg"], "");
    }

    #[tokio::test]
    async fn concurrent_first_calls_initialize_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let attempts = Arc::new(AtomicUsize::new(0));
        let shared = Arc::new(SharedInit::new());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let shared = Arc::clone(&shared);
            let attempts = Arc::clone(&attempts);
            handles.push(tokio::spawn(async move {
                *shared
                    .get_or_try_init(|| async {
                        attempts.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                        Ok(42u64)
                    })
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 42);
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_initialization_is_retried() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let attempts = AtomicUsize::new(0);
        let shared = SharedInit::new();

        let first = shared
            .get_or_try_init(|| async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<u64, Error>(Error::Config("no key".to_string()))
            })
            .await;
        assert!(first.is_err());

        let second = shared
            .get_or_try_init(|| async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Ok(7u64)
            })
            .await
            .unwrap();
        assert_eq!(*second, 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
