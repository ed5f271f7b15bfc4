//! Configuration for the Polymarket MCP server
//!
//! Everything comes from the environment (optionally via a `.env` file).
//! Construction never requires credentials: read-only tools must work
//! without a private key, and the authenticated client only demands one
//! lazily on its first call.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

pub const CLOB_URL_ENV: &str = "POLYMARKET_CLOB_URL";
pub const GAMMA_URL_ENV: &str = "POLYMARKET_GAMMA_URL";
pub const DATA_URL_ENV: &str = "POLYMARKET_DATA_URL";
pub const PRIVATE_KEY_ENV: &str = "POLYMARKET_PRIVATE_KEY";
pub const API_KEY_ENV: &str = "POLYMARKET_API_KEY";
pub const API_SECRET_ENV: &str = "POLYMARKET_API_SECRET";
pub const API_PASSPHRASE_ENV: &str = "POLYMARKET_API_PASSPHRASE";
pub const MAX_ORDER_SIZE_ENV: &str = "POLYMARKET_MAX_ORDER_SIZE";
pub const DRY_RUN_ENV: &str = "POLYMARKET_DRY_RUN";
pub const WALLET_ADDRESS_ENV: &str = "POLYMARKET_WALLET_ADDRESS";

pub const DEFAULT_CLOB_URL: &str = "https://clob.polymarket.com";
pub const DEFAULT_GAMMA_URL: &str = "https://gamma-api.polymarket.com";
pub const DEFAULT_DATA_URL: &str = "https://data-api.polymarket.com";

/// Polygon mainnet, the only chain the CLOB runs on.
pub const POLYGON_CHAIN_ID: u64 = 137;

/// Default cap on `price * size` for a single order, in USDC.
pub const DEFAULT_MAX_ORDER_SIZE: f64 = 100.0;

/// Pre-derived API credential triple. All three values or none; a partial
/// set is treated as absent and the SDK derives credentials instead.
#[derive(Clone)]
pub struct ApiCredentials {
    pub key: String,
    pub secret: SecretString,
    pub passphrase: SecretString,
}

impl ApiCredentials {
    /// Build the triple from its parts. A partial set yields `None` so
    /// the signing library falls back to deriving credentials.
    pub fn from_parts(
        key: Option<String>,
        secret: Option<String>,
        passphrase: Option<String>,
    ) -> Option<Self> {
        match (key, secret, passphrase) {
            (Some(key), Some(secret), Some(passphrase)) => Some(Self {
                key,
                secret: SecretString::from(secret),
                passphrase: SecretString::from(passphrase),
            }),
            _ => None,
        }
    }
}

/// Main configuration
#[derive(Clone)]
pub struct Config {
    pub clob_url: String,
    pub gamma_url: String,
    pub data_url: String,
    pub private_key: Option<SecretString>,
    pub api_credentials: Option<ApiCredentials>,
    /// Maximum `price * size` allowed for a single order (USDC).
    pub max_order_size: f64,
    /// When set, write operations echo what they would do and never
    /// reach the network.
    pub dry_run: bool,
    /// Wallet address for user-scoped Data API reads.
    pub wallet_address: Option<String>,
    pub chain_id: u64,
}

impl Config {
    /// Load configuration from the environment. Never fails: missing
    /// values fall back to defaults, and credentials stay optional.
    pub fn from_env() -> Self {
        let private_key = std::env::var(PRIVATE_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .map(SecretString::from);

        let api_credentials = ApiCredentials::from_parts(
            std::env::var(API_KEY_ENV).ok().filter(|v| !v.is_empty()),
            std::env::var(API_SECRET_ENV).ok().filter(|v| !v.is_empty()),
            std::env::var(API_PASSPHRASE_ENV).ok().filter(|v| !v.is_empty()),
        );

        let max_order_size = std::env::var(MAX_ORDER_SIZE_ENV)
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_MAX_ORDER_SIZE);

        let dry_run = std::env::var(DRY_RUN_ENV)
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        Self {
            clob_url: env_or(CLOB_URL_ENV, DEFAULT_CLOB_URL),
            gamma_url: env_or(GAMMA_URL_ENV, DEFAULT_GAMMA_URL),
            data_url: env_or(DATA_URL_ENV, DEFAULT_DATA_URL),
            private_key,
            api_credentials,
            max_order_size,
            dry_run,
            wallet_address: std::env::var(WALLET_ADDRESS_ENV)
                .ok()
                .filter(|v| !v.is_empty()),
            chain_id: POLYGON_CHAIN_ID,
        }
    }

    /// Expose the raw private key for signer construction.
    pub fn private_key(&self) -> Option<&str> {
        self.private_key.as_ref().map(|k| k.expose_secret())
    }

    /// Redacted view for the `config` CLI subcommand and logs.
    pub fn redacted(&self) -> RedactedConfig {
        RedactedConfig {
            clob_url: self.clob_url.clone(),
            gamma_url: self.gamma_url.clone(),
            data_url: self.data_url.clone(),
            private_key: self.private_key.is_some().then_some("***"),
            api_credentials: self.api_credentials.is_some().then_some("***"),
            max_order_size: self.max_order_size,
            dry_run: self.dry_run,
            wallet_address: self.wallet_address.clone(),
            chain_id: self.chain_id,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clob_url: DEFAULT_CLOB_URL.to_string(),
            gamma_url: DEFAULT_GAMMA_URL.to_string(),
            data_url: DEFAULT_DATA_URL.to_string(),
            private_key: None,
            api_credentials: None,
            max_order_size: DEFAULT_MAX_ORDER_SIZE,
            dry_run: false,
            wallet_address: None,
            chain_id: POLYGON_CHAIN_ID,
        }
    }
}

/// Secret-free projection of [`Config`].
#[derive(Debug, Serialize)]
pub struct RedactedConfig {
    pub clob_url: String,
    pub gamma_url: String,
    pub data_url: String,
    pub private_key: Option<&'static str>,
    pub api_credentials: Option<&'static str>,
    pub max_order_size: f64,
    pub dry_run: bool,
    pub wallet_address: Option<String>,
    pub chain_id: u64,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
