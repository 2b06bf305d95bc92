use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::models::Network;
use crate::Result;

pub const DEFAULT_TOKEN_API_URL: &str = "https://recursive.so/api/tokens";
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    pub api_url: String,
    pub page_size: u32,
    /// Drop the previous list when a re-fetch fails instead of keeping it.
    pub clear_on_error: bool,
    pub fetch_retries: u32,
    pub initial_backoff_ms: Option<u64>,
    /// Artificial latency of the offline token set.
    pub demo_delay_ms: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_TOKEN_API_URL.to_string(),
            page_size: 20,
            clear_on_error: false,
            fetch_retries: 2,
            initial_backoff_ms: Some(500),
            demo_delay_ms: Some(1_000),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SwipeConfig {
    /// Share of the viewport width a drag must cross to commit.
    pub threshold_fraction: f64,
    /// USDC spent per buy swipe.
    pub amount: Decimal,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            threshold_fraction: 0.25,
            amount: dec!(5),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub network: Network,
    pub rpc_url: String,
    pub catalog: CatalogConfig,
    pub swipe: SwipeConfig,
}

impl SessionConfig {
    /// Defaults, overlaid by the optional file at `path` (toml, yaml or
    /// json) and then by `SWIPE__...` environment variables, e.g.
    /// `SWIPE__CATALOG__PAGE_SIZE=10`.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("SWIPE").separator("__"))
            .build()?;

        settings.try_deserialize().map_err(Into::into)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            catalog: CatalogConfig::default(),
            swipe: SwipeConfig::default(),
        }
    }
}
