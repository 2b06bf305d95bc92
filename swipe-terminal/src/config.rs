use clap::Parser;
use dotenv::dotenv;
use rust_decimal::Decimal;
use swipe_core::config::SessionConfig;
use swipe_core::models::Network;
use swipe_core::swipe::{MAX_THRESHOLD_FRACTION, MIN_THRESHOLD_FRACTION};

/// Flags override the config file, which overrides the built-in defaults.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Config file (toml, yaml or json)
    #[arg(short, long, env = "SWIPE_CONFIG")]
    pub config: Option<String>,

    /// RPC URL for Solana connection
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Keypair file path; without one a throwaway demo wallet is created
    #[arg(short, long, env = "KEYPAIR_PATH")]
    pub keypair_path: Option<String>,

    /// Cluster: mainnet-beta, devnet or testnet
    #[arg(short, long, env = "SWIPE_NETWORK")]
    pub network: Option<Network>,

    /// Token list endpoint used on mainnet
    #[arg(long, env = "TOKEN_API_URL")]
    pub api_url: Option<String>,

    #[arg(long)]
    pub page_size: Option<u32>,

    /// Local wallet storage
    #[arg(long, env = "SWIPE_STORE", default_value = ".swipe-wallet.json")]
    pub store_path: String,

    /// USDC spent per buy swipe
    #[arg(long)]
    pub swipe_amount: Option<Decimal>,

    /// Share of the card width a drag must cross to commit
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Empty the card list when a re-fetch fails
    #[arg(long)]
    pub clear_on_error: bool,

    #[arg(long)]
    pub fetch_retries: Option<u32>,

    #[arg(long, default_value = "swipe.log")]
    pub log_file: String,
}

impl Args {
    pub fn session_config(&self) -> swipe_core::Result<SessionConfig> {
        let mut config = SessionConfig::load(self.config.as_deref())?;
        if let Some(network) = self.network {
            config.network = network;
        }
        if let Some(rpc_url) = &self.rpc_url {
            config.rpc_url = rpc_url.clone();
        }
        if let Some(api_url) = &self.api_url {
            config.catalog.api_url = api_url.clone();
        }
        if let Some(page_size) = self.page_size {
            config.catalog.page_size = page_size;
        }
        if let Some(retries) = self.fetch_retries {
            config.catalog.fetch_retries = retries;
        }
        if self.clear_on_error {
            config.catalog.clear_on_error = true;
        }
        if let Some(amount) = self.swipe_amount {
            config.swipe.amount = amount;
        }
        if let Some(threshold) = self.threshold {
            config.swipe.threshold_fraction = threshold;
        }
        config.swipe.threshold_fraction = config
            .swipe
            .threshold_fraction
            .clamp(MIN_THRESHOLD_FRACTION, MAX_THRESHOLD_FRACTION);
        Ok(config)
    }
}

pub fn load_config() -> Args {
    dotenv().ok();
    Args::parse()
}
