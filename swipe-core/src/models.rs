use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A tradable token as shown on a swipe card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub current_price: Decimal,
    pub price_change_24h: Decimal,
    pub market_cap: Decimal,
    pub volume_24h: Decimal,
    pub image: String,
}

impl Token {
    pub fn is_price_up(&self) -> bool {
        self.price_change_24h > Decimal::ZERO
    }

    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }
}

/// A token plus the quantity held in the simulated portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub token: Token,
    pub amount: Decimal,
}

impl Holding {
    /// Value at the price snapshot taken when the token was bought.
    pub fn value(&self) -> Decimal {
        self.amount.saturating_mul(self.token.current_price)
    }
}

/// Cluster the session is pointed at; decides where the catalog comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Network {
    #[serde(rename = "mainnet-beta")]
    MainnetBeta,
    #[default]
    #[serde(rename = "devnet")]
    Devnet,
    #[serde(rename = "testnet")]
    Testnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::MainnetBeta => write!(f, "mainnet-beta"),
            Network::Devnet => write!(f, "devnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet-beta" | "mainnet" => Ok(Network::MainnetBeta),
            "devnet" => Ok(Network::Devnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(format!(
                "unknown network: {}. Supported networks: mainnet-beta, devnet, testnet",
                other
            )),
        }
    }
}

/// Two decimals, for USDC amounts and USD values.
pub fn format_usd(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Unit prices of memecoins span many orders of magnitude.
pub fn format_price(price: Decimal) -> String {
    let dp = if price >= Decimal::ONE {
        2
    } else if price >= dec!(0.0001) {
        4
    } else {
        8
    };
    format!(
        "{:.*}",
        dp as usize,
        price.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Market cap and volume are shown in millions.
pub fn format_millions(value: Decimal) -> String {
    format!("{}M", format_usd(value / dec!(1000000)))
}

pub fn format_percent(value: Decimal) -> String {
    format!("{}%", format_usd(value.abs()))
}
