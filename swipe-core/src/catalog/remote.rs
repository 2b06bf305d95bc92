use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, error};

use super::{TokenQuery, TokenSource};
use crate::models::Token;
use crate::{Error, Result};

/// Token list API of the launchpad the mainnet feed is sourced from.
pub struct RemoteTokenSource {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenListResponse {
    pub tokens: Vec<ApiToken>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiToken {
    pub id: String,
    pub name: String,
    pub ticker: String,
    #[serde(default)]
    pub image: String,
    #[serde(rename = "marketCapUSD")]
    pub market_cap_usd: f64,
    #[serde(rename = "tokenPriceUSD")]
    pub token_price_usd: f64,
    pub price_change_24h: f64,
    pub volume_24h: f64,
}

impl RemoteTokenSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TokenSource for RemoteTokenSource {
    async fn fetch_tokens(&self, query: &TokenQuery) -> Result<Vec<Token>> {
        debug!("Fetching tokens from {} ({:?})", self.base_url, query);

        let response = self
            .client
            .get(&self.base_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&query.to_params())
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Token API error: {} - {}", status, error_text);
            return Err(Error::Fetch(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let body: TokenListResponse = response
            .json()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to parse token list: {}", e)))?;

        debug!(
            "Token API page {}/{} ({} total, more: {})",
            body.page, body.total_pages, body.total, body.has_more
        );

        body.tokens.into_iter().map(ApiToken::into_token).collect()
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

impl ApiToken {
    pub fn into_token(self) -> Result<Token> {
        Ok(Token {
            current_price: to_decimal(self.token_price_usd, "tokenPriceUSD", &self.id)?,
            price_change_24h: to_decimal(self.price_change_24h, "priceChange24h", &self.id)?,
            market_cap: to_decimal(self.market_cap_usd, "marketCapUSD", &self.id)?,
            volume_24h: to_decimal(self.volume_24h, "volume24h", &self.id)?,
            symbol: self.ticker.to_lowercase(),
            id: self.id,
            name: self.name,
            image: self.image,
        })
    }
}

fn to_decimal(value: f64, field: &str, id: &str) -> Result<Decimal> {
    Decimal::try_from(value)
        .map_err(|e| Error::Fetch(format!("{} of {} is not a decimal: {}", field, id, e)))
}
