use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

use super::{TokenQuery, TokenSource};
use crate::models::Token;
use crate::Result;

/// Offline memecoin set served on devnet/testnet.
pub struct DemoTokenSource {
    delay: Duration,
}

impl DemoTokenSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn tokens() -> Vec<Token> {
        vec![
            demo_token(
                "dogecoin",
                "Dogecoin",
                "doge",
                dec!(0.1435),
                dec!(2.35),
                dec!(20430250000),
                dec!(1202540000),
                "https://assets.coingecko.com/coins/images/5/large/dogecoin.png",
            ),
            demo_token(
                "shiba-inu",
                "Shiba Inu",
                "shib",
                dec!(0.00002154),
                dec!(-1.27),
                dec!(12650780000),
                dec!(389540000),
                "https://assets.coingecko.com/coins/images/11939/large/shiba.png",
            ),
            demo_token(
                "pepe",
                "Pepe",
                "pepe",
                dec!(0.00000914),
                dec!(5.67),
                dec!(3845670000),
                dec!(578990000),
                "https://assets.coingecko.com/coins/images/29850/large/pepe-token.jpeg",
            ),
            demo_token(
                "floki",
                "Floki",
                "floki",
                dec!(0.0001547),
                dec!(-3.45),
                dec!(1456780000),
                dec!(234560000),
                "https://assets.coingecko.com/coins/images/16746/large/FLOKI.png",
            ),
            demo_token(
                "bonk",
                "Bonk",
                "bonk",
                dec!(0.00002634),
                dec!(8.12),
                dec!(1654890000),
                dec!(345670000),
                "https://assets.coingecko.com/coins/images/28600/large/bonk.jpg",
            ),
            demo_token(
                "wojak",
                "Wojak",
                "wojak",
                dec!(0.00000143),
                dec!(-2.78),
                dec!(143560000),
                dec!(45678000),
                "https://assets.coingecko.com/coins/images/30152/large/wojak-finance.png",
            ),
            demo_token(
                "mog-coin",
                "Mog Coin",
                "mog",
                dec!(0.00003567),
                dec!(12.34),
                dec!(356780000),
                dec!(89670000),
                "https://assets.coingecko.com/coins/images/29457/large/mogcoin.png",
            ),
            demo_token(
                "cat-in-a-dogs-world",
                "Cat In A Dogs World",
                "catdog",
                dec!(0.0000789),
                dec!(-5.67),
                dec!(87650000),
                dec!(23456000),
                "https://assets.coingecko.com/coins/images/29440/large/catdogeai.png",
            ),
        ]
    }
}

#[async_trait]
impl TokenSource for DemoTokenSource {
    async fn fetch_tokens(&self, query: &TokenQuery) -> Result<Vec<Token>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let mut tokens = Self::tokens();
        tokens.sort_by(|a, b| b.market_cap.cmp(&a.market_cap));
        tokens.truncate(query.limit as usize);
        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "demo"
    }
}

#[allow(clippy::too_many_arguments)]
fn demo_token(
    id: &str,
    name: &str,
    symbol: &str,
    current_price: Decimal,
    price_change_24h: Decimal,
    market_cap: Decimal,
    volume_24h: Decimal,
    image: &str,
) -> Token {
    Token {
        id: id.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        current_price,
        price_change_24h,
        market_cap,
        volume_24h,
        image: image.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_tokens_sorted_by_market_cap() {
        let source = DemoTokenSource::new(Duration::ZERO);
        let tokens = source.fetch_tokens(&TokenQuery::default()).await.unwrap();

        assert_eq!(tokens.len(), 8);
        assert_eq!(tokens[0].id, "dogecoin");
        assert!(tokens
            .windows(2)
            .all(|w| w[0].market_cap >= w[1].market_cap));
    }

    #[tokio::test]
    async fn test_demo_respects_limit() {
        let source = DemoTokenSource::new(Duration::ZERO);
        let query = TokenQuery {
            limit: 3,
            ..TokenQuery::default()
        };
        assert_eq!(source.fetch_tokens(&query).await.unwrap().len(), 3);
    }

    #[test]
    fn test_demo_ids_are_unique_and_prices_positive() {
        let tokens = DemoTokenSource::tokens();
        let mut ids: Vec<&str> = tokens.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), tokens.len());
        assert!(tokens.iter().all(|t| t.current_price > Decimal::ZERO));
    }
}
