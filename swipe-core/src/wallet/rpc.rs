use async_trait::async_trait;
use rust_decimal::Decimal;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::{Error, Result};

#[async_trait]
pub trait SolBalanceSource: Send + Sync {
    /// Whole SOL held by `pubkey`.
    async fn fetch_sol_balance(&self, pubkey: &str) -> Result<Decimal>;
}

#[derive(Clone)]
pub struct NetworkClient {
    pub rpc_client: Arc<RpcClient>,
}

impl NetworkClient {
    pub fn new(rpc_url: &str) -> Self {
        let rpc_client = RpcClient::new(rpc_url.to_string());
        Self {
            rpc_client: Arc::new(rpc_client),
        }
    }

    pub async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64> {
        let balance = self
            .rpc_client
            .get_balance(pubkey)
            .await
            .map_err(|e| Error::Rpc(e.to_string()))?;
        Ok(balance)
    }
}

#[async_trait]
impl SolBalanceSource for NetworkClient {
    async fn fetch_sol_balance(&self, pubkey: &str) -> Result<Decimal> {
        let pubkey = Pubkey::from_str(pubkey)
            .map_err(|e| Error::Rpc(format!("invalid public key {}: {}", pubkey, e)))?;
        let lamports = self.get_balance(&pubkey).await?;
        debug!("{} holds {} lamports", pubkey, lamports);
        Ok(lamports_to_sol(lamports))
    }
}

pub fn lamports_to_sol(lamports: u64) -> Decimal {
    Decimal::from(lamports) / Decimal::from(LAMPORTS_PER_SOL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_lamports_to_sol() {
        assert_eq!(lamports_to_sol(0), Decimal::ZERO);
        assert_eq!(lamports_to_sol(1_000_000_000), dec!(1));
        assert_eq!(lamports_to_sol(500_000_000), dec!(0.5));
        assert_eq!(lamports_to_sol(1), dec!(0.000000001));
    }

    #[tokio::test]
    async fn test_invalid_pubkey_is_rejected_before_rpc() {
        let client = NetworkClient::new("http://127.0.0.1:1");
        let err = client.fetch_sol_balance("not-a-key").await.unwrap_err();
        assert!(matches!(err, Error::Rpc(_)));
    }
}
