pub mod identity;
pub mod rpc;
pub mod storage;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::ledger::BalanceLedger;
use crate::{Error, Result};

pub use identity::{IdentityProvider, KeypairIdentity, StoredIdentity};
pub use rpc::{lamports_to_sol, NetworkClient, SolBalanceSource};
pub use storage::{FileStore, KeyValueStore, MemoryStore, WALLET_BALANCE_USDC, WALLET_PUBLIC_KEY};

/// Balance a freshly connected demo wallet starts with.
pub const DEMO_USDC: Decimal = dec!(10.00);
pub const DEMO_SOL: Decimal = dec!(0.5);

/// Preset amounts offered by the deposit/withdraw form.
pub const QUICK_AMOUNTS: [u32; 4] = [5, 10, 25, 100];

pub struct Wallet {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn KeyValueStore>,
    public_key: Option<String>,
    balance: BalanceLedger,
}

impl Wallet {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            identity,
            store,
            public_key: None,
            balance: BalanceLedger::default(),
        }
    }

    pub fn public_key(&self) -> Option<&str> {
        self.public_key.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.public_key.is_some()
    }

    pub fn balance(&self) -> &BalanceLedger {
        &self.balance
    }

    pub(crate) fn balance_mut(&mut self) -> &mut BalanceLedger {
        &mut self.balance
    }

    /// Picks up an identity left by a previous session. Returns whether a
    /// wallet was restored.
    pub fn restore(&mut self) -> Result<bool> {
        let Some(public_key) = self.identity.current_identity()? else {
            return Ok(false);
        };
        info!("restored wallet {}", public_key);
        self.public_key = Some(public_key);
        self.balance = BalanceLedger::new(DEMO_USDC, DEMO_SOL);
        self.refresh()?;
        Ok(true)
    }

    pub fn connect(&mut self) -> Result<String> {
        let public_key = self.identity.create_identity()?;
        self.public_key = Some(public_key.clone());
        self.balance = BalanceLedger::new(DEMO_USDC, DEMO_SOL);
        self.persist();
        info!("connected wallet {}", public_key);
        Ok(public_key)
    }

    pub fn disconnect(&mut self) -> Result<()> {
        self.identity.clear_identity()?;
        self.store.remove(WALLET_BALANCE_USDC)?;
        if let Some(public_key) = self.public_key.take() {
            info!("disconnected wallet {}", public_key);
        }
        self.balance.reset();
        Ok(())
    }

    /// Reloads the persisted USDC balance.
    pub fn refresh(&mut self) -> Result<()> {
        if let Some(raw) = self.store.get(WALLET_BALANCE_USDC)? {
            let usdc = Decimal::from_str(raw.trim()).map_err(|e| {
                Error::Storage(format!("invalid stored balance {:?}: {}", raw, e))
            })?;
            self.balance.set_usdc(usdc);
        }
        Ok(())
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<()> {
        self.balance.deposit(amount)?;
        self.persist();
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Decimal, address: &str) -> Result<()> {
        if address.trim().is_empty() {
            return Err(Error::MissingAddress);
        }
        self.balance.withdraw(amount)?;
        info!("sent {} USDC to {}", amount, address.trim());
        self.persist();
        Ok(())
    }

    pub fn apply_sol_balance(&mut self, sol: Decimal) {
        self.balance.set_sol(sol);
    }

    /// Writes the USDC balance at full precision. The in-memory ledger stays
    /// authoritative when the store cannot be written.
    pub fn persist(&self) {
        if let Err(e) = self
            .store
            .set(WALLET_BALANCE_USDC, &self.balance.usdc().to_string())
        {
            warn!("failed to persist balance: {}", e);
        }
    }
}
