use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::debug;

use crate::models::format_usd;
use crate::{Error, Result};

const SOL_DISPLAY_DP: u32 = 5;

/// Simulated USDC and SOL balances of one wallet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceLedger {
    usdc: Decimal,
    sol: Decimal,
}

impl BalanceLedger {
    pub fn new(usdc: Decimal, sol: Decimal) -> Self {
        Self { usdc, sol }
    }

    pub fn usdc(&self) -> Decimal {
        self.usdc
    }

    pub fn sol(&self) -> Decimal {
        self.sol
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<()> {
        ensure_positive(amount)?;
        self.usdc = self
            .usdc
            .checked_add(amount)
            .ok_or_else(|| Error::InvalidAmount("balance overflow".to_string()))?;
        debug!("deposited {} USDC, balance {}", amount, self.usdc);
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<()> {
        ensure_positive(amount)?;
        if amount > self.usdc {
            return Err(Error::InsufficientFunds {
                requested: amount,
                available: self.usdc,
            });
        }
        self.usdc -= amount;
        debug!("withdrew {} USDC, balance {}", amount, self.usdc);
        Ok(())
    }

    pub fn can_afford(&self, amount: Decimal) -> bool {
        amount <= self.usdc
    }

    pub fn set_usdc(&mut self, usdc: Decimal) {
        self.usdc = usdc.max(Decimal::ZERO);
    }

    pub fn set_sol(&mut self, sol: Decimal) {
        self.sol = sol.max(Decimal::ZERO);
    }

    pub fn reset(&mut self) {
        self.usdc = Decimal::ZERO;
        self.sol = Decimal::ZERO;
    }

    pub fn format_usdc(&self) -> String {
        format_usd(self.usdc)
    }

    /// Keeps the stored digits up to five decimals; dust is shown as `<0.00001`.
    pub fn format_sol(&self) -> String {
        let sol = self.sol.normalize();
        if sol.is_zero() {
            return "0".to_string();
        }
        if sol < dec!(0.00001) {
            return "<0.00001".to_string();
        }
        let dp = if sol.scale() == 0 {
            SOL_DISPLAY_DP
        } else {
            sol.scale().min(SOL_DISPLAY_DP)
        };
        format!(
            "{:.*}",
            dp as usize,
            sol.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        )
    }
}

pub(crate) fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    Ok(())
}
