use rust_decimal::Decimal;
use tracing::{info, warn};

use super::balance::{ensure_positive, BalanceLedger};
use crate::models::{Holding, Token};
use crate::{Error, Result};

/// Ordered holdings keyed by token id, plus their aggregate value.
#[derive(Debug, Clone, Default)]
pub struct PortfolioLedger {
    holdings: Vec<Holding>,
    total_value: Decimal,
}

impl PortfolioLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn holding(&self, token_id: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.token.id == token_id)
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn total_value(&self) -> Decimal {
        self.total_value
    }

    /// Spends `usdc_amount` on `token` at its snapshot price and returns the
    /// token amount bought. Nothing is mutated unless every check passes.
    pub fn buy(
        &mut self,
        balance: &mut BalanceLedger,
        token: &Token,
        usdc_amount: Decimal,
    ) -> Result<Decimal> {
        ensure_positive(usdc_amount)?;
        if !balance.can_afford(usdc_amount) {
            warn!(
                "buy of {} rejected: {} USDC requested, {} available",
                token.id,
                usdc_amount,
                balance.usdc()
            );
            return Err(Error::InsufficientFunds {
                requested: usdc_amount,
                available: balance.usdc(),
            });
        }
        if token.current_price <= Decimal::ZERO {
            return Err(Error::InvalidPrice(format!(
                "{} has non-positive price {}",
                token.id, token.current_price
            )));
        }
        let token_amount = usdc_amount
            .checked_div(token.current_price)
            .ok_or_else(|| {
                Error::InvalidPrice(format!(
                    "{} amount overflows at price {}",
                    token.id, token.current_price
                ))
            })?;

        let index = self.holdings.iter().position(|h| h.token.id == token.id);
        let held = index.map_or(Decimal::ZERO, |i| self.holdings[i].amount);
        let new_amount = held
            .checked_add(token_amount)
            .filter(|amount| amount.checked_mul(token.current_price).is_some())
            .ok_or_else(|| {
                Error::InvalidAmount(format!("{} holding would overflow", token.id))
            })?;

        balance.withdraw(usdc_amount)?;
        match index {
            Some(i) => self.holdings[i].amount = new_amount,
            None => self.holdings.push(Holding {
                token: token.clone(),
                amount: new_amount,
            }),
        }
        self.recompute();

        info!(
            "bought {} {} for {} USDC",
            token_amount,
            token.display_symbol(),
            usdc_amount
        );
        Ok(token_amount)
    }

    pub fn buy_more(
        &mut self,
        balance: &mut BalanceLedger,
        token: &Token,
        usdc_amount: Decimal,
    ) -> Result<Decimal> {
        self.buy(balance, token, usdc_amount)
    }

    /// Liquidates the whole holding back into USDC and returns the amount
    /// credited.
    pub fn remove(&mut self, balance: &mut BalanceLedger, token_id: &str) -> Result<Decimal> {
        let index = self
            .holdings
            .iter()
            .position(|h| h.token.id == token_id)
            .ok_or_else(|| Error::NotFound(format!("{} is not in the portfolio", token_id)))?;

        let usdc_value = self.holdings[index].value();
        if usdc_value > Decimal::ZERO {
            balance.deposit(usdc_value)?;
        }
        let removed = self.holdings.remove(index);
        self.recompute();

        info!(
            "sold {} {} for {} USDC",
            removed.amount,
            removed.token.display_symbol(),
            usdc_value
        );
        Ok(usdc_value)
    }

    pub fn clear(&mut self) {
        self.holdings.clear();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.total_value = self
            .holdings
            .iter()
            .fold(Decimal::ZERO, |total, h| total.saturating_add(h.value()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn token(id: &str, price: Decimal) -> Token {
        Token {
            id: id.to_string(),
            name: id.to_uppercase(),
            symbol: id.to_string(),
            current_price: price,
            price_change_24h: dec!(1.5),
            market_cap: dec!(1000000),
            volume_24h: dec!(50000),
            image: String::new(),
        }
    }

    fn assert_total_matches(portfolio: &PortfolioLedger) {
        let expected: Decimal = portfolio
            .holdings()
            .iter()
            .map(|h| h.amount * h.token.current_price)
            .sum();
        assert_eq!(portfolio.total_value(), expected);
    }

    #[test]
    fn test_buy_creates_holding() {
        let mut balance = BalanceLedger::new(dec!(10.00), Decimal::ZERO);
        let mut portfolio = PortfolioLedger::new();

        let bought = portfolio
            .buy(&mut balance, &token("x", dec!(2.00)), dec!(5.00))
            .unwrap();

        assert_eq!(bought, dec!(2.5));
        assert_eq!(balance.usdc(), dec!(5.00));
        assert_eq!(portfolio.holding("x").unwrap().amount, dec!(2.5));
        assert_eq!(portfolio.total_value(), dec!(5.00));
        assert_total_matches(&portfolio);
    }

    #[test]
    fn test_buy_existing_holding_increases_amount() {
        let mut balance = BalanceLedger::new(dec!(100), Decimal::ZERO);
        let mut portfolio = PortfolioLedger::new();
        let x = token("x", dec!(0.25));

        portfolio.buy(&mut balance, &x, dec!(5)).unwrap();
        portfolio.buy_more(&mut balance, &x, dec!(1)).unwrap();

        assert_eq!(portfolio.len(), 1);
        assert_eq!(portfolio.holding("x").unwrap().amount, dec!(24));
        assert_eq!(balance.usdc(), dec!(94));
        assert_total_matches(&portfolio);
    }

    #[test]
    fn test_buy_with_insufficient_funds_changes_nothing() {
        let mut balance = BalanceLedger::new(dec!(5.00), Decimal::ZERO);
        let mut portfolio = PortfolioLedger::new();

        let err = portfolio
            .buy(&mut balance, &token("x", dec!(2.00)), dec!(10.00))
            .unwrap_err();

        assert!(err.is_insufficient_funds());
        assert_eq!(balance.usdc(), dec!(5.00));
        assert!(portfolio.is_empty());
        assert!(portfolio.total_value().is_zero());
    }

    #[test]
    fn test_buy_with_invalid_price_changes_nothing() {
        let mut balance = BalanceLedger::new(dec!(10), Decimal::ZERO);
        let mut portfolio = PortfolioLedger::new();

        for price in [Decimal::ZERO, dec!(-1)] {
            let err = portfolio
                .buy(&mut balance, &token("x", price), dec!(1))
                .unwrap_err();
            assert!(matches!(err, Error::InvalidPrice(_)));
        }
        assert_eq!(balance.usdc(), dec!(10));
        assert!(portfolio.is_empty());
    }

    #[test]
    fn test_buy_that_would_overflow_holding_changes_nothing() {
        let mut balance = BalanceLedger::new(dec!(100), Decimal::ZERO);
        let mut portfolio = PortfolioLedger::new();
        let dust = token("dust", dec!(0.0000000000000000000000000001));

        portfolio.buy(&mut balance, &dust, dec!(5)).unwrap();
        let err = portfolio.buy(&mut balance, &dust, dec!(5)).unwrap_err();

        assert!(matches!(err, Error::InvalidAmount(_)));
        assert_eq!(balance.usdc(), dec!(95));
        assert_eq!(
            portfolio.holding("dust").unwrap().amount,
            dec!(50000000000000000000000000000)
        );
        assert_total_matches(&portfolio);
    }

    #[test]
    fn test_remove_restores_balance_under_stable_price() {
        let mut balance = BalanceLedger::new(dec!(10.00), Decimal::ZERO);
        let mut portfolio = PortfolioLedger::new();

        portfolio
            .buy(&mut balance, &token("x", dec!(2.00)), dec!(5.00))
            .unwrap();
        let credited = portfolio.remove(&mut balance, "x").unwrap();

        assert_eq!(credited, dec!(5.00));
        assert_eq!(balance.usdc(), dec!(10.00));
        assert!(portfolio.holding("x").is_none());
        assert!(portfolio.total_value().is_zero());
    }

    #[test]
    fn test_remove_round_trip_with_inexact_division() {
        let mut balance = BalanceLedger::new(dec!(10.00), Decimal::ZERO);
        let mut portfolio = PortfolioLedger::new();

        portfolio
            .buy(&mut balance, &token("shib", dec!(0.00002154)), dec!(5.00))
            .unwrap();
        portfolio.remove(&mut balance, "shib").unwrap();

        assert_eq!(balance.format_usdc(), "10.00");
    }

    #[test]
    fn test_remove_missing_holding() {
        let mut balance = BalanceLedger::new(dec!(1), Decimal::ZERO);
        let mut portfolio = PortfolioLedger::new();

        let err = portfolio.remove(&mut balance, "ghost").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(balance.usdc(), dec!(1));
    }

    #[test]
    fn test_total_value_tracks_every_mutation() {
        let mut balance = BalanceLedger::new(dec!(50), Decimal::ZERO);
        let mut portfolio = PortfolioLedger::new();
        let a = token("a", dec!(0.5));
        let b = token("b", dec!(4));

        portfolio.buy(&mut balance, &a, dec!(10)).unwrap();
        assert_total_matches(&portfolio);
        portfolio.buy(&mut balance, &b, dec!(8)).unwrap();
        assert_total_matches(&portfolio);
        assert_eq!(portfolio.total_value(), dec!(18));
        portfolio.remove(&mut balance, "a").unwrap();
        assert_total_matches(&portfolio);
        assert_eq!(portfolio.total_value(), dec!(8));

        assert_eq!(portfolio.holdings()[0].token.id, "b");
        portfolio.clear();
        assert!(portfolio.total_value().is_zero());
    }

    #[test]
    fn test_holdings_keep_insertion_order() {
        let mut balance = BalanceLedger::new(dec!(50), Decimal::ZERO);
        let mut portfolio = PortfolioLedger::new();

        for id in ["c", "a", "b"] {
            portfolio.buy(&mut balance, &token(id, dec!(1)), dec!(1)).unwrap();
        }
        portfolio.buy(&mut balance, &token("a", dec!(1)), dec!(1)).unwrap();

        let ids: Vec<&str> = portfolio
            .holdings()
            .iter()
            .map(|h| h.token.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
