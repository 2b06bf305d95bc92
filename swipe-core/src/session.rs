use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::catalog::{self, FetchTicket, TokenCatalog, TokenQuery, TokenSource};
use crate::config::SessionConfig;
use crate::ledger::PortfolioLedger;
use crate::models::{Network, Token};
use crate::swipe::{SwipeDeck, SwipeDirection, SwipeOutcome};
use crate::wallet::{IdentityProvider, KeyValueStore, Wallet};
use crate::{Error, Result};

/// Everything one running app owns: the wallet with its balance ledger, the
/// portfolio ledger, the token catalog and the swipe deck.
pub struct Session {
    config: SessionConfig,
    wallet: Wallet,
    portfolio: PortfolioLedger,
    catalog: TokenCatalog,
    deck: SwipeDeck,
    source: Arc<dyn TokenSource>,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn KeyValueStore>,
        viewport_width: f64,
    ) -> Self {
        let source = catalog::source_for(config.network, &config.catalog);
        Self::with_source(config, identity, store, viewport_width, source)
    }

    pub fn with_source(
        config: SessionConfig,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn KeyValueStore>,
        viewport_width: f64,
        source: Arc<dyn TokenSource>,
    ) -> Self {
        info!(
            "session on {} using {} token source",
            config.network,
            source.name()
        );
        Self {
            wallet: Wallet::new(identity, store),
            portfolio: PortfolioLedger::new(),
            catalog: TokenCatalog::new(config.catalog.clear_on_error),
            deck: SwipeDeck::new(&config.swipe, viewport_width),
            source,
            config,
        }
    }

    /// Restores a wallet left by an earlier run.
    pub fn start(&mut self) -> Result<bool> {
        self.wallet.restore()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn network(&self) -> Network {
        self.config.network
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn portfolio(&self) -> &PortfolioLedger {
        &self.portfolio
    }

    pub fn catalog(&self) -> &TokenCatalog {
        &self.catalog
    }

    pub fn deck(&self) -> &SwipeDeck {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut SwipeDeck {
        &mut self.deck
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.deck.current(self.catalog.tokens())
    }

    pub fn is_exhausted(&self) -> bool {
        !self.catalog.is_loading() && self.deck.is_exhausted(self.catalog.len())
    }

    pub fn catalog_source(&self) -> Arc<dyn TokenSource> {
        self.source.clone()
    }

    pub fn token_query(&self) -> TokenQuery {
        TokenQuery::with_limit(self.config.catalog.page_size)
    }

    pub fn fetch_retries(&self) -> u32 {
        self.config.catalog.fetch_retries
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.config.catalog.initial_backoff_ms.unwrap_or(0))
    }

    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        self.catalog.begin_fetch()
    }

    /// Applies a fetch result. A fresh list always starts from its first card.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<Token>>) -> bool {
        let succeeded = result.is_ok();
        let applied = self.catalog.complete_fetch(ticket, result);
        if applied && succeeded {
            self.deck.restart();
        }
        applied
    }

    pub async fn refresh_catalog(&mut self) -> bool {
        let Some(ticket) = self.begin_fetch() else {
            return false;
        };
        let source = self.source.clone();
        let result = catalog::fetch_with_retry(
            source.as_ref(),
            &self.token_query(),
            self.fetch_retries(),
            self.initial_backoff(),
        )
        .await;
        self.complete_fetch(ticket, result)
    }

    pub fn buy(&mut self, token: &Token, usdc_amount: Decimal) -> Result<Decimal> {
        let bought = self
            .portfolio
            .buy(self.wallet.balance_mut(), token, usdc_amount)?;
        self.wallet.persist();
        Ok(bought)
    }

    /// Tops up an existing holding at the price it was last bought at.
    pub fn buy_more(&mut self, token_id: &str, usdc_amount: Decimal) -> Result<Decimal> {
        let token = self
            .portfolio
            .holding(token_id)
            .map(|h| h.token.clone())
            .ok_or_else(|| Error::NotFound(token_id.to_string()))?;
        let bought = self
            .portfolio
            .buy_more(self.wallet.balance_mut(), &token, usdc_amount)?;
        self.wallet.persist();
        Ok(bought)
    }

    pub fn remove(&mut self, token_id: &str) -> Result<Decimal> {
        let credited = self.portfolio.remove(self.wallet.balance_mut(), token_id)?;
        self.wallet.persist();
        Ok(credited)
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<()> {
        self.wallet.deposit(amount)
    }

    pub fn withdraw(&mut self, amount: Decimal, address: &str) -> Result<()> {
        self.wallet.withdraw(amount, address)
    }

    /// Reloads the persisted USDC balance of the connected wallet.
    pub fn refresh_wallet(&mut self) -> Result<()> {
        if !self.wallet.is_connected() {
            return Err(Error::Identity("no wallet connected".to_string()));
        }
        self.wallet.refresh()
    }

    pub fn apply_sol_balance(&mut self, sol: Decimal) {
        self.wallet.apply_sol_balance(sol);
    }

    pub fn begin_drag(&mut self) -> bool {
        if self.current_token().is_none() {
            return false;
        }
        self.deck.begin_drag()
    }

    pub fn drag_to(&mut self, dx: f64, dy: f64) {
        self.deck.drag_to(dx, dy);
    }

    pub fn release_swipe(&mut self) -> Result<SwipeOutcome> {
        let outcome = self.deck.release(
            self.catalog.tokens(),
            &mut self.portfolio,
            self.wallet.balance_mut(),
        )?;
        if matches!(outcome, SwipeOutcome::Bought { .. }) {
            self.wallet.persist();
        }
        Ok(outcome)
    }

    pub fn swipe(&mut self, direction: SwipeDirection) -> Result<SwipeOutcome> {
        let outcome = self.deck.swipe(
            direction,
            self.catalog.tokens(),
            &mut self.portfolio,
            self.wallet.balance_mut(),
        )?;
        if matches!(outcome, SwipeOutcome::Bought { .. }) {
            self.wallet.persist();
        }
        Ok(outcome)
    }

    pub fn tick(&mut self, dt: Duration) -> Option<usize> {
        self.deck.tick(dt)
    }

    /// A new identity starts with an empty portfolio.
    pub fn connect(&mut self) -> Result<String> {
        let public_key = self.wallet.connect()?;
        self.portfolio.clear();
        self.deck.restart();
        Ok(public_key)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.wallet.disconnect()?;
        self.portfolio.clear();
        self.deck.restart();
        info!("logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DemoTokenSource;
    use crate::wallet::{MemoryStore, StoredIdentity, WALLET_BALANCE_USDC};
    use rust_decimal_macros::dec;

    const WIDTH: f64 = 400.0;

    fn session() -> (Session, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let identity = Arc::new(StoredIdentity::new(store.clone()));
        let session = Session::with_source(
            SessionConfig::default(),
            identity,
            store.clone(),
            WIDTH,
            Arc::new(DemoTokenSource::new(Duration::ZERO)),
        );
        (session, store)
    }

    async fn loaded() -> (Session, Arc<dyn KeyValueStore>) {
        let (mut session, store) = session();
        session.connect().unwrap();
        assert!(session.refresh_catalog().await);
        (session, store)
    }

    fn finish_animation(session: &mut Session) -> Option<usize> {
        session.tick(Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_refresh_loads_demo_catalog() {
        let (session, _) = loaded().await;
        assert_eq!(session.catalog().len(), 8);
        assert_eq!(session.current_token().unwrap().id, "dogecoin");
        assert!(!session.is_exhausted());
    }

    #[tokio::test]
    async fn test_drag_past_threshold_buys_and_persists() {
        let (mut session, store) = loaded().await;

        assert!(session.begin_drag());
        session.drag_to(150.0, 4.0);
        let outcome = session.release_swipe().unwrap();
        assert!(matches!(
            outcome,
            SwipeOutcome::Bought { ref token_id, .. } if token_id == "dogecoin"
        ));

        assert_eq!(session.wallet().balance().usdc(), dec!(5.00));
        assert_eq!(
            store.get(WALLET_BALANCE_USDC).unwrap().as_deref(),
            Some("5.00")
        );
        assert_eq!(session.portfolio().len(), 1);
        assert_eq!(session.deck().index(), 0);
        assert_eq!(finish_animation(&mut session), Some(1));
        assert_eq!(session.current_token().unwrap().id, "shiba-inu");
    }

    #[tokio::test]
    async fn test_failed_buy_keeps_card_and_ledgers() {
        let (mut session, _) = loaded().await;
        session.deck_mut().set_amount(dec!(50));

        let err = session.swipe(SwipeDirection::Buy).unwrap_err();
        assert!(err.is_insufficient_funds());
        assert_eq!(session.wallet().balance().usdc(), dec!(10.00));
        assert!(session.portfolio().is_empty());
        assert_eq!(finish_animation(&mut session), None);
        assert_eq!(session.deck().index(), 0);
    }

    #[tokio::test]
    async fn test_skipping_every_card_exhausts_deck() {
        let (mut session, _) = loaded().await;
        for _ in 0..8 {
            session.swipe(SwipeDirection::Skip).unwrap();
            finish_animation(&mut session);
        }
        assert!(session.is_exhausted());
        assert!(session.current_token().is_none());
        assert!(!session.begin_drag());

        assert!(session.refresh_catalog().await);
        assert_eq!(session.deck().index(), 0);
        assert!(!session.is_exhausted());
    }

    #[tokio::test]
    async fn test_buy_more_and_remove() {
        let (mut session, _) = loaded().await;
        session.swipe(SwipeDirection::Buy).unwrap();
        finish_animation(&mut session);

        session.buy_more("dogecoin", dec!(5)).unwrap();
        assert_eq!(session.wallet().balance().usdc(), Decimal::ZERO);
        assert_eq!(session.portfolio().total_value().round_dp(8), dec!(10));

        let credited = session.remove("dogecoin").unwrap();
        assert_eq!(credited.round_dp(8), dec!(10));
        assert_eq!(session.wallet().balance().usdc(), credited);
        assert!(session.portfolio().is_empty());
        assert!(matches!(
            session.buy_more("dogecoin", dec!(5)),
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_refresh_wallet_reloads_stored_balance() {
        let (mut session, store) = loaded().await;
        store.set(WALLET_BALANCE_USDC, "42.5").unwrap();

        session.refresh_wallet().unwrap();
        assert_eq!(session.wallet().balance().usdc(), dec!(42.5));

        session.logout().unwrap();
        assert!(matches!(session.refresh_wallet(), Err(Error::Identity(_))));
    }

    #[tokio::test]
    async fn test_logout_resets_everything() {
        let (mut session, store) = loaded().await;
        session.swipe(SwipeDirection::Buy).unwrap();
        finish_animation(&mut session);

        session.logout().unwrap();
        assert!(!session.wallet().is_connected());
        assert!(session.portfolio().is_empty());
        assert_eq!(session.deck().index(), 0);
        assert_eq!(store.get(WALLET_BALANCE_USDC).unwrap(), None);
        assert!(!session.start().unwrap());
    }

    #[tokio::test]
    async fn test_stale_fetch_result_is_dropped() {
        let (mut session, _) = session();
        let ticket = session.begin_fetch().unwrap();
        assert!(session.begin_fetch().is_none());
        assert!(session.complete_fetch(ticket, Ok(Vec::new())));
        assert!(!session.complete_fetch(ticket, Ok(Vec::new())));
    }
}
