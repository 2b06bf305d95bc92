pub mod demo;
pub mod remote;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::CatalogConfig;
use crate::models::{Network, Token};
use crate::Result;

pub use demo::DemoTokenSource;
pub use remote::RemoteTokenSource;

/// Query parameters understood by the token list API.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenQuery {
    pub limit: u32,
    pub page: u32,
    pub sort_by: String,
    pub sort_order: String,
    pub hide_imported: u8,
    pub status: String,
}

impl Default for TokenQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            page: 1,
            sort_by: "marketCapUSD".to_string(),
            sort_order: "desc".to_string(),
            hide_imported: 1,
            status: "bonded".to_string(),
        }
    }
}

impl TokenQuery {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("limit", self.limit.to_string()),
            ("page", self.page.to_string()),
            ("sortBy", self.sort_by.clone()),
            ("sortOrder", self.sort_order.clone()),
            ("hideImported", self.hide_imported.to_string()),
            ("status", self.status.clone()),
        ]
    }
}

#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_tokens(&self, query: &TokenQuery) -> Result<Vec<Token>>;

    fn name(&self) -> &'static str;
}

/// Remote API on mainnet, the offline set everywhere else.
pub fn source_for(network: Network, config: &CatalogConfig) -> Arc<dyn TokenSource> {
    match network {
        Network::MainnetBeta => Arc::new(RemoteTokenSource::new(config.api_url.clone())),
        Network::Devnet | Network::Testnet => Arc::new(DemoTokenSource::new(
            Duration::from_millis(config.demo_delay_ms.unwrap_or(0)),
        )),
    }
}

/// Retries fetch-class failures with doubling backoff.
pub async fn fetch_with_retry(
    source: &dyn TokenSource,
    query: &TokenQuery,
    retries: u32,
    initial_backoff: Duration,
) -> Result<Vec<Token>> {
    let mut backoff = initial_backoff;
    let mut attempt = 0;
    loop {
        match source.fetch_tokens(query).await {
            Ok(tokens) => return Ok(tokens),
            Err(e) if e.is_fetch_error() && attempt < retries => {
                attempt += 1;
                warn!(
                    "{} fetch failed ({}), retry {}/{} in {}ms",
                    source.name(),
                    e,
                    attempt,
                    retries,
                    backoff.as_millis()
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Handed out by [`TokenCatalog::begin_fetch`]; only the latest ticket may
/// complete a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Default)]
pub struct TokenCatalog {
    tokens: Vec<Token>,
    loading: bool,
    error: Option<String>,
    clear_on_error: bool,
    generation: u64,
}

impl TokenCatalog {
    pub fn new(clear_on_error: bool) -> Self {
        Self {
            clear_on_error,
            ..Self::default()
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Marks the catalog as loading. Returns `None` while another fetch is
    /// still pending so a slow earlier response can never overwrite a newer
    /// one.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.loading {
            debug!("catalog fetch already in flight, ignoring request");
            return None;
        }
        self.loading = true;
        self.error = None;
        self.generation += 1;
        Some(FetchTicket(self.generation))
    }

    /// Applies the outcome of a fetch. Returns `false` for a stale ticket.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<Token>>) -> bool {
        if ticket.0 != self.generation || !self.loading {
            debug!("dropping stale catalog result {:?}", ticket);
            return false;
        }
        self.loading = false;
        match result {
            Ok(tokens) => {
                info!("catalog loaded {} tokens", tokens.len());
                self.tokens = tokens;
            }
            Err(e) => {
                warn!("catalog fetch failed: {}", e);
                self.error = Some(e.to_string());
                if self.clear_on_error {
                    self.tokens.clear();
                }
            }
        }
        true
    }

    /// Fetch and apply in one step, for callers that can await inline.
    pub async fn refresh(
        &mut self,
        source: &dyn TokenSource,
        query: &TokenQuery,
        retries: u32,
        initial_backoff: Duration,
    ) -> bool {
        let Some(ticket) = self.begin_fetch() else {
            return false;
        };
        let result = fetch_with_retry(source, query, retries, initial_backoff).await;
        self.complete_fetch(ticket, result)
    }
}
