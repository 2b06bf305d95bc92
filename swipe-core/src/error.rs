use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("insufficient USDC balance: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("a withdrawal address is required")]
    MissingAddress,

    #[error("failed to fetch tokens: {0}")]
    Fetch(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("identity error: {0}")]
    Identity(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    /// Network and decode failures while loading the catalog.
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, Error::Fetch(_) | Error::Http(_))
    }

    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, Error::InsufficientFunds { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
