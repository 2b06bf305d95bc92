pub mod catalog;
pub mod chart;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod session;
pub mod swipe;
pub mod wallet;

pub use error::Error;
pub use session::Session;

pub type Result<T> = std::result::Result<T, Error>;
