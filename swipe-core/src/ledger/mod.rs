pub mod balance;
pub mod portfolio;

pub use balance::BalanceLedger;
pub use portfolio::PortfolioLedger;
