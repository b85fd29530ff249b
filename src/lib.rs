//! Geo Vault Trade: client for a tokenized mineral-rights exchange.

pub mod blockchain;
pub mod config;
pub mod contract;
pub mod notifications;
pub mod observability;
pub mod survey;
pub mod wallet;

pub use blockchain::{BlockchainClient, TransactionTracker};
pub use config::AppConfig;
pub use contract::ContractGateway;
pub use wallet::WalletSession;
