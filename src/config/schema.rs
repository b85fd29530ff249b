//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the exchange client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Chain connection settings.
    pub blockchain: BlockchainConfig,

    /// Mining-rights contract settings.
    pub contract: ContractConfig,

    /// Wallet provider selection.
    pub wallet: WalletConfig,

    /// Transaction confirmation polling.
    pub tracker: TrackerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Chain ID (11155111 for Sepolia, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of blocks (including the inclusion block) before a transaction is confirmed.
    pub confirmation_blocks: u32,

    /// Gas price multiplier (1.0 = estimated, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
            failover_urls: Vec::new(),
            chain_id: 11_155_111,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            gas_price_multiplier: 1.2,
            max_gas_price_gwei: 500,
        }
    }
}

/// Mining-rights contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Deployed contract address (checksummed or lowercase hex).
    pub address: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            // Placeholder until a deployment address is configured.
            address: "0x0000000000000000000000000000000000000000".to_string(),
        }
    }
}

/// Which wallet provider backs the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WalletKind {
    /// Throwaway key generated on every connect.
    #[default]
    Mock,
    /// Private key read from the environment.
    LocalKey,
    /// Injected browser wallet.
    BrowserExtension,
    /// USB hardware signer.
    Hardware,
}

impl WalletKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletKind::Mock => "mock",
            WalletKind::LocalKey => "local-key",
            WalletKind::BrowserExtension => "browser-extension",
            WalletKind::Hardware => "hardware",
        }
    }
}

impl std::fmt::Display for WalletKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WalletConfig {
    /// Provider used by `connect`.
    pub provider: WalletKind,
}

/// Transaction tracker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Give up and report the transaction as dropped after this many seconds.
    /// Unset means poll until the receipt appears.
    pub confirmation_timeout_secs: Option<u64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
            confirmation_timeout_secs: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
