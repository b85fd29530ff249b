//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! config [blockchain] (RPC URLs, chain id, gas limits)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → chain.rs (ChainClient: call, send, receipt)
//!     → tracker.rs (poll receipts until confirmed or failed)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when blockchain unreachable

pub mod chain;
pub mod client;
pub mod tracker;
pub mod types;

pub use chain::ChainClient;
pub use client::BlockchainClient;
pub use tracker::{TrackedTransaction, TrackerError, TransactionTracker, TxLifecycle};
pub use types::{
    BlockchainConfig, BlockchainError, BlockchainResult, ChainId, FailureReason, ReceiptSummary,
    TransactionHandle, TxStatus, WriteAction,
};
