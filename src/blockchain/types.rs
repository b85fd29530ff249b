//! Chain-specific types and error definitions.

use alloy::primitives::{TxHash, U256};
use thiserror::Error;

// Re-export BlockchainConfig from config module to avoid duplication
pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node answered with an error (insufficient funds, bad nonce, ...).
    #[error("Request rejected by node: {0}")]
    Rejected(String),

    /// Call simulation reverted.
    #[error("Execution reverted: {0}")]
    Reverted(String),

    /// Signing or sender error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Return data did not match the ABI.
    #[error("ABI decode error: {0}")]
    Decode(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// The parts of a receipt the tracker cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptSummary {
    /// Block the transaction was included in.
    pub block_number: u64,
    /// `false` when the transaction reverted.
    pub success: bool,
}

/// Which write produced a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteAction {
    CreateRights,
    PlaceBid,
    /// Submitted outside this client; only the hash is known.
    External,
}

impl WriteAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteAction::CreateRights => "create_rights",
            WriteAction::PlaceBid => "place_bid",
            WriteAction::External => "external",
        }
    }
}

/// Opaque reference to a submitted transaction.
///
/// Not `Clone`: each submission yields exactly one handle.
#[derive(Debug, PartialEq, Eq)]
pub struct TransactionHandle {
    hash: TxHash,
    action: WriteAction,
    simulated_return: Option<U256>,
}

impl TransactionHandle {
    pub(crate) fn submitted(hash: TxHash, action: WriteAction, simulated_return: U256) -> Self {
        Self {
            hash,
            action,
            simulated_return: Some(simulated_return),
        }
    }

    /// Wrap a hash that was broadcast by someone else.
    pub fn external(hash: TxHash) -> Self {
        Self {
            hash,
            action: WriteAction::External,
            simulated_return: None,
        }
    }

    pub fn hash(&self) -> TxHash {
        self.hash
    }

    pub fn action(&self) -> WriteAction {
        self.action
    }

    /// Return value of the call as simulated just before dispatch.
    pub fn simulated_return(&self) -> Option<U256> {
        self.simulated_return
    }

    /// Id of the rights record a create call is expected to mint.
    pub fn rights_id(&self) -> Option<U256> {
        match self.action {
            WriteAction::CreateRights => self.simulated_return,
            _ => None,
        }
    }
}

/// Why a tracked transaction ended without confirming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Mined with receipt status 0.
    Reverted { block_number: u64 },
    /// No receipt before the configured confirmation timeout.
    Dropped { waited_secs: u64 },
}

/// Confirmation status of a transaction handle.
///
/// There is no "not submitted" variant: before a write succeeds there is no
/// handle to track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    /// Submitted, awaiting inclusion (or the required depth).
    Confirming,
    /// Terminal success.
    Confirmed { block_number: u64 },
    /// Terminal failure.
    Failed(FailureReason),
}

impl TxStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TxStatus::Confirmed { .. } | TxStatus::Failed(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Confirming => "confirming",
            TxStatus::Confirmed { .. } => "confirmed",
            TxStatus::Failed(FailureReason::Reverted { .. }) => "reverted",
            TxStatus::Failed(FailureReason::Dropped { .. }) => "dropped",
        }
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxStatus::Confirmed { block_number } => write!(f, "confirmed in block {}", block_number),
            TxStatus::Failed(FailureReason::Reverted { block_number }) => {
                write!(f, "failed: reverted in block {}", block_number)
            }
            TxStatus::Failed(FailureReason::Dropped { waited_secs }) => {
                write!(f, "failed: no receipt after {}s", waited_secs)
            }
            other => f.write_str(other.as_str()),
        }
    }
}
