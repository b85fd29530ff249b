//! Wallet subsystem.
//!
//! # Data Flow
//! ```text
//! config [wallet] provider
//!     → provider.rs (mock / local key / detached kinds)
//!     → session.rs (connection state, single writer)
//!     → gateway (sender address + signer for writes)
//! ```

pub mod provider;
pub mod session;

use thiserror::Error;

use crate::config::WalletKind;

pub use provider::{provider_for, DetachedWallet, LocalKeyWallet, MockWallet, WalletProvider};
pub use session::{WalletSession, WalletSessionState};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    /// No transport for this provider kind is present.
    #[error("Wallet provider '{0}' is not available")]
    ProviderUnavailable(WalletKind),

    #[error("{0}")]
    InvalidKey(String),

    #[error("Environment variable {0} not set")]
    MissingKey(&'static str),

    #[error("Wallet not connected")]
    NotConnected,
}

pub type WalletResult<T> = Result<T, WalletError>;
