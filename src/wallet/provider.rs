//! Wallet providers and transaction signing keys.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::config::WalletKind;
use crate::wallet::{WalletError, WalletResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "GEO_VAULT_PRIVATE_KEY";

/// Source of an address and a signer for the session.
pub trait WalletProvider: Send + Sync {
    fn kind(&self) -> WalletKind;

    /// Ask the provider for an account.
    fn connect(&mut self) -> WalletResult<Address>;

    /// Release the account.
    fn disconnect(&mut self);

    /// Signer for the connected account, `None` while disconnected.
    fn signer(&self) -> Option<EthereumWallet>;
}

/// Build the provider selected in configuration.
pub fn provider_for(kind: WalletKind) -> WalletResult<Box<dyn WalletProvider>> {
    match kind {
        WalletKind::Mock => Ok(Box::new(MockWallet::new())),
        WalletKind::LocalKey => Ok(Box::new(LocalKeyWallet::from_env()?)),
        WalletKind::BrowserExtension | WalletKind::Hardware => {
            Ok(Box::new(DetachedWallet::new(kind)))
        }
    }
}

/// Simulated wallet: a fresh random key on every connect.
#[derive(Debug, Default)]
pub struct MockWallet {
    signer: Option<PrivateKeySigner>,
}

impl MockWallet {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WalletProvider for MockWallet {
    fn kind(&self) -> WalletKind {
        WalletKind::Mock
    }

    fn connect(&mut self) -> WalletResult<Address> {
        let signer = PrivateKeySigner::random();
        let address = signer.address();
        self.signer = Some(signer);
        Ok(address)
    }

    fn disconnect(&mut self) {
        self.signer = None;
    }

    fn signer(&self) -> Option<EthereumWallet> {
        self.signer.clone().map(EthereumWallet::from)
    }
}

/// Wallet backed by a hex private key.
#[derive(Debug)]
pub struct LocalKeyWallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    connected: bool,
}

impl LocalKeyWallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> WalletResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| WalletError::InvalidKey(format!("Invalid private key format: {}", e)))?;

        tracing::info!(address = %signer.address(), "Local key wallet loaded");

        Ok(Self {
            signer,
            connected: false,
        })
    }

    /// Load wallet from environment variable.
    ///
    /// Reads `GEO_VAULT_PRIVATE_KEY` from environment.
    pub fn from_env() -> WalletResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR)
            .map_err(|_| WalletError::MissingKey(PRIVATE_KEY_ENV_VAR))?;

        Self::from_private_key(&private_key)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

impl WalletProvider for LocalKeyWallet {
    fn kind(&self) -> WalletKind {
        WalletKind::LocalKey
    }

    fn connect(&mut self) -> WalletResult<Address> {
        self.connected = true;
        Ok(self.signer.address())
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn signer(&self) -> Option<EthereumWallet> {
        self.connected.then(|| EthereumWallet::from(self.signer.clone()))
    }
}

/// A provider kind with no transport in this process (no injected browser
/// wallet, no USB bridge). Connecting always reports it unavailable.
#[derive(Debug, Clone, Copy)]
pub struct DetachedWallet {
    kind: WalletKind,
}

impl DetachedWallet {
    pub fn new(kind: WalletKind) -> Self {
        Self { kind }
    }
}

impl WalletProvider for DetachedWallet {
    fn kind(&self) -> WalletKind {
        self.kind
    }

    fn connect(&mut self) -> WalletResult<Address> {
        Err(WalletError::ProviderUnavailable(self.kind))
    }

    fn disconnect(&mut self) {}

    fn signer(&self) -> Option<EthereumWallet> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_local_key_address() {
        let wallet = LocalKeyWallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_local_key_with_0x_prefix() {
        let wallet = LocalKeyWallet::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_local_key_signer_only_while_connected() {
        let mut wallet = LocalKeyWallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert!(wallet.signer().is_none());
        wallet.connect().unwrap();
        assert!(wallet.signer().is_some());
        wallet.disconnect();
        assert!(wallet.signer().is_none());
    }

    #[test]
    fn test_invalid_private_key() {
        let result = LocalKeyWallet::from_private_key("invalid_key");
        assert!(result.unwrap_err().to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_mock_generates_fresh_accounts() {
        let mut wallet = MockWallet::new();
        let first = wallet.connect().unwrap();
        let second = wallet.connect().unwrap();
        assert_ne!(first, second);
        assert_ne!(first, Address::ZERO);
        assert!(wallet.signer().is_some());
        wallet.disconnect();
        assert!(wallet.signer().is_none());
    }

    #[test]
    fn test_detached_kinds_unavailable() {
        for kind in [WalletKind::BrowserExtension, WalletKind::Hardware] {
            let mut provider = provider_for(kind).unwrap();
            assert_eq!(provider.kind(), kind);
            assert_eq!(
                provider.connect().unwrap_err(),
                WalletError::ProviderUnavailable(kind)
            );
        }
    }
}
