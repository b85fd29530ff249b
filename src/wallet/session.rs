//! Wallet session: the single writer of connection state.
//!
//! Consumers take a `&WalletSession` (to sign) or a watch receiver from
//! [`WalletSession::subscribe`] (to display). Only `connect`/`disconnect`
//! mutate the state, and both need `&mut self`.

use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use crate::config::WalletKind;
use crate::notifications::{Notification, Notifier};
use crate::observability::metrics;
use crate::wallet::provider::WalletProvider;
use crate::wallet::{WalletError, WalletResult};

/// Connection state visible to readers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalletSessionState {
    pub address: Option<Address>,
    pub connected: bool,
}

impl WalletSessionState {
    /// `0x1234...abcd` form of the address.
    pub fn short_address(&self) -> Option<String> {
        self.address.map(|address| {
            let full = address.to_string();
            format!("{}...{}", &full[..6], &full[full.len() - 4..])
        })
    }
}

pub struct WalletSession {
    id: Uuid,
    provider: Box<dyn WalletProvider>,
    state: watch::Sender<WalletSessionState>,
    notifier: Arc<dyn Notifier>,
}

impl WalletSession {
    pub fn new(provider: Box<dyn WalletProvider>, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(WalletSessionState::default());
        Self {
            id: Uuid::new_v4(),
            provider,
            state,
            notifier,
        }
    }

    /// Identifier used to correlate this session's log events.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> WalletKind {
        self.provider.kind()
    }

    pub fn state(&self) -> WalletSessionState {
        self.state.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    /// Reader handle that observes every connect/disconnect.
    pub fn subscribe(&self) -> watch::Receiver<WalletSessionState> {
        self.state.subscribe()
    }

    /// Connect through the provider.
    ///
    /// On error the state is left as it was and nothing is notified; the
    /// typed error is the only report.
    pub fn connect(&mut self) -> WalletResult<Address> {
        let address = match self.provider.connect() {
            Ok(address) => address,
            Err(e) => {
                tracing::warn!(session_id = %self.id, provider = %self.provider.kind(), error = %e, "Wallet connect failed");
                return Err(e);
            }
        };

        self.state.send_replace(WalletSessionState {
            address: Some(address),
            connected: true,
        });
        metrics::record_wallet_connected(true);
        tracing::info!(
            session_id = %self.id,
            provider = %self.provider.kind(),
            address = %address,
            "Wallet connected"
        );
        self.notifier.notify(Notification::info(
            "Wallet Connected",
            "Successfully connected to mining rights exchange",
        ));

        Ok(address)
    }

    pub fn disconnect(&mut self) {
        self.provider.disconnect();
        self.state.send_replace(WalletSessionState::default());
        metrics::record_wallet_connected(false);
        tracing::info!(session_id = %self.id, "Wallet disconnected");
        self.notifier.notify(Notification::info(
            "Wallet Disconnected",
            "Wallet disconnected from exchange",
        ));
    }

    /// Sender address and signer for a write.
    pub(crate) fn signing_context(&self) -> WalletResult<(Address, EthereumWallet)> {
        let state = self.state.borrow();
        match (state.connected, state.address, self.provider.signer()) {
            (true, Some(address), Some(signer)) => Ok((address, signer)),
            _ => Err(WalletError::NotConnected),
        }
    }
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("id", &self.id)
            .field("provider", &self.provider.kind())
            .field("state", &*self.state.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::provider::{DetachedWallet, MockWallet};
    use tokio::sync::mpsc;

    fn session_with_channel(
        provider: Box<dyn WalletProvider>,
    ) -> (WalletSession, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (WalletSession::new(provider, Arc::new(tx)), rx)
    }

    #[test]
    fn test_starts_empty() {
        let (session, _rx) = session_with_channel(Box::new(MockWallet::new()));
        assert_eq!(session.state(), WalletSessionState::default());
        assert!(!session.is_connected());
        assert!(matches!(session.signing_context(), Err(WalletError::NotConnected)));
    }

    #[test]
    fn test_connect_then_disconnect_restores_initial_state() {
        let (mut session, mut rx) = session_with_channel(Box::new(MockWallet::new()));
        let initial = session.state();

        let address = session.connect().unwrap();
        assert_eq!(session.state().address, Some(address));
        assert!(session.state().connected);
        assert_eq!(session.signing_context().unwrap().0, address);
        assert_eq!(rx.try_recv().unwrap().title, "Wallet Connected");

        session.disconnect();
        assert_eq!(session.state(), initial);
        assert_eq!(rx.try_recv().unwrap().title, "Wallet Disconnected");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_readers_see_updates() {
        let (mut session, _rx) = session_with_channel(Box::new(MockWallet::new()));
        let reader = session.subscribe();
        let address = session.connect().unwrap();
        assert_eq!(reader.borrow().address, Some(address));
        session.disconnect();
        assert!(!reader.borrow().connected);
    }

    #[test]
    fn test_unavailable_provider_leaves_state_untouched() {
        let (mut session, mut rx) =
            session_with_channel(Box::new(DetachedWallet::new(WalletKind::Hardware)));
        let err = session.connect().unwrap_err();
        assert_eq!(err, WalletError::ProviderUnavailable(WalletKind::Hardware));
        assert_eq!(session.state(), WalletSessionState::default());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_short_address() {
        let state = WalletSessionState {
            address: Some(Address::repeat_byte(0xab)),
            connected: true,
        };
        let short = state.short_address().unwrap();
        assert!(short.starts_with("0x"));
        assert_eq!(short.len(), 6 + 3 + 4);
        assert!(short.to_lowercase().ends_with("abab"));
        assert_eq!(WalletSessionState::default().short_address(), None);
    }
}
