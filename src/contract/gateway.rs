//! Read and write access to the mining-rights contract.
//!
//! # Responsibilities
//! - Encode calls against the fixed ABI
//! - Reject writes that cannot succeed (no session, inactive rights, value mismatch)
//! - Simulate each write before dispatch, then sign and broadcast it
//! - Report every write outcome as a typed result plus one notification

use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{SolCall, SolValue};
use thiserror::Error;

use crate::blockchain::chain::ChainClient;
use crate::blockchain::types::{BlockchainError, TransactionHandle, WriteAction};
use crate::contract::abi::{createMiningRightsCall, getMiningRightsInfoCall, placeBidCall};
use crate::contract::types::{BidSubmission, CreateRightsRequest, MiningRightsRecord};
use crate::notifications::{Notification, Notifier};
use crate::observability::metrics;
use crate::wallet::{WalletError, WalletSession};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error("Mining rights {0} do not exist")]
    RightsNotFound(u64),

    #[error("Mining rights {0} are not open for bids")]
    RightsInactive(u64),

    #[error("Attached value {attached} does not match bid amount {expected}")]
    ValueMismatch { expected: U256, attached: U256 },
}

impl GatewayError {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            GatewayError::Wallet(_) => "wallet",
            GatewayError::Blockchain(BlockchainError::Reverted(_)) => "reverted",
            GatewayError::Blockchain(BlockchainError::Rejected(_)) => "rejected",
            GatewayError::Blockchain(_) => "rpc",
            GatewayError::RightsNotFound(_) => "not_found",
            GatewayError::RightsInactive(_) => "inactive",
            GatewayError::ValueMismatch { .. } => "value_mismatch",
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway to one deployed contract.
pub struct ContractGateway<C> {
    client: Arc<C>,
    contract: Address,
    notifier: Arc<dyn Notifier>,
}

impl<C: ChainClient> ContractGateway<C> {
    pub fn new(client: Arc<C>, contract: Address, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            contract,
            notifier,
        }
    }

    /// Fetch a rights record.
    ///
    /// `None` id means nothing to query yet and yields `Ok(None)` without a
    /// round trip. RPC errors are returned as-is.
    pub async fn read_rights_info(
        &self,
        rights_id: Option<u64>,
    ) -> GatewayResult<Option<MiningRightsRecord>> {
        let Some(id) = rights_id else {
            return Ok(None);
        };

        let input = getMiningRightsInfoCall {
            rightsId: U256::from(id),
        }
        .abi_encode();
        let tx = TransactionRequest::default()
            .with_to(self.contract)
            .with_input(input);

        let output = self.client.call(tx).await?;
        let info = getMiningRightsInfoCall::abi_decode_returns(&output)
            .map_err(|e| BlockchainError::Decode(e.to_string()))?;

        tracing::debug!(rights_id = id, "Read mining rights");
        Ok(Some(MiningRightsRecord::from_return(id, info)))
    }

    /// List new mining rights for auction.
    pub async fn create_rights(
        &self,
        session: &WalletSession,
        request: CreateRightsRequest,
    ) -> GatewayResult<TransactionHandle> {
        let input = createMiningRightsCall {
            location: request.location,
            geologicalData: request.geological_data,
            areaSize: request.area_size,
            estimatedValue: request.estimated_value,
            auctionDuration: request.auction_duration_secs,
        }
        .abi_encode();

        let result = self
            .dispatch(session, WriteAction::CreateRights, input.into(), U256::ZERO)
            .await;

        self.report(
            WriteAction::CreateRights,
            result,
            Notification::info(
                "Mining Rights Created",
                "Your mining rights have been successfully created and listed for auction.",
            ),
            "Failed to create mining rights. Please try again.",
        )
    }

    /// Bid `amount` wei on `rights_id`, attaching the same amount as value.
    pub async fn place_bid(
        &self,
        session: &WalletSession,
        rights_id: u64,
        amount: u32,
        is_anonymous: bool,
    ) -> GatewayResult<TransactionHandle> {
        let bid = BidSubmission {
            rights_id,
            amount,
            is_anonymous,
        };
        self.submit_bid(session, bid, bid.required_value()).await
    }

    /// Submit `bid` carrying `attached_value`.
    ///
    /// Refused before dispatch unless the value equals the amount and the
    /// rights exist and are active.
    pub async fn submit_bid(
        &self,
        session: &WalletSession,
        bid: BidSubmission,
        attached_value: U256,
    ) -> GatewayResult<TransactionHandle> {
        let result = self.checked_bid(session, bid, attached_value).await;

        self.report(
            WriteAction::PlaceBid,
            result,
            Notification::info(
                "Bid Placed",
                format!("Your bid of {} wei has been placed successfully.", bid.amount),
            ),
            "Failed to place bid. Please try again.",
        )
    }

    async fn checked_bid(
        &self,
        session: &WalletSession,
        bid: BidSubmission,
        attached_value: U256,
    ) -> GatewayResult<TransactionHandle> {
        let expected = bid.required_value();
        if attached_value != expected {
            return Err(GatewayError::ValueMismatch {
                expected,
                attached: attached_value,
            });
        }

        // Checked before the read so a disconnected session costs no round trip.
        session.signing_context()?;

        if let Some(record) = self.read_rights_info(Some(bid.rights_id)).await? {
            if !record.accepts_bids() {
                return Err(if record.exists() {
                    GatewayError::RightsInactive(bid.rights_id)
                } else {
                    GatewayError::RightsNotFound(bid.rights_id)
                });
            }
        }

        let input = placeBidCall {
            rightsId: U256::from(bid.rights_id),
            amount: bid.amount,
            isAnonymous: bid.is_anonymous,
        }
        .abi_encode();

        self.dispatch(session, WriteAction::PlaceBid, input.into(), attached_value)
            .await
    }

    /// Simulate, then sign and broadcast.
    async fn dispatch(
        &self,
        session: &WalletSession,
        action: WriteAction,
        input: Bytes,
        value: U256,
    ) -> GatewayResult<TransactionHandle> {
        let (from, wallet) = session.signing_context()?;

        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(self.contract)
            .with_input(input)
            .with_value(value);

        let output = self.client.call(tx.clone()).await?;
        let simulated = U256::abi_decode(&output).map_err(|e| BlockchainError::Decode(e.to_string()))?;

        let hash = self.client.send_transaction(tx, &wallet).await?;

        tracing::info!(
            session_id = %session.id(),
            action = action.as_str(),
            tx_hash = %hash,
            simulated_return = %simulated,
            "Transaction submitted"
        );
        Ok(TransactionHandle::submitted(hash, action, simulated))
    }

    fn report(
        &self,
        action: WriteAction,
        result: GatewayResult<TransactionHandle>,
        success: Notification,
        failure: &str,
    ) -> GatewayResult<TransactionHandle> {
        match &result {
            Ok(_) => {
                metrics::record_submission(action.as_str());
                self.notifier.notify(success);
            }
            Err(e) => {
                metrics::record_submission_failure(action.as_str(), e.reason());
                tracing::warn!(action = action.as_str(), error = %e, "Submission failed");
                self.notifier.notify(Notification::error(failure));
            }
        }
        result
    }
}

impl<C> std::fmt::Debug for ContractGateway<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractGateway")
            .field("contract", &self.contract)
            .finish()
    }
}
