//! Shared utilities for integration testing.
//!
//! `MockChain` implements `ChainClient` in memory and emulates the
//! mining-rights contract by decoding the ABI calls it receives.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use alloy::network::EthereumWallet;
use alloy::primitives::{keccak256, Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{SolCall, SolValue};
use tokio::sync::mpsc;

use geo_vault_trade::blockchain::{BlockchainError, BlockchainResult, ChainClient, ReceiptSummary};
use geo_vault_trade::config::TrackerConfig;
use geo_vault_trade::contract::abi::{createMiningRightsCall, getMiningRightsInfoCall, placeBidCall};
use geo_vault_trade::contract::ContractGateway;
use geo_vault_trade::notifications::Notification;
use geo_vault_trade::wallet::{MockWallet, WalletSession};

pub const CONTRACT: Address = Address::repeat_byte(0xc0);

#[derive(Debug, Clone)]
pub struct Rights {
    pub location: String,
    pub geological_data: String,
    pub area_size: u32,
    pub estimated_value: u32,
    pub current_bid: u32,
    pub bid_count: u32,
    pub is_active: bool,
    pub is_verified: bool,
    pub owner: Address,
    pub auction_end_time: u64,
}

impl Rights {
    pub fn listed(owner: Address, is_active: bool) -> Self {
        Self {
            location: "Seeded".to_string(),
            geological_data: "{}".to_string(),
            area_size: 10,
            estimated_value: 1_000,
            current_bid: 0,
            bid_count: 0,
            is_active,
            is_verified: false,
            owner,
            auction_end_time: now() + 3600,
        }
    }
}

#[derive(Default)]
struct ChainState {
    block: u64,
    rights: BTreeMap<u64, Rights>,
    pending: Vec<(TxHash, TransactionRequest)>,
    receipts: HashMap<TxHash, ReceiptSummary>,
    sent: Vec<TransactionRequest>,
    calls: usize,
    tx_counter: u64,
    reject_sends: bool,
    revert_on_mine: bool,
    receipt_failures: u32,
}

#[derive(Default)]
pub struct MockChain {
    state: Mutex<ChainState>,
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn input_of(tx: &TransactionRequest) -> Bytes {
    tx.input.input().cloned().unwrap_or_default()
}

fn selector(input: &[u8]) -> [u8; 4] {
    input
        .get(..4)
        .and_then(|s| s.try_into().ok())
        .unwrap_or_default()
}

impl MockChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_rights(&self, id: u64, rights: Rights) {
        self.state.lock().unwrap().rights.insert(id, rights);
    }

    /// Make the next sends fail as a wallet/node rejection.
    pub fn reject_sends(&self, reject: bool) {
        self.state.lock().unwrap().reject_sends = reject;
    }

    /// Mine pending transactions with receipt status 0.
    pub fn revert_on_mine(&self, revert: bool) {
        self.state.lock().unwrap().revert_on_mine = revert;
    }

    /// Fail the next `count` receipt lookups with an RPC timeout.
    pub fn fail_receipts(&self, count: u32) {
        self.state.lock().unwrap().receipt_failures = count;
    }

    pub fn pending_receipt_failures(&self) -> u32 {
        self.state.lock().unwrap().receipt_failures
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    pub fn block(&self) -> u64 {
        self.state.lock().unwrap().block
    }

    /// Produce one block containing every pending transaction.
    pub fn mine(&self) {
        let mut state = self.state.lock().unwrap();
        state.block += 1;
        let block = state.block;
        let revert = state.revert_on_mine;

        for (hash, tx) in std::mem::take(&mut state.pending) {
            if !revert {
                apply(&mut state, &tx);
            }
            state.receipts.insert(
                hash,
                ReceiptSummary {
                    block_number: block,
                    success: !revert,
                },
            );
        }
    }

    /// Advance the head without transactions.
    pub fn mine_empty(&self, blocks: u64) {
        self.state.lock().unwrap().block += blocks;
    }
}

fn apply(state: &mut ChainState, tx: &TransactionRequest) {
    let input = input_of(tx);
    let from = tx.from.unwrap_or_default();

    let selector = selector(&input);
    if selector == createMiningRightsCall::SELECTOR {
        let Ok(call) = createMiningRightsCall::abi_decode(&input) else {
            return;
        };
        let id = state.rights.keys().next_back().copied().unwrap_or(0) + 1;
        state.rights.insert(
            id,
            Rights {
                location: call.location,
                geological_data: call.geologicalData,
                area_size: call.areaSize,
                estimated_value: call.estimatedValue,
                current_bid: 0,
                bid_count: 0,
                is_active: true,
                is_verified: false,
                owner: from,
                auction_end_time: now() + call.auctionDuration.saturating_to::<u64>(),
            },
        );
    } else if selector == placeBidCall::SELECTOR {
        let Ok(call) = placeBidCall::abi_decode(&input) else {
            return;
        };
        let id: u64 = call.rightsId.saturating_to();
        if let Some(rights) = state.rights.get_mut(&id) {
            rights.current_bid = call.amount;
            rights.bid_count += 1;
        }
    }
}

fn simulate(state: &ChainState, tx: &TransactionRequest) -> BlockchainResult<Bytes> {
    let input = input_of(tx);
    let selector = selector(&input);
    let malformed = |e: alloy::sol_types::Error| BlockchainError::Reverted(e.to_string());

    if selector == getMiningRightsInfoCall::SELECTOR {
        let call = getMiningRightsInfoCall::abi_decode(&input).map_err(malformed)?;
        let id: u64 = call.rightsId.saturating_to();
        let encoded = match state.rights.get(&id) {
            Some(r) => (
                r.location.clone(),
                r.geological_data.clone(),
                r.area_size,
                r.estimated_value,
                r.current_bid,
                r.bid_count,
                r.is_active,
                r.is_verified,
                r.owner,
                U256::from(r.auction_end_time),
            )
                .abi_encode_params(),
            None => (
                String::new(),
                String::new(),
                0u32,
                0u32,
                0u32,
                0u32,
                false,
                false,
                Address::ZERO,
                U256::ZERO,
            )
                .abi_encode_params(),
        };
        return Ok(encoded.into());
    }

    if selector == createMiningRightsCall::SELECTOR {
        createMiningRightsCall::abi_decode(&input).map_err(malformed)?;
        let next = state.rights.keys().next_back().copied().unwrap_or(0) + 1;
        return Ok(U256::from(next).abi_encode().into());
    }

    if selector == placeBidCall::SELECTOR {
        let call = placeBidCall::abi_decode(&input).map_err(malformed)?;
        let id: u64 = call.rightsId.saturating_to();
        let Some(rights) = state.rights.get(&id) else {
            return Err(BlockchainError::Reverted("rights do not exist".to_string()));
        };
        if !rights.is_active {
            return Err(BlockchainError::Reverted("auction not active".to_string()));
        }
        if tx.value.unwrap_or_default() != U256::from(call.amount) {
            return Err(BlockchainError::Reverted("value mismatch".to_string()));
        }
        if call.amount <= rights.current_bid {
            return Err(BlockchainError::Reverted("bid too low".to_string()));
        }
        return Ok(U256::from(rights.bid_count + 1).abi_encode().into());
    }

    Err(BlockchainError::Reverted("unknown selector".to_string()))
}

impl ChainClient for MockChain {
    async fn block_number(&self) -> BlockchainResult<u64> {
        Ok(self.state.lock().unwrap().block)
    }

    async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        simulate(&state, &tx)
    }

    async fn send_transaction(
        &self,
        tx: TransactionRequest,
        _wallet: &EthereumWallet,
    ) -> BlockchainResult<TxHash> {
        let mut state = self.state.lock().unwrap();
        if state.reject_sends {
            return Err(BlockchainError::Rejected("user rejected transaction".to_string()));
        }
        state.tx_counter += 1;
        let hash = keccak256(state.tx_counter.to_be_bytes());
        state.sent.push(tx.clone());
        state.pending.push((hash, tx));
        Ok(hash)
    }

    async fn receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<ReceiptSummary>> {
        let mut state = self.state.lock().unwrap();
        if state.receipt_failures > 0 {
            state.receipt_failures -= 1;
            return Err(BlockchainError::Timeout(1));
        }
        Ok(state.receipts.get(&tx_hash).copied())
    }
}

/// Gateway, connected session and notification inbox over a fresh chain.
pub struct Harness {
    pub chain: Arc<MockChain>,
    pub gateway: ContractGateway<MockChain>,
    pub session: WalletSession,
    pub inbox: mpsc::UnboundedReceiver<Notification>,
}

impl Harness {
    pub fn new() -> Self {
        let chain = MockChain::new();
        let (tx, inbox) = mpsc::unbounded_channel();
        let notifier = Arc::new(tx);
        let gateway = ContractGateway::new(chain.clone(), CONTRACT, notifier.clone());
        let session = WalletSession::new(Box::new(MockWallet::new()), notifier);
        Self {
            chain,
            gateway,
            session,
            inbox,
        }
    }

    pub fn connected() -> Self {
        let mut harness = Self::new();
        harness.session.connect().unwrap();
        harness.drain();
        harness
    }

    /// Notifications received since the last drain.
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut received = Vec::new();
        while let Ok(n) = self.inbox.try_recv() {
            received.push(n);
        }
        received
    }
}

pub fn fast_tracker_config() -> TrackerConfig {
    TrackerConfig {
        poll_interval_ms: 10,
        confirmation_timeout_secs: None,
    }
}
