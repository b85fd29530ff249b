//! The chain-client capability consumed by the gateway and tracker.

use std::future::Future;

use alloy::network::EthereumWallet;
use alloy::primitives::{Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::types::{BlockchainResult, ReceiptSummary};

/// Minimal view of a chain: read calls, signed submission, receipts.
///
/// [`BlockchainClient`](crate::blockchain::BlockchainClient) implements it over
/// JSON-RPC; tests substitute an in-memory chain.
pub trait ChainClient: Send + Sync {
    /// Latest block number.
    fn block_number(&self) -> impl Future<Output = BlockchainResult<u64>> + Send;

    /// Execute `tx` as a read-only call against the latest block.
    fn call(&self, tx: TransactionRequest) -> impl Future<Output = BlockchainResult<Bytes>> + Send;

    /// Fill, sign with `wallet` and broadcast `tx`. `tx.from` must be set.
    fn send_transaction(
        &self,
        tx: TransactionRequest,
        wallet: &EthereumWallet,
    ) -> impl Future<Output = BlockchainResult<TxHash>> + Send;

    /// Receipt for `tx_hash`, `None` while the transaction is unmined.
    fn receipt(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = BlockchainResult<Option<ReceiptSummary>>> + Send;
}
