//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint (primary + failovers)
//! - Query chain state (block number, nonce, gas price, receipts)
//! - Simulate calls and broadcast signed transactions
//! - Handle timeouts and network errors gracefully

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{Ethereum, EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::TransportError;
use tokio::time::timeout;

use crate::blockchain::chain::ChainClient;
use crate::blockchain::types::{
    BlockchainConfig, BlockchainError, BlockchainResult, ChainId, ReceiptSummary,
};
use crate::observability::metrics;

type SharedProvider = Arc<dyn Provider + Send + Sync>;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<SharedProvider>,
    /// Configuration.
    config: BlockchainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// Fails only on an unparseable primary URL; an unreachable node or a
    /// chain ID mismatch is logged and left for the first request to surface.
    pub async fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        // 1. Add primary provider
        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as SharedProvider);

        // 2. Add failover providers
        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as SharedProvider);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            config: config.clone(),
            timeout_duration,
        };

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "Blockchain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Run `op` against each provider in order until one answers.
    ///
    /// An error response from a node is final: the node was reached and
    /// refused, so asking a failover would not change the answer.
    async fn with_failover<T, F, Fut>(&self, method: &'static str, op: F) -> BlockchainResult<T>
    where
        F: Fn(SharedProvider) -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut all_timed_out = true;
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, op(provider.clone())).await {
                Ok(Ok(result)) => {
                    metrics::record_rpc_request(method, true);
                    return Ok(result);
                }
                Ok(Err(e)) => {
                    metrics::record_rpc_request(method, false);
                    if let Some(payload) = e.as_error_resp() {
                        return Err(BlockchainError::Rejected(payload.message.to_string()));
                    }
                    all_timed_out = false;
                    tracing::warn!(provider_idx = i, method, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    metrics::record_rpc_request(method, false);
                    tracing::warn!(provider_idx = i, method, "RPC timeout, trying next provider");
                }
            }
        }

        if all_timed_out {
            Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
        } else {
            Err(BlockchainError::Rpc(format!("All RPC providers failed for {}", method)))
        }
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.with_failover("eth_chainId", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.with_failover("eth_blockNumber", |p| async move { p.get_block_number().await })
            .await
    }

    /// Next nonce for `address`, counting transactions still in the mempool.
    pub async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        self.with_failover("eth_getTransactionCount", |p| async move {
            p.get_transaction_count(address).pending().await
        })
        .await
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> BlockchainResult<u128> {
        self.with_failover("eth_gasPrice", |p| async move { p.get_gas_price().await })
            .await
    }

    /// Gas price with the configured multiplier applied, refused above the cap.
    pub async fn checked_gas_price(&self) -> BlockchainResult<u128> {
        let gas_price = self.get_gas_price().await?;
        let gas_price_gwei = gas_price / 1_000_000_000;

        if gas_price_gwei > self.config.max_gas_price_gwei as u128 {
            return Err(BlockchainError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei: self.config.max_gas_price_gwei,
            });
        }

        Ok((gas_price as f64 * self.config.gas_price_multiplier) as u128)
    }

    /// Estimate gas for a request.
    pub async fn estimate_gas(&self, tx: &TransactionRequest) -> BlockchainResult<u64> {
        self.with_failover("eth_estimateGas", |p| {
            let tx = tx.clone();
            async move { p.estimate_gas(tx).await }
        })
        .await
    }

    /// Check if the blockchain is reachable and healthy.
    pub async fn is_healthy(&self) -> bool {
        self.get_block_number().await.is_ok()
    }

    /// Get the number of confirmation blocks required.
    pub fn confirmation_blocks(&self) -> u32 {
        self.config.confirmation_blocks
    }
}

impl ChainClient for BlockchainClient {
    async fn block_number(&self) -> BlockchainResult<u64> {
        self.get_block_number().await
    }

    async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        self.with_failover("eth_call", |p| {
            let tx = tx.clone();
            async move { p.call(tx).await }
        })
        .await
        .map_err(|e| match e {
            BlockchainError::Rejected(message) => BlockchainError::Reverted(message),
            other => other,
        })
    }

    async fn send_transaction(
        &self,
        tx: TransactionRequest,
        wallet: &EthereumWallet,
    ) -> BlockchainResult<TxHash> {
        let from = tx
            .from
            .ok_or_else(|| BlockchainError::Wallet("Transaction has no sender".to_string()))?;

        let nonce = self.get_transaction_count(from).await?;
        let gas_price = self.checked_gas_price().await?;
        let gas_limit = self.estimate_gas(&tx).await?;

        let tx = tx
            .with_nonce(nonce)
            .with_gas_price(gas_price)
            .with_gas_limit(gas_limit)
            .with_chain_id(self.config.chain_id);

        let envelope = <TransactionRequest as TransactionBuilder<Ethereum>>::build(tx, wallet)
            .await
            .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))?;
        let raw = envelope.encoded_2718();

        let tx_hash = self
            .with_failover("eth_sendRawTransaction", |p| {
                let raw = raw.clone();
                async move {
                    let pending = p.send_raw_transaction(&raw).await?;
                    Ok(*pending.tx_hash())
                }
            })
            .await?;

        tracing::info!(tx_hash = %tx_hash, from = %from, nonce, "Transaction broadcast");
        Ok(tx_hash)
    }

    async fn receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<ReceiptSummary>> {
        let receipt = self
            .with_failover("eth_getTransactionReceipt", |p| async move {
                p.get_transaction_receipt(tx_hash).await
            })
            .await?;

        Ok(receipt.and_then(|r| {
            r.block_number.map(|block_number| ReceiptSummary {
                block_number,
                success: r.status(),
            })
        }))
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
