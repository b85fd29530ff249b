//! Transaction confirmation tracking.
//!
//! # States
//! ```text
//! (no handle) → Confirming → Confirmed
//!                          ↘ Failed(Reverted | Dropped)
//! ```
//!
//! Each handle gets one polling task. Dropping the [`TrackedTransaction`]
//! stops observation; it never cancels the transaction itself.

use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::primitives::TxHash;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use uuid::Uuid;

use crate::blockchain::chain::ChainClient;
use crate::blockchain::types::{FailureReason, ReceiptSummary, TransactionHandle, TxStatus};
use crate::config::TrackerConfig;
use crate::observability::metrics;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("Transaction {0} is already being tracked")]
    AlreadyTracked(TxHash),
}

/// One poll result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// No receipt yet.
    Pending,
    /// Receipt present; `current_block` is the chain head at poll time.
    Mined {
        receipt: ReceiptSummary,
        current_block: u64,
    },
    /// The confirmation deadline passed without a receipt.
    TimedOut { waited_secs: u64 },
}

/// Monotonic state machine over a single handle.
#[derive(Debug, Clone)]
pub struct TxLifecycle {
    status: TxStatus,
    required_confirmations: u32,
}

impl TxLifecycle {
    /// Lifecycle of a handle that has just been produced.
    pub fn submitted(required_confirmations: u32) -> Self {
        Self {
            status: TxStatus::Confirming,
            required_confirmations: required_confirmations.max(1),
        }
    }

    pub fn status(&self) -> &TxStatus {
        &self.status
    }

    /// Apply an observation; returns the new status if it changed.
    ///
    /// Terminal states absorb every later observation.
    pub fn observe(&mut self, observation: Observation) -> Option<TxStatus> {
        if self.status.is_terminal() {
            return None;
        }

        let next = match observation {
            Observation::Pending => return None,
            Observation::Mined {
                receipt,
                current_block,
            } => {
                if !receipt.success {
                    TxStatus::Failed(FailureReason::Reverted {
                        block_number: receipt.block_number,
                    })
                } else {
                    // The inclusion block counts as the first confirmation.
                    let confirmations =
                        current_block.saturating_sub(receipt.block_number).saturating_add(1);
                    if confirmations < self.required_confirmations as u64 {
                        return None;
                    }
                    TxStatus::Confirmed {
                        block_number: receipt.block_number,
                    }
                }
            }
            Observation::TimedOut { waited_secs } => {
                TxStatus::Failed(FailureReason::Dropped { waited_secs })
            }
        };

        self.status = next.clone();
        Some(next)
    }
}

/// Polls the chain for submitted transactions.
pub struct TransactionTracker<C> {
    client: Arc<C>,
    poll_interval: Duration,
    confirmation_timeout: Option<Duration>,
    required_confirmations: u32,
    active: Arc<DashMap<TxHash, Uuid>>,
}

impl<C: ChainClient + 'static> TransactionTracker<C> {
    pub fn new(client: Arc<C>, config: &TrackerConfig, required_confirmations: u32) -> Self {
        Self {
            client,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            confirmation_timeout: config.confirmation_timeout_secs.map(Duration::from_secs),
            required_confirmations,
            active: Arc::new(DashMap::new()),
        }
    }

    /// Start observing `handle`.
    ///
    /// The returned value reports `Confirming` immediately.
    pub fn track(&self, handle: &TransactionHandle) -> Result<TrackedTransaction, TrackerError> {
        let hash = handle.hash();
        let tracker_id = Uuid::new_v4();

        match self.active.entry(hash) {
            Entry::Occupied(_) => return Err(TrackerError::AlreadyTracked(hash)),
            Entry::Vacant(slot) => {
                slot.insert(tracker_id);
            }
        }

        let (status_tx, status_rx) = watch::channel(TxStatus::Confirming);
        let poller = Poller {
            client: self.client.clone(),
            hash,
            poll_interval: self.poll_interval,
            confirmation_timeout: self.confirmation_timeout,
            lifecycle: TxLifecycle::submitted(self.required_confirmations),
        };

        tracing::info!(
            tx_hash = %hash,
            action = handle.action().as_str(),
            tracker_id = %tracker_id,
            "Tracking transaction"
        );
        let task = tokio::spawn(poller.run(status_tx));

        Ok(TrackedTransaction {
            hash,
            tracker_id,
            status: status_rx,
            task,
            active: self.active.clone(),
        })
    }

    /// Track `handle` and wait for a terminal status.
    pub async fn wait_for_confirmation(
        &self,
        handle: &TransactionHandle,
    ) -> Result<TxStatus, TrackerError> {
        let mut tracked = self.track(handle)?;
        Ok(tracked.resolved().await)
    }

    /// Whether some live tracker observes `hash`.
    pub fn is_tracking(&self, hash: &TxHash) -> bool {
        self.active.contains_key(hash)
    }

    /// Number of live trackers.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

struct Poller<C> {
    client: Arc<C>,
    hash: TxHash,
    poll_interval: Duration,
    confirmation_timeout: Option<Duration>,
    lifecycle: TxLifecycle,
}

impl<C: ChainClient> Poller<C> {
    async fn run(mut self, status_tx: watch::Sender<TxStatus>) {
        let started = Instant::now();
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let mut observation = self.observe().await;
            if observation == Observation::Pending {
                if let Some(limit) = self.confirmation_timeout {
                    if started.elapsed() >= limit {
                        observation = Observation::TimedOut {
                            waited_secs: started.elapsed().as_secs(),
                        };
                    }
                }
            }

            let Some(next) = self.lifecycle.observe(observation) else {
                continue;
            };

            status_tx.send_replace(next.clone());
            let elapsed = started.elapsed().as_secs_f64();
            match &next {
                TxStatus::Confirmed { block_number } => {
                    tracing::info!(tx_hash = %self.hash, block_number, "Transaction confirmed");
                }
                TxStatus::Failed(reason) => {
                    tracing::warn!(tx_hash = %self.hash, reason = ?reason, "Transaction failed");
                }
                _ => {}
            }
            metrics::record_resolution(next.as_str(), elapsed);
            break;
        }
    }

    async fn observe(&self) -> Observation {
        let receipt = match self.client.receipt(self.hash).await {
            Ok(Some(receipt)) => receipt,
            Ok(None) => {
                tracing::debug!(tx_hash = %self.hash, "Transaction pending");
                return Observation::Pending;
            }
            Err(e) => {
                tracing::warn!(tx_hash = %self.hash, error = %e, "Receipt poll failed");
                return Observation::Pending;
            }
        };

        match self.client.block_number().await {
            Ok(current_block) => Observation::Mined {
                receipt,
                current_block,
            },
            Err(e) => {
                tracing::warn!(tx_hash = %self.hash, error = %e, "Block number poll failed");
                Observation::Pending
            }
        }
    }
}

/// A handle under observation.
pub struct TrackedTransaction {
    hash: TxHash,
    tracker_id: Uuid,
    status: watch::Receiver<TxStatus>,
    task: JoinHandle<()>,
    active: Arc<DashMap<TxHash, Uuid>>,
}

impl TrackedTransaction {
    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// Registration id; matches the `tracker_id` field in log events.
    pub fn tracker_id(&self) -> Uuid {
        self.tracker_id
    }

    /// Latest known status.
    pub fn status(&self) -> TxStatus {
        self.status.borrow().clone()
    }

    /// Additional reader of the status stream.
    pub fn subscribe(&self) -> watch::Receiver<TxStatus> {
        self.status.clone()
    }

    /// Wait until the status is terminal.
    pub async fn resolved(&mut self) -> TxStatus {
        // Err means the poller is gone; the last sent status is final.
        let _ = self.status.wait_for(TxStatus::is_terminal).await;
        self.status.borrow().clone()
    }
}

impl Drop for TrackedTransaction {
    fn drop(&mut self) {
        self.task.abort();
        // Only release the slot this tracker registered.
        self.active.remove_if(&self.hash, |_, id| *id == self.tracker_id);
    }
}

impl std::fmt::Debug for TrackedTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedTransaction")
            .field("hash", &self.hash)
            .field("tracker_id", &self.tracker_id)
            .field("status", &*self.status.borrow())
            .finish()
    }
}
