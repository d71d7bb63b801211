//! Polling confirmation watcher
//!
//! Turns a point-in-time transaction lookup into a `ConfirmationWatcher` by
//! polling until the transaction is committed, fails, or the timeout runs
//! out. Mirrors the wallet SDK's `waitForTransaction`.

use std::time::Duration;

use async_trait::async_trait;
use legato_core::{LedgerError, TxHash};
use tokio::time::Instant;

use crate::{ConfirmationWatcher, Result};

/// How often to ask for the transaction
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Give up after this long. Matches the SDK default of 20 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// What the ledger currently knows about a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    /// Not indexed yet; freshly submitted transactions start here
    NotFound,
    /// In the mempool
    Pending,
    /// Committed and executed successfully
    Committed,
    /// Committed but the VM aborted it
    Failed { vm_status: String },
}

/// Single lookup of a transaction by hash
#[async_trait]
pub trait TransactionLookup: Send + Sync {
    async fn transaction_status(&self, tx_hash: &TxHash) -> Result<TxStatus>;
}

pub struct PollingWatcher<L> {
    lookup: L,
    poll_interval: Duration,
    timeout: Duration,
}

impl<L: TransactionLookup> PollingWatcher<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl<L: TransactionLookup> ConfirmationWatcher for PollingWatcher<L> {
    async fn await_finality(&self, tx_hash: &TxHash) -> Result<()> {
        let started = Instant::now();

        loop {
            match self.lookup.transaction_status(tx_hash).await {
                Ok(TxStatus::Committed) => {
                    tracing::debug!(%tx_hash, elapsed = ?started.elapsed(), "Transaction committed");
                    return Ok(());
                }
                Ok(TxStatus::Failed { vm_status }) => {
                    return Err(LedgerError::Finality { reason: vm_status });
                }
                Ok(TxStatus::Pending | TxStatus::NotFound) => {}
                Err(e) => {
                    // Transient lookup failures are retried until the timeout
                    tracing::debug!(%tx_hash, error = %e, "Transaction lookup failed");
                }
            }

            if started.elapsed() >= self.timeout {
                tracing::warn!(%tx_hash, timeout = ?self.timeout, "Gave up waiting for transaction");
                return Err(LedgerError::Finality {
                    reason: format!(
                        "Transaction {} was not committed within {}s",
                        tx_hash,
                        self.timeout.as_secs()
                    ),
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
