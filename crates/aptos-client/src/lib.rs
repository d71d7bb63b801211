//! aptos-client: Wallet and ledger collaborator interfaces
//!
//! The vault never talks to the wallet extension or the fullnode directly.
//! It goes through the traits below, which an embedding application
//! implements on top of its wallet adapter and SDK client. Transport,
//! signing, and key management live entirely on the other side of these
//! seams.

pub mod payload;
pub mod watcher;

#[cfg(feature = "mock")]
pub mod mock;

use async_trait::async_trait;
use legato_core::{Address, AssetType, LedgerError, Octas, TxHash};

pub use payload::EntryFunctionPayload;
pub use watcher::{PollingWatcher, TransactionLookup, TxStatus};

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// The connected wallet account, if any
pub trait AccountProvider: Send + Sync {
    /// Presence implies a connected wallet
    fn current_account(&self) -> Option<Address>;
}

/// Signs and broadcasts an entry function call through the wallet
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Resolves once with the transaction hash, or `LedgerError::Submission`
    /// carrying the wallet's message (user rejection, insufficient funds,
    /// network failure).
    async fn submit(&self, payload: EntryFunctionPayload) -> Result<TxHash>;
}

/// Waits for a submitted transaction to be committed
#[async_trait]
pub trait ConfirmationWatcher: Send + Sync {
    /// Resolves once. No caller-side timeout: whatever the implementation
    /// enforces is what applies. Failure is `LedgerError::Finality`.
    async fn await_finality(&self, tx_hash: &TxHash) -> Result<()>;
}

/// Reads coin balances
#[async_trait]
pub trait BalanceQuery: Send + Sync {
    /// Balance of `asset` held by `address`, in base units.
    ///
    /// Returns `LedgerError::ResourceNotFound` when the account has never
    /// registered a CoinStore for the asset.
    async fn query_balance(&self, address: &Address, asset: &AssetType) -> Result<Octas>;
}
