//! In-memory collaborators for tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use legato_core::{Address, AssetType, LedgerError, Octas, TxHash};
use tokio::sync::Notify;

use crate::{
    AccountProvider, BalanceQuery, ConfirmationWatcher, EntryFunctionPayload, Result,
    TransactionSubmitter,
};

/// Wallet account that can be connected and disconnected at will
#[derive(Default)]
pub struct MockAccount {
    address: Mutex<Option<Address>>,
}

impl MockAccount {
    pub fn connected(address: Address) -> Self {
        Self {
            address: Mutex::new(Some(address)),
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn set(&self, address: Option<Address>) {
        *self.address.lock().unwrap() = address;
    }
}

impl AccountProvider for MockAccount {
    fn current_account(&self) -> Option<Address> {
        self.address.lock().unwrap().clone()
    }
}

/// Holds a mock call open until the test lets it go
#[derive(Default)]
pub struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    /// Resolves once the gated call has started
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Let the gated call finish
    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

pub struct MockSubmitter {
    outcome: std::result::Result<TxHash, String>,
    gate: Option<Arc<Gate>>,
    call_count: Arc<Mutex<usize>>,
    last_payload: Arc<Mutex<Option<EntryFunctionPayload>>>,
}

impl MockSubmitter {
    pub fn new_success(tx_hash: impl Into<String>) -> Self {
        Self {
            outcome: Ok(TxHash::new(tx_hash)),
            gate: None,
            call_count: Arc::new(Mutex::new(0)),
            last_payload: Arc::new(Mutex::new(None)),
        }
    }

    pub fn new_failure(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(reason.into()),
            gate: None,
            call_count: Arc::new(Mutex::new(0)),
            last_payload: Arc::new(Mutex::new(None)),
        }
    }

    /// Block every `submit` until the returned gate is released
    pub fn with_gate(mut self) -> (Self, Arc<Gate>) {
        let gate = Arc::new(Gate::default());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_last_payload(&self) -> Option<EntryFunctionPayload> {
        self.last_payload.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionSubmitter for MockSubmitter {
    async fn submit(&self, payload: EntryFunctionPayload) -> Result<TxHash> {
        *self.call_count.lock().unwrap() += 1;
        *self.last_payload.lock().unwrap() = Some(payload);

        if let Some(gate) = &self.gate {
            gate.pass().await;
        }

        self.outcome
            .clone()
            .map_err(|reason| LedgerError::Submission { reason })
    }
}

pub struct MockWatcher {
    failure_reason: Option<String>,
    gate: Option<Arc<Gate>>,
    call_count: Arc<Mutex<usize>>,
    last_hash: Arc<Mutex<Option<TxHash>>>,
}

impl MockWatcher {
    pub fn new_success() -> Self {
        Self {
            failure_reason: None,
            gate: None,
            call_count: Arc::new(Mutex::new(0)),
            last_hash: Arc::new(Mutex::new(None)),
        }
    }

    pub fn new_failure(reason: impl Into<String>) -> Self {
        Self {
            failure_reason: Some(reason.into()),
            ..Self::new_success()
        }
    }

    /// Block every `await_finality` until the returned gate is released
    pub fn with_gate(mut self) -> (Self, Arc<Gate>) {
        let gate = Arc::new(Gate::default());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_last_hash(&self) -> Option<TxHash> {
        self.last_hash.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmationWatcher for MockWatcher {
    async fn await_finality(&self, tx_hash: &TxHash) -> Result<()> {
        *self.call_count.lock().unwrap() += 1;
        *self.last_hash.lock().unwrap() = Some(tx_hash.clone());

        if let Some(gate) = &self.gate {
            gate.pass().await;
        }

        match &self.failure_reason {
            Some(reason) => Err(LedgerError::Finality {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Balances keyed by asset. Assets never configured report
/// `ResourceNotFound`, like an account without a CoinStore.
#[derive(Default)]
pub struct MockBalanceQuery {
    balances: Mutex<HashMap<AssetType, std::result::Result<Octas, LedgerError>>>,
    call_count: Mutex<usize>,
}

impl MockBalanceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(self, asset: &AssetType, amount: Octas) -> Self {
        self.set_balance(asset, amount);
        self
    }

    pub fn with_error(self, asset: &AssetType, error: LedgerError) -> Self {
        self.balances
            .lock()
            .unwrap()
            .insert(asset.clone(), Err(error));
        self
    }

    pub fn set_balance(&self, asset: &AssetType, amount: Octas) {
        self.balances
            .lock()
            .unwrap()
            .insert(asset.clone(), Ok(amount));
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl BalanceQuery for MockBalanceQuery {
    async fn query_balance(&self, _address: &Address, asset: &AssetType) -> Result<Octas> {
        *self.call_count.lock().unwrap() += 1;

        self.balances
            .lock()
            .unwrap()
            .get(asset)
            .cloned()
            .unwrap_or_else(|| {
                Err(LedgerError::ResourceNotFound {
                    resource: asset.coin_store(),
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apt() -> AssetType {
        AssetType::new("0x1::aptos_coin::AptosCoin")
    }

    #[tokio::test]
    async fn test_submitter_records_calls() {
        let mock = MockSubmitter::new_success("0xfeed");
        let payload = EntryFunctionPayload::new("0x1", "vault", "mint").with_u64_argument(7);

        let hash = mock.submit(payload.clone()).await.unwrap();

        assert_eq!(hash.as_str(), "0xfeed");
        assert_eq!(mock.get_call_count(), 1);
        assert_eq!(mock.get_last_payload(), Some(payload));
    }

    #[tokio::test]
    async fn test_submitter_failure_is_verbatim() {
        let mock = MockSubmitter::new_failure("User rejected the request.");
        let err = mock
            .submit(EntryFunctionPayload::new("0x1", "vault", "mint"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::Submission {
                reason: "User rejected the request.".into()
            }
        );
    }

    #[tokio::test]
    async fn test_gate_holds_submit_open() {
        let (mock, gate) = MockSubmitter::new_success("0x1").with_gate();
        let mock = Arc::new(mock);

        let task = {
            let mock = mock.clone();
            tokio::spawn(async move {
                mock.submit(EntryFunctionPayload::new("0x1", "vault", "mint"))
                    .await
            })
        };

        gate.wait_entered().await;
        assert_eq!(mock.get_call_count(), 1);
        assert!(!task.is_finished());

        gate.release();
        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_balance_query_defaults_to_not_found() {
        let addr = Address::new("0x1");
        let mock = MockBalanceQuery::new();

        let err = mock.query_balance(&addr, &apt()).await.unwrap_err();
        assert!(err.is_resource_not_found());

        mock.set_balance(&apt(), 500_000_000);
        assert_eq!(mock.query_balance(&addr, &apt()).await.unwrap(), 500_000_000);
        assert_eq!(mock.get_call_count(), 2);
    }

    #[test]
    fn test_account_connect_disconnect() {
        let account = MockAccount::disconnected();
        assert!(account.current_account().is_none());

        account.set(Some(Address::new("0x1")));
        assert_eq!(account.current_account(), Some(Address::new("0x1")));
    }
}
