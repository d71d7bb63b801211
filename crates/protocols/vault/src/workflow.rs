//! Mint workflow
//!
//! Drives one deposit at a time through
//! `Idle -> Validating -> Submitting -> AwaitingConfirmation -> Succeeded`,
//! branching to `Rejected` on local validation and to `Failed` on any
//! wallet or chain error. Nothing is retried.
//!
//! The current state lives in a `watch` channel so observers can follow
//! transitions. It is only ever touched synchronously; no lock is held
//! across the submitter or watcher awaits.

use std::sync::Arc;

use aptos_client::{AccountProvider, ConfirmationWatcher, TransactionSubmitter};
use legato_core::units::to_base_units;
use legato_core::{Address, Error, LedgerError, Octas, ProtocolError, VaultConfig};
use tokio::sync::watch;
use uuid::Uuid;

use crate::balance::BalanceTracker;
use crate::state::{MintReceipt, MintRequest, WorkflowState};
use crate::tx_builder::build_mint_payload;

const ABANDONED_REASON: &str = "Mint attempt abandoned before completion";

pub struct MintWorkflow {
    config: VaultConfig,
    account: Arc<dyn AccountProvider>,
    submitter: Arc<dyn TransactionSubmitter>,
    watcher: Arc<dyn ConfirmationWatcher>,
    balances: Arc<BalanceTracker>,
    state: watch::Sender<WorkflowState>,
}

impl MintWorkflow {
    pub fn new(
        config: VaultConfig,
        account: Arc<dyn AccountProvider>,
        submitter: Arc<dyn TransactionSubmitter>,
        watcher: Arc<dyn ConfirmationWatcher>,
        balances: Arc<BalanceTracker>,
    ) -> Self {
        let (state, _) = watch::channel(WorkflowState::Idle);
        Self {
            config,
            account,
            submitter,
            watcher,
            balances,
            state,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    /// Follow state transitions
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    /// Return a finished attempt to `Idle`
    pub fn reset(&self) -> Result<(), ProtocolError> {
        let mut busy = false;
        self.state.send_if_modified(|state| {
            if state.is_in_flight() {
                busy = true;
                return false;
            }
            *state = WorkflowState::Idle;
            true
        });
        if busy {
            Err(ProtocolError::WorkflowBusy)
        } else {
            Ok(())
        }
    }

    /// Record a request whose amount could not even be read.
    ///
    /// Lands in `Rejected` like any other validation failure, without
    /// touching the submitter.
    pub fn reject(&self, reason: ProtocolError) -> Result<(), ProtocolError> {
        let mut busy = false;
        self.state.send_if_modified(|state| {
            if state.is_in_flight() {
                busy = true;
                return false;
            }
            *state = WorkflowState::Rejected {
                reason: reason.clone(),
            };
            true
        });

        if busy {
            return Err(ProtocolError::WorkflowBusy);
        }
        tracing::debug!(error = %reason, "Mint request rejected before validation");
        Ok(())
    }

    /// Run one mint attempt to completion.
    ///
    /// Returns `WorkflowBusy` without touching the submitter if another
    /// attempt is still submitting or awaiting confirmation.
    pub async fn submit(&self, request: MintRequest) -> Result<MintReceipt, Error> {
        let amount = request.raw_input_amount;
        self.begin(amount)?;

        let attempt_id = Uuid::new_v4();
        let mut guard = AttemptGuard {
            state: &self.state,
            armed: true,
        };

        tracing::debug!(
            %attempt_id,
            amount,
            available = request.current_available_balance,
            "Validating mint request"
        );

        let (address, base_units) = match self.validate(amount) {
            Ok(valid) => valid,
            Err(reason) => {
                tracing::debug!(%attempt_id, error = %reason, "Mint request rejected");
                self.transition(WorkflowState::Rejected {
                    reason: reason.clone(),
                });
                guard.armed = false;
                return Err(reason.into());
            }
        };

        self.transition(WorkflowState::Submitting { amount, base_units });
        let payload = build_mint_payload(&self.config, base_units);
        tracing::debug!(%attempt_id, function = %payload.function, base_units, "Submitting mint");

        let tx_hash = match self.submitter.submit(payload).await {
            Ok(hash) => hash,
            Err(e) => {
                guard.armed = false;
                return Err(self.fail(attempt_id, e));
            }
        };

        self.transition(WorkflowState::AwaitingConfirmation {
            tx_hash: tx_hash.clone(),
        });
        tracing::debug!(%attempt_id, %tx_hash, "Awaiting finality");

        if let Err(e) = self.watcher.await_finality(&tx_hash).await {
            guard.armed = false;
            return Err(self.fail(attempt_id, e));
        }

        self.transition(WorkflowState::Succeeded {
            tx_hash: tx_hash.clone(),
        });
        guard.armed = false;
        tracing::info!(%attempt_id, %tx_hash, amount, base_units, "Mint confirmed");

        if let Err(e) = self.balances.refresh(&address).await {
            tracing::warn!(%attempt_id, error = %e, "Post-mint balance refresh failed");
        }

        Ok(MintReceipt {
            attempt_id,
            tx_hash,
            amount,
            base_units,
        })
    }

    /// Enter `Validating` unless an attempt is already in flight
    fn begin(&self, amount: f64) -> Result<(), ProtocolError> {
        let mut busy = false;
        self.state.send_if_modified(|state| {
            if state.is_in_flight() {
                busy = true;
                return false;
            }
            *state = WorkflowState::Validating { amount };
            true
        });

        if busy {
            tracing::debug!(amount, "Mint already in flight");
            return Err(ProtocolError::WorkflowBusy);
        }
        Ok(())
    }

    fn validate(&self, amount: f64) -> Result<(Address, Octas), ProtocolError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ProtocolError::invalid_amount(format!(
                "{amount} is not a valid deposit"
            )));
        }

        let minimum = self.config.min_deposit;
        if amount <= minimum {
            return Err(ProtocolError::BelowMinimum { amount, minimum });
        }

        let address = self
            .account
            .current_account()
            .ok_or(ProtocolError::WalletNotConnected)?;

        let base_units = to_base_units(amount)?;
        Ok((address, base_units))
    }

    fn fail(&self, attempt_id: Uuid, error: LedgerError) -> Error {
        tracing::warn!(%attempt_id, code = error.error_code(), error = %error, "Mint failed");
        self.transition(WorkflowState::Failed {
            reason: error.reason().to_string(),
        });
        error.into()
    }

    fn transition(&self, next: WorkflowState) {
        let to = next.name();
        let from = self.state.send_replace(next).name();
        tracing::debug!(from, to, "Mint state");
    }
}

/// Marks an attempt `Failed` if its future is dropped mid-flight, so the
/// single-flight guard does not stay engaged forever.
struct AttemptGuard<'a> {
    state: &'a watch::Sender<WorkflowState>,
    armed: bool,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.state.send_if_modified(|state| {
            if !state.is_in_flight() {
                return false;
            }
            tracing::warn!(state = state.name(), "Mint attempt dropped while in flight");
            *state = WorkflowState::Failed {
                reason: ABANDONED_REASON.to_string(),
            };
            true
        });
    }
}
