//! Vault State Types
//!
//! Maturity term, mint requests, workflow lifecycle, and panel snapshots.

use legato_core::{Octas, ProtocolError, Timestamp, TxHash, VaultConfig};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed maturity and rate of one vault. Built once from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaturityTerm {
    pub maturity_timestamp: Timestamp,
    pub annual_rate: f64,
}

impl MaturityTerm {
    pub fn new(maturity_timestamp: Timestamp, annual_rate: f64) -> Self {
        Self {
            maturity_timestamp,
            annual_rate,
        }
    }

    pub fn from_config(config: &VaultConfig) -> Self {
        Self::new(config.maturity_timestamp, config.annual_rate)
    }
}

/// Projected payout at maturity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    /// Display amount of PT redeemable at maturity
    pub payout: f64,
    /// Days until maturity; negative once the term has passed
    pub days_remaining: f64,
    /// The term has already matured. The payout is still computed from the
    /// negative day count and ends up below principal.
    pub expired: bool,
}

/// One deposit attempt as entered by the user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MintRequest {
    /// Display amount as typed
    pub raw_input_amount: f64,
    /// Balance shown when the request was made
    pub current_available_balance: f64,
}

/// Outcome of a confirmed mint
#[derive(Debug, Clone, PartialEq)]
pub struct MintReceipt {
    pub attempt_id: Uuid,
    pub tx_hash: TxHash,
    pub amount: f64,
    pub base_units: Octas,
}

/// Lifecycle of a single mint attempt
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Validating {
        amount: f64,
    },
    Rejected {
        reason: ProtocolError,
    },
    Submitting {
        amount: f64,
        base_units: Octas,
    },
    AwaitingConfirmation {
        tx_hash: TxHash,
    },
    Succeeded {
        tx_hash: TxHash,
    },
    Failed {
        reason: String,
    },
}

impl WorkflowState {
    /// A submit in these states would start a second concurrent mint
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Self::Validating { .. } | Self::Submitting { .. } | Self::AwaitingConfirmation { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating { .. } => "validating",
            Self::Rejected { .. } => "rejected",
            Self::Submitting { .. } => "submitting",
            Self::AwaitingConfirmation { .. } => "awaiting_confirmation",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }

    /// The single human-readable message for the panel, if any
    pub fn status_message(&self) -> Option<String> {
        match self {
            Self::Rejected { reason } => Some(reason.to_string()),
            Self::Failed { reason } => Some(reason.clone()),
            _ => None,
        }
    }
}

/// Which balance the panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelTab {
    /// Base asset balance
    #[default]
    Deposit,
    /// Receipt token balance
    Withdraw,
}

/// Everything the panel renders, already formatted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub tab: PanelTab,
    pub symbol: String,
    pub available: String,
    pub fixed_apy: String,
    pub estimate: String,
    pub maturity_date: String,
    pub expired: bool,
    pub loading: bool,
    pub status_message: Option<String>,
    pub account: Option<String>,
}
