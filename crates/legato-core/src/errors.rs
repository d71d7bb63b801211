//! Error types for Legato

use thiserror::Error;

/// Core errors that can occur in Legato
#[derive(Debug, Error)]
pub enum Error {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors raised locally, before anything reaches the wallet or the chain
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolError {
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Amount must be > {minimum}")]
    BelowMinimum { amount: f64, minimum: f64 },

    #[error("A mint is already in progress")]
    WorkflowBusy,

    #[error("No wallet connected")]
    WalletNotConnected,

    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },
}

/// Failures reported by the external wallet, node, or indexer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Transaction submission failed: {reason}")]
    Submission { reason: String },

    #[error("Transaction did not reach finality: {reason}")]
    Finality { reason: String },

    #[error("Balance query failed: {reason}")]
    Query { reason: String },

    #[error("Resource not found: {resource}")]
    ResourceNotFound { resource: String },
}

/// Result type alias for Legato operations
pub type Result<T> = std::result::Result<T, Error>;

impl ProtocolError {
    /// Shorthand for an `InvalidAmount` with a formatted message
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount {
            message: message.into(),
        }
    }

    /// Get a stable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::BelowMinimum { .. } => "below_minimum",
            Self::WorkflowBusy => "workflow_busy",
            Self::WalletNotConnected => "wallet_not_connected",
            Self::InvalidAddress { .. } => "invalid_address",
        }
    }
}

impl LedgerError {
    /// Get a stable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Submission { .. } => "submission_error",
            Self::Finality { .. } => "finality_error",
            Self::Query { .. } => "query_error",
            Self::ResourceNotFound { .. } => "resource_not_found",
        }
    }

    /// The message exactly as the external collaborator reported it
    pub fn reason(&self) -> &str {
        match self {
            Self::Submission { reason } | Self::Finality { reason } | Self::Query { reason } => {
                reason
            }
            Self::ResourceNotFound { resource } => resource,
        }
    }

    /// An account that never held an asset has no CoinStore yet.
    pub fn is_resource_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }
}

impl Error {
    /// Get a stable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Protocol(e) => e.error_code(),
            Self::Ledger(e) => e.error_code(),
            Self::Config(_) => "config_error",
            Self::Serialization(_) => "serialization_error",
        }
    }
}
