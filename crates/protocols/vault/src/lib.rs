//! Legato Lock-in Staking Vault
//!
//! Users deposit APT into a maturity-dated vault and receive principal
//! tokens (PT) redeemable for APT at maturity. The vault pays a fixed annual
//! rate, prorated by the days left until maturity at deposit time.
//!
//! # Features
//!
//! - Payout projection (simple interest, no compounding)
//! - Mint payload construction for the wallet
//! - Single-flight mint workflow over external submitter/watcher seams
//! - Balance tracking and the panel session tying it together
//!
//! # Example
//!
//! ```ignore
//! use vault::{SessionDeps, VaultSession};
//!
//! let session = VaultSession::new(config.vault, deps);
//! session.start().await;
//! session.on_amount_input("2.5").await?;
//! let receipt = session.on_next().await?;
//! println!("Minted in {}", receipt.tx_hash);
//! ```

pub mod balance;
pub mod calculator;
pub mod constants;
pub mod session;
pub mod state;
pub mod tx_builder;
pub mod workflow;

// Re-exports
pub use balance::BalanceTracker;
pub use calculator::{days_remaining, estimate, project};
pub use constants::*;
pub use session::{SessionDeps, VaultSession};
pub use state::*;
pub use tx_builder::build_mint_payload;
pub use workflow::MintWorkflow;
