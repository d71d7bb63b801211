//! Vault Constants
//!
//! Module layout and display parameters. Deployment addresses and the
//! maturity term live in `legato_core::config::deployments`.

/// Move module holding the vault entry functions
pub const VAULT_MODULE: &str = "vault";

/// Entry function that deposits the base asset and mints PT
pub const MINT_FUNCTION: &str = "mint";

/// Display symbol of the base asset
pub const BASE_SYMBOL: &str = "APT";

/// Decimal places shown for balances and projections
pub const DISPLAY_PLACES: usize = 3;

/// strftime pattern for the maturity date label
pub const MATURITY_DATE_FORMAT: &str = "%B %-d, %Y";
