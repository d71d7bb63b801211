//! Vault Transaction Builder
//!
//! Builds the entry function payload handed to the wallet for signing.

use aptos_client::EntryFunctionPayload;
use legato_core::{Octas, VaultConfig};

use crate::constants::{MINT_FUNCTION, VAULT_MODULE};

/// `<module>::vault::mint<MATURITY>(amount)`
///
/// The base-unit amount is the only function argument; the maturity type
/// selects which vault receives the deposit.
pub fn build_mint_payload(config: &VaultConfig, base_units: Octas) -> EntryFunctionPayload {
    EntryFunctionPayload::new(&config.module_address, VAULT_MODULE, MINT_FUNCTION)
        .with_type_argument(config.maturity_type.clone())
        .with_u64_argument(base_units)
}
