//! Configuration types for Legato

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{AssetType, Error, Network, Timestamp};

/// Known vault deployments
pub mod deployments {
    /// Aptos testnet, April 2024 maturity
    pub mod testnet_apr_2024 {
        pub const MODULE_ADDRESS: &str =
            "0x7bf8c83deaef80763a95c2727e36815cb66282024814df39c6170ee6f04bdd37";

        /// Type argument naming the maturity-dated vault
        pub const MATURITY_TYPE: &str = "0x7bf8c83deaef80763a95c2727e36815cb66282024814df39c6170ee6f04bdd37::vault_maturity_dates::APR_2024";

        pub const BASE_ASSET_TYPE: &str = "0x1::aptos_coin::AptosCoin";

        pub const RECEIPT_ASSET_TYPE: &str = "0x7bf8c83deaef80763a95c2727e36815cb66282024814df39c6170ee6f04bdd37::vault::PT_TOKEN<0x7bf8c83deaef80763a95c2727e36815cb66282024814df39c6170ee6f04bdd37::vault_maturity_dates::APR_2024>";

        /// 2024-04-30T13:16:53Z
        pub const MATURITY_TIMESTAMP: i64 = 1_714_483_013;

        /// Fixed 5% APY
        pub const ANNUAL_RATE: f64 = 0.05;

        pub const RECEIPT_SYMBOL: &str = "PT-APR24";
    }
}

/// Vault deployment parameters. Static for the life of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Address the vault module is published under
    pub module_address: String,

    /// Type argument identifying the maturity-dated instrument
    pub maturity_type: String,

    /// Coin deposited into the vault
    pub base_asset: AssetType,

    /// Principal token minted in exchange
    pub receipt_asset: AssetType,

    /// Display symbol of the receipt token
    #[serde(default = "default_receipt_symbol")]
    pub receipt_symbol: String,

    /// Unix seconds after which the receipt token redeems at full value
    pub maturity_timestamp: Timestamp,

    /// Fixed annual rate as a fraction (0.05 = 5%)
    pub annual_rate: f64,

    /// Deposits must be strictly greater than this display amount
    #[serde(default = "default_min_deposit")]
    pub min_deposit: f64,
}

fn default_receipt_symbol() -> String {
    deployments::testnet_apr_2024::RECEIPT_SYMBOL.to_string()
}

fn default_min_deposit() -> f64 {
    1.0
}

impl Default for VaultConfig {
    fn default() -> Self {
        use deployments::testnet_apr_2024 as d;
        Self {
            module_address: d::MODULE_ADDRESS.to_string(),
            maturity_type: d::MATURITY_TYPE.to_string(),
            base_asset: AssetType::new(d::BASE_ASSET_TYPE),
            receipt_asset: AssetType::new(d::RECEIPT_ASSET_TYPE),
            receipt_symbol: default_receipt_symbol(),
            maturity_timestamp: d::MATURITY_TIMESTAMP,
            annual_rate: d::ANNUAL_RATE,
            min_deposit: default_min_deposit(),
        }
    }
}

impl VaultConfig {
    /// Reject parameters no deployment could have
    pub fn validate(&self) -> Result<(), Error> {
        if self.module_address.is_empty() || self.maturity_type.is_empty() {
            return Err(Error::Config(
                "module_address and maturity_type are required".to_string(),
            ));
        }
        if !self.annual_rate.is_finite() || self.annual_rate < 0.0 {
            return Err(Error::Config(format!(
                "annual_rate must be a non-negative number, got {}",
                self.annual_rate
            )));
        }
        if !self.min_deposit.is_finite() || self.min_deposit < 0.0 {
            return Err(Error::Config(format!(
                "min_deposit must be a non-negative number, got {}",
                self.min_deposit
            )));
        }
        Ok(())
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Network the vault is deployed on
    #[serde(default = "default_network")]
    pub network: Network,

    /// Vault deployment
    #[serde(default)]
    pub vault: VaultConfig,
}

fn default_network() -> Network {
    Network::Testnet
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            vault: VaultConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON config document
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        config.vault.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }
}
