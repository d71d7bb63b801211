//! Core type definitions for Legato

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ProtocolError;

/// Aptos account address (0x-prefixed hex, up to 32 bytes)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Parse and validate an account address.
    ///
    /// Accepts the short form Aptos uses for special accounts (`0x1`) as well
    /// as the full 64 hex digit form.
    pub fn parse(addr: &str) -> Result<Self, ProtocolError> {
        let invalid = |reason: String| ProtocolError::InvalidAddress {
            address: addr.to_string(),
            reason,
        };

        let digits = addr
            .strip_prefix("0x")
            .ok_or_else(|| invalid("missing 0x prefix".to_string()))?;

        if digits.is_empty() || digits.len() > 64 {
            return Err(invalid(format!(
                "expected 1 to 64 hex digits, got {}",
                digits.len()
            )));
        }

        // hex::decode wants whole bytes
        let padded = if digits.len() % 2 == 1 {
            format!("0{digits}")
        } else {
            digits.to_string()
        };
        hex::decode(&padded).map_err(|e| invalid(e.to_string()))?;

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display, e.g. `0x7bf8...dd37`
    pub fn short(&self) -> String {
        // Chars, not bytes: provider addresses are not guaranteed ASCII
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 10 {
            return self.0.clone();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction hash handed back by the wallet after submission
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fully qualified Move type, e.g. `0x1::aptos_coin::AptosCoin`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetType(pub String);

impl AssetType {
    pub fn new(ty: impl Into<String>) -> Self {
        Self(ty.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The account resource that holds a balance of this coin type
    pub fn coin_store(&self) -> String {
        format!("0x1::coin::CoinStore<{}>", self.0)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Network type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Devnet => "devnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Base-unit amount (1 APT = 100_000_000 octas)
pub type Octas = u64;

/// Unix timestamp in seconds
pub type Timestamp = i64;

/// Constants
pub mod constants {
    use super::Octas;

    /// Decimal places of every coin handled here
    pub const DECIMALS: u32 = 8;

    /// 1 coin in base units
    pub const OCTAS_PER_COIN: Octas = 100_000_000;

    pub const SECONDS_PER_DAY: f64 = 86_400.0;

    pub const DAYS_PER_YEAR: f64 = 365.0;
}
