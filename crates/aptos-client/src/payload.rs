//! Entry function payloads
//!
//! Defines the JSON structure the Aptos wallet adapter expects for
//! `signAndSubmitTransaction`.

use serde::{Deserialize, Serialize};

/// A call to a public entry function of a published Move module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFunctionPayload {
    /// `<address>::<module>::<function>`
    pub function: String,
    /// Generic type arguments, in order
    pub type_arguments: Vec<String>,
    /// Arguments, in order. Integers are passed as decimal strings so u64
    /// values survive JavaScript number precision.
    pub function_arguments: Vec<String>,
}

impl EntryFunctionPayload {
    pub fn new(module_address: &str, module: &str, function: &str) -> Self {
        Self {
            function: format!("{}::{}::{}", module_address, module, function),
            type_arguments: vec![],
            function_arguments: vec![],
        }
    }

    pub fn with_type_argument(mut self, ty: impl Into<String>) -> Self {
        self.type_arguments.push(ty.into());
        self
    }

    pub fn with_u64_argument(mut self, value: u64) -> Self {
        self.function_arguments.push(value.to_string());
        self
    }

    /// Wrap in the `{ "data": ... }` envelope the wallet adapter takes
    pub fn to_wallet_request(&self) -> serde_json::Value {
        serde_json::json!({ "data": self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_builder() {
        let payload = EntryFunctionPayload::new("0xabc", "vault", "mint")
            .with_type_argument("0xabc::vault_maturity_dates::APR_2024")
            .with_u64_argument(250_000_000);

        assert_eq!(payload.function, "0xabc::vault::mint");
        assert_eq!(
            payload.type_arguments,
            vec!["0xabc::vault_maturity_dates::APR_2024"]
        );
        assert_eq!(payload.function_arguments, vec!["250000000"]);
    }

    #[test]
    fn test_wallet_request_shape() {
        let payload = EntryFunctionPayload::new("0x1", "coin", "transfer")
            .with_type_argument("0x1::aptos_coin::AptosCoin")
            .with_u64_argument(u64::MAX);

        let json = payload.to_wallet_request();
        assert_eq!(json["data"]["function"], "0x1::coin::transfer");
        assert_eq!(
            json["data"]["typeArguments"][0],
            "0x1::aptos_coin::AptosCoin"
        );
        assert_eq!(
            json["data"]["functionArguments"][0],
            "18446744073709551615"
        );
    }
}
