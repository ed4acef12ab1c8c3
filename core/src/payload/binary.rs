//! The payload of a plain value transfer.

use serde::{Deserialize, Serialize};
use tessera_types::Gas;

use crate::{
    block::Block,
    error::CoreError,
    payload::{ExecutionResult, TxPayload},
    transaction::Transaction,
};

/// An opaque byte payload attached to a value transfer.
///
/// The attached bytes carry no meaning for the core; they are priced per byte
/// through the base transaction gas and otherwise ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryPayload {
    /// The attached bytes.
    #[serde(rename = "Data", default)]
    data: Vec<u8>,
}

impl BinaryPayload {
    /// Wraps the given bytes.
    pub fn new(data: Vec<u8>) -> BinaryPayload {
        BinaryPayload { data }
    }

    /// Returns the attached bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Loads a binary payload by wrapping the raw bytes. Never fails.
pub fn load_binary_payload(bytes: &[u8]) -> Result<BinaryPayload, CoreError> {
    Ok(BinaryPayload::new(bytes.to_vec()))
}

/// Loads a binary payload the way blocks below the optimize height did:
/// attempt the legacy JSON decode and fall back to wrapping the raw bytes
/// when the input is not legacy-encoded.
pub fn load_binary_payload_deprecated(bytes: &[u8]) -> Result<BinaryPayload, CoreError> {
    match serde_json::from_slice(bytes) {
        Ok(payload) => Ok(payload),
        Err(_) => Ok(BinaryPayload::new(bytes.to_vec())),
    }
}

/// Loads a binary payload the way blocks inside the historical rejection
/// windows did: a non-empty input that is not legacy-encoded fails the load.
pub fn load_binary_payload_deprecated_fail(bytes: &[u8]) -> Result<BinaryPayload, CoreError> {
    if bytes.is_empty() {
        return Ok(BinaryPayload::default());
    }
    serde_json::from_slice(bytes).map_err(|err| CoreError::InvalidPayloadFormat(err.to_string()))
}

impl TxPayload for BinaryPayload {
    fn base_gas_count(&self) -> Gas {
        Gas::zero()
    }

    fn execute(&self, _block: &mut Block, _tx: &Transaction) -> Result<ExecutionResult, CoreError> {
        Ok(ExecutionResult::Success {
            gas: Gas::zero(),
            result: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_wrap_raw_bytes() {
        let payload = load_binary_payload(b"\x00\x01raw").expect("should load");
        assert_eq!(payload.data(), b"\x00\x01raw");
    }

    #[test]
    fn should_decode_legacy_json_in_deprecated_loader() {
        let payload = load_binary_payload_deprecated(br#"{"Data":[1,2,3]}"#).expect("should load");
        assert_eq!(payload.data(), &[1, 2, 3]);
    }

    #[test]
    fn should_fall_back_to_raw_bytes_in_deprecated_loader() {
        let payload = load_binary_payload_deprecated(b"not json").expect("should load");
        assert_eq!(payload.data(), b"not json");
    }

    #[test]
    fn should_fail_malformed_input_in_deprecated_fail_loader() {
        let result = load_binary_payload_deprecated_fail(b"not json");
        assert!(matches!(result, Err(CoreError::InvalidPayloadFormat(_))));
    }

    #[test]
    fn should_accept_empty_input_in_deprecated_fail_loader() {
        let payload = load_binary_payload_deprecated_fail(b"").expect("should load");
        assert_eq!(payload.data(), b"");
    }

    #[test]
    fn should_charge_no_base_or_execution_gas() {
        let payload = BinaryPayload::default();
        assert!(payload.base_gas_count().is_zero());
    }
}
