//! The payload of a contract deployment.

use serde::{Deserialize, Serialize};
use tessera_types::Gas;

use crate::{
    block::Block,
    error::CoreError,
    payload::{ExecutionResult, TxPayload},
    state::DeployedContract,
    transaction::Transaction,
};

const SOURCE_TYPE_JS: &str = "js";
const SOURCE_TYPE_TS: &str = "ts";

/// The body of a `deploy` transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployPayload {
    /// Language tag of the source, `js` or `ts`.
    pub source_type: String,
    /// The contract source.
    pub source: String,
    /// Constructor arguments, JSON-encoded.
    #[serde(default)]
    pub args: String,
}

/// Parses and validates a deploy payload body.
pub fn load_deploy_payload(bytes: &[u8]) -> Result<DeployPayload, CoreError> {
    let payload: DeployPayload = serde_json::from_slice(bytes)
        .map_err(|err| CoreError::InvalidPayloadFormat(err.to_string()))?;
    if payload.source_type != SOURCE_TYPE_JS && payload.source_type != SOURCE_TYPE_TS {
        return Err(CoreError::InvalidDeploySourceType);
    }
    if payload.source.is_empty() {
        return Err(CoreError::InvalidDeploySource);
    }
    Ok(payload)
}

impl TxPayload for DeployPayload {
    fn base_gas_count(&self) -> Gas {
        Gas::zero()
    }

    /// Registers the contract at the address generated from the sender and
    /// nonce. Deployments are addressed to the sender itself; execution gas
    /// is charged per byte of source.
    fn execute(&self, block: &mut Block, tx: &Transaction) -> Result<ExecutionResult, CoreError> {
        if tx.from() != tx.to() {
            return Ok(ExecutionResult::precondition_failure(
                CoreError::InvalidDeployAddress,
            ));
        }

        let contract_address = tx.generate_contract_address();
        block
            .state_mut()
            .get_or_create_user_account(&contract_address);
        block.state_mut().register_contract(
            contract_address,
            DeployedContract {
                source_type: self.source_type.clone(),
                source: self.source.clone(),
                args: self.args.clone(),
            },
        );

        Ok(ExecutionResult::Success {
            gas: Gas::from(self.source.len() as u64),
            result: contract_address.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_load_valid_payload() {
        let payload = load_deploy_payload(
            br#"{"sourceType":"js","source":"module.exports = {};","args":"[]"}"#,
        )
        .expect("should load");
        assert_eq!(payload.source_type, "js");
        assert_eq!(payload.args, "[]");
    }

    #[test]
    fn should_default_missing_args() {
        let payload = load_deploy_payload(br#"{"sourceType":"ts","source":"export {};"}"#)
            .expect("should load");
        assert_eq!(payload.args, "");
    }

    #[test]
    fn should_reject_unknown_source_type() {
        let result = load_deploy_payload(br#"{"sourceType":"wasm","source":"(module)"}"#);
        assert_eq!(result, Err(CoreError::InvalidDeploySourceType));
    }

    #[test]
    fn should_reject_empty_source() {
        let result = load_deploy_payload(br#"{"sourceType":"js","source":""}"#);
        assert_eq!(result, Err(CoreError::InvalidDeploySource));
    }

    #[test]
    fn should_reject_malformed_json() {
        let result = load_deploy_payload(b"deploy me");
        assert!(matches!(result, Err(CoreError::InvalidPayloadFormat(_))));
    }
}
