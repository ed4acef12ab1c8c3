//! The payload of a contract call.

use serde::{Deserialize, Serialize};
use tessera_types::Gas;

use crate::{
    block::Block,
    error::CoreError,
    payload::{ExecutionResult, TxPayload},
    transaction::Transaction,
};

/// The body of a `call` transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallPayload {
    /// Name of the contract function to invoke.
    pub function: String,
    /// Call arguments, JSON-encoded.
    #[serde(default)]
    pub args: String,
}

/// Parses and validates a call payload body.
pub fn load_call_payload(bytes: &[u8]) -> Result<CallPayload, CoreError> {
    let payload: CallPayload = serde_json::from_slice(bytes)
        .map_err(|err| CoreError::InvalidPayloadFormat(err.to_string()))?;
    if !is_valid_function_name(&payload.function) {
        return Err(CoreError::InvalidCallFunction);
    }
    Ok(payload)
}

// Function names follow the identifier shape [a-zA-Z$_][a-zA-Z0-9$_]*.
fn is_valid_function_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '$' || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '$' || c == '_')
}

impl TxPayload for CallPayload {
    fn base_gas_count(&self) -> Gas {
        Gas::zero()
    }

    /// Invokes the contract deployed at the transaction's receiver; execution
    /// gas is charged per byte of function name and arguments.
    fn execute(&self, block: &mut Block, tx: &Transaction) -> Result<ExecutionResult, CoreError> {
        if block.state().contract(&tx.to()).is_none() {
            return Ok(ExecutionResult::precondition_failure(
                CoreError::ContractNotFound,
            ));
        }

        Ok(ExecutionResult::Success {
            gas: Gas::from((self.function.len() + self.args.len()) as u64),
            result: String::new(),
        })
    }
}
