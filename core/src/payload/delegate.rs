//! The payload of a vote delegation change.

use serde::{Deserialize, Serialize};
use tessera_types::{Address, Gas};

use crate::{
    block::Block,
    error::CoreError,
    payload::{ExecutionResult, TxPayload},
    transaction::{Transaction, DELEGATE_BASE_GAS_COUNT},
};

/// Action delegating the sender's vote.
pub const DELEGATE_ACTION_DO: &str = "do";
/// Action revoking the sender's delegation.
pub const DELEGATE_ACTION_UNDO: &str = "undo";

/// The body of a `delegate` transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatePayload {
    /// [`DELEGATE_ACTION_DO`] or [`DELEGATE_ACTION_UNDO`].
    pub action: String,
    /// The candidate delegated to.
    pub delegatee: Address,
}

/// Parses and validates a delegate payload body.
pub fn load_delegate_payload(bytes: &[u8]) -> Result<DelegatePayload, CoreError> {
    let payload: DelegatePayload = serde_json::from_slice(bytes)
        .map_err(|err| CoreError::InvalidPayloadFormat(err.to_string()))?;
    if payload.action != DELEGATE_ACTION_DO && payload.action != DELEGATE_ACTION_UNDO {
        return Err(CoreError::InvalidDelegateAction);
    }
    Ok(payload)
}

impl TxPayload for DelegatePayload {
    fn base_gas_count(&self) -> Gas {
        *DELEGATE_BASE_GAS_COUNT
    }

    fn execute(&self, block: &mut Block, tx: &Transaction) -> Result<ExecutionResult, CoreError> {
        let voter = tx.from();
        if self.action == DELEGATE_ACTION_DO {
            if !block.state().is_candidate(&self.delegatee) {
                return Ok(ExecutionResult::precondition_failure(
                    CoreError::DelegateeNotCandidate,
                ));
            }
            block.state_mut().delegate(voter, self.delegatee);
        } else {
            if block.state().delegation(&voter).is_none() {
                return Ok(ExecutionResult::precondition_failure(
                    CoreError::DelegationNotFound,
                ));
            }
            block.state_mut().undelegate(&voter);
        }
        Ok(ExecutionResult::Success {
            gas: Gas::zero(),
            result: String::new(),
        })
    }
}
