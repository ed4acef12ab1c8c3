//! The payload of a validator candidacy change.

use serde::{Deserialize, Serialize};
use tessera_types::Gas;

use crate::{
    block::Block,
    error::CoreError,
    payload::{ExecutionResult, TxPayload},
    transaction::{Transaction, CANDIDATE_BASE_GAS_COUNT},
};

/// Action registering the sender as a validator candidate.
pub const CANDIDATE_ACTION_LOGIN: &str = "login";
/// Action withdrawing the sender's candidacy.
pub const CANDIDATE_ACTION_LOGOUT: &str = "logout";

/// The body of a `candidate` transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePayload {
    /// [`CANDIDATE_ACTION_LOGIN`] or [`CANDIDATE_ACTION_LOGOUT`].
    pub action: String,
}

/// Parses and validates a candidate payload body.
pub fn load_candidate_payload(bytes: &[u8]) -> Result<CandidatePayload, CoreError> {
    let payload: CandidatePayload = serde_json::from_slice(bytes)
        .map_err(|err| CoreError::InvalidPayloadFormat(err.to_string()))?;
    if payload.action != CANDIDATE_ACTION_LOGIN && payload.action != CANDIDATE_ACTION_LOGOUT {
        return Err(CoreError::InvalidCandidateAction);
    }
    Ok(payload)
}

impl TxPayload for CandidatePayload {
    fn base_gas_count(&self) -> Gas {
        *CANDIDATE_BASE_GAS_COUNT
    }

    fn execute(&self, block: &mut Block, tx: &Transaction) -> Result<ExecutionResult, CoreError> {
        if self.action == CANDIDATE_ACTION_LOGIN {
            block.state_mut().register_candidate(tx.from());
        } else {
            block.state_mut().withdraw_candidate(&tx.from());
        }
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
    fn should_load_login_and_logout() {
        for action in [CANDIDATE_ACTION_LOGIN, CANDIDATE_ACTION_LOGOUT] {
            let body = format!(r#"{{"action":"{}"}}"#, action);
            let payload = load_candidate_payload(body.as_bytes()).expect("should load");
            assert_eq!(payload.action, action);
        }
    }

    #[test]
    fn should_reject_unknown_action() {
        let result = load_candidate_payload(br#"{"action":"register"}"#);
        assert_eq!(result, Err(CoreError::InvalidCandidateAction));
    }

    #[test]
    fn should_charge_candidate_base_gas() {
        let payload = CandidatePayload {
            action: CANDIDATE_ACTION_LOGIN.to_string(),
        };
        assert_eq!(payload.base_gas_count(), Gas::from(20_000u64));
    }
}
