//! Typed transaction payloads and the outcome of executing them.

mod binary;
mod call;
mod candidate;
mod delegate;
mod deploy;

use tessera_types::Gas;

use crate::{block::Block, error::CoreError, transaction::Transaction};

pub use binary::{
    load_binary_payload, load_binary_payload_deprecated, load_binary_payload_deprecated_fail,
    BinaryPayload,
};
pub use call::{load_call_payload, CallPayload};
pub use candidate::{
    load_candidate_payload, CandidatePayload, CANDIDATE_ACTION_LOGIN, CANDIDATE_ACTION_LOGOUT,
};
pub use delegate::{
    load_delegate_payload, DelegatePayload, DELEGATE_ACTION_DO, DELEGATE_ACTION_UNDO,
};
pub use deploy::{load_deploy_payload, DeployPayload};

/// Payload type tag of a plain value transfer.
pub const TX_PAYLOAD_BINARY_TYPE: &str = "binary";
/// Payload type tag of a contract deployment.
pub const TX_PAYLOAD_DEPLOY_TYPE: &str = "deploy";
/// Payload type tag of a contract call.
pub const TX_PAYLOAD_CALL_TYPE: &str = "call";
/// Payload type tag of a validator candidacy change.
pub const TX_PAYLOAD_CANDIDATE_TYPE: &str = "candidate";
/// Payload type tag of a vote delegation change.
pub const TX_PAYLOAD_DELEGATE_TYPE: &str = "delegate";

/// A loaded transaction payload.
///
/// Each payload kind contributes a base gas count, charged before execution,
/// and an execution step run against a transaction-scoped clone of the block.
pub trait TxPayload {
    /// The gas charged for carrying this payload kind, independent of
    /// execution.
    fn base_gas_count(&self) -> Gas;

    /// Executes the payload against `block`, a transaction-scoped snapshot.
    ///
    /// Consensus-level failures are reported in the returned
    /// [`ExecutionResult`]; an `Err` is reserved for infrastructure failures
    /// and aborts the enclosing block.
    fn execute(&self, block: &mut Block, tx: &Transaction) -> Result<ExecutionResult, CoreError>;
}

/// The outcome of executing a payload.
#[derive(Clone, Debug, PartialEq)]
pub enum ExecutionResult {
    /// Execution finished successfully.
    Success {
        /// Gas consumed by execution, on top of the base gas counts.
        gas: Gas,
        /// Execution output, surfaced by the read-only estimation path.
        result: String,
    },
    /// An error condition that happened during execution.
    Failure {
        /// Gas consumed up to the point of the failure.
        gas: Gas,
        /// Error causing this `Failure` variant.
        error: CoreError,
    },
}

impl ExecutionResult {
    /// Constructs an [`ExecutionResult::Failure`] that has 0 gas and no
    /// effects, for failures detected before execution did any work.
    pub fn precondition_failure(error: CoreError) -> ExecutionResult {
        ExecutionResult::Failure {
            gas: Gas::zero(),
            error,
        }
    }

    /// Returns `true` if this is a successful variant.
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }

    /// Returns gas consumed by execution regardless of variant.
    pub fn gas(&self) -> Gas {
        match self {
            ExecutionResult::Success { gas, .. } => *gas,
            ExecutionResult::Failure { gas, .. } => *gas,
        }
    }

    /// Returns the error if this is a failure variant.
    pub fn error(&self) -> Option<&CoreError> {
        match self {
            ExecutionResult::Success { .. } => None,
            ExecutionResult::Failure { error, .. } => Some(error),
        }
    }
}
