//! Events recorded against a block during transaction execution.

use serde::{Deserialize, Serialize};

/// Topic of the legacy per-transaction failure event.
pub const TOPIC_EXECUTE_TX_FAILED: &str = "chain.executeTxFailed";

/// Topic of the legacy per-transaction success event.
pub const TOPIC_EXECUTE_TX_SUCCESS: &str = "chain.executeTxSuccess";

/// Topic of the structured per-transaction execution-result event.
pub const TOPIC_TRANSACTION_EXECUTION_RESULT: &str = "chain.transactionResult";

/// Status value recorded for a failed execution.
pub const TX_EXECUTION_FAILED: i8 = 0;

/// Status value recorded for a successful execution.
pub const TX_EXECUTION_SUCCESS: i8 = 1;

/// An event recorded against a block, keyed by the hash of the transaction
/// that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The topic the event was published under.
    pub topic: String,
    /// The JSON-encoded event body.
    pub data: String,
}

/// The structured transaction execution-result record.
///
/// Serialized as the body of every [`TOPIC_TRANSACTION_EXECUTION_RESULT`]
/// event; the field set and encoding are consensus-observable and fixed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEvent {
    /// Hex-encoded transaction hash.
    pub hash: String,
    /// [`TX_EXECUTION_SUCCESS`] or [`TX_EXECUTION_FAILED`].
    pub status: i8,
    /// Decimal-encoded gas charged for the transaction.
    pub gas_used: String,
    /// The failure message, empty on success.
    pub error: String,
}
