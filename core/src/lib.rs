//! The transaction model and deterministic state-transition core of the
//! tessera network.
//!
//! An inbound transaction is decoded into a [`Transaction`], checked with
//! [`Transaction::verify_integrity`], and applied to a block's account state
//! with [`Transaction::verify_execution`]. Execution is deterministic: replays
//! of historical blocks reproduce every balance, event and gas figure exactly,
//! including the behavior of old consensus windows gated on block height via
//! [`ChainConfig`].

#![warn(missing_docs)]

mod block;
mod chainspec;
mod error;
mod event;
pub mod payload;
pub mod proto;
mod state;
mod transaction;

pub use block::Block;
pub use chainspec::ChainConfig;
pub use error::CoreError;
pub use event::{
    Event, TransactionEvent, TOPIC_EXECUTE_TX_FAILED, TOPIC_EXECUTE_TX_SUCCESS,
    TOPIC_TRANSACTION_EXECUTION_RESULT, TX_EXECUTION_FAILED, TX_EXECUTION_SUCCESS,
};
pub use state::{Account, AccountState, DeployedContract};
pub use transaction::{
    Transaction, CANDIDATE_BASE_GAS_COUNT, DELEGATE_BASE_GAS_COUNT, GAS_COUNT_PER_BYTE,
    MIN_GAS_COUNT_PER_TRANSACTION, TRANSACTION_GAS_PRICE, TRANSACTION_MAX_GAS,
    TRANSACTION_MAX_GAS_PRICE,
};
