//! Errors raised by the transaction core.

use thiserror::Error;

use tessera_types::{crypto, AddressError};

/// An error raised while validating or executing a transaction.
///
/// The enum spans two tiers. Consensus-level failures
/// ([`InsufficientBalance`](CoreError::InsufficientBalance),
/// [`OutOfGasLimit`](CoreError::OutOfGasLimit), payload validation failures
/// and the like) describe a transaction that loses; depending on where they
/// arise they are either returned to the caller before any state change, or
/// recorded in a failure event while the gas fee is still charged.
/// Infrastructure failures ([`ArithmeticOverflow`](CoreError::ArithmeticOverflow),
/// balance over/underflow while moving the fee, wire-format and crypto
/// errors) abort the enclosing block and always surface as a call-level error.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// The sender cannot cover the required balance.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// The transaction's gas limit cannot cover the gas required.
    #[error("out of gas limit")]
    OutOfGasLimit,

    /// The payload type tag names no known payload kind.
    #[error("invalid transaction payload type")]
    InvalidTxPayloadType,

    /// The transaction was built for a different chain.
    #[error("invalid chain id")]
    InvalidChainId,

    /// The stored transaction hash does not match the canonical hash of the fields.
    #[error("invalid transaction hash")]
    InvalidTransactionHash,

    /// The recovered signer does not match the `from` address.
    #[error("invalid transaction signer")]
    InvalidTransactionSigner,

    /// A payload body failed to parse.
    #[error("invalid transaction payload: {0}")]
    InvalidPayloadFormat(String),

    /// A deploy payload named an unsupported source type.
    #[error("invalid deploy payload source type")]
    InvalidDeploySourceType,

    /// A deploy payload carried no source.
    #[error("invalid deploy payload source")]
    InvalidDeploySource,

    /// A deploy transaction's receiver differs from its sender.
    #[error("deploy transaction sender and receiver must match")]
    InvalidDeployAddress,

    /// A call payload named a function that is not a valid identifier.
    #[error("invalid call payload function name")]
    InvalidCallFunction,

    /// A call transaction's receiver has no deployed contract.
    #[error("no contract deployed at the call address")]
    ContractNotFound,

    /// A candidate payload action was neither `login` nor `logout`.
    #[error("invalid candidate payload action")]
    InvalidCandidateAction,

    /// A delegate payload action was neither `do` nor `undo`.
    #[error("invalid delegate payload action")]
    InvalidDelegateAction,

    /// A vote delegation named a delegatee that is not a registered candidate.
    #[error("delegatee is not a candidate")]
    DelegateeNotCandidate,

    /// A delegation revocation found no active delegation to revoke.
    #[error("no delegation to revoke")]
    DelegationNotFound,

    /// Checked 128-bit arithmetic overflowed. Infrastructure failure.
    #[error("uint128 arithmetic overflow")]
    ArithmeticOverflow,

    /// An account credit overflowed the balance range. Infrastructure failure.
    #[error("account balance overflow")]
    BalanceOverflow,

    /// An account debit exceeded the available balance. Infrastructure failure
    /// when raised by the fee transfer.
    #[error("account balance underflow")]
    BalanceUnderflow,

    /// A wire-level record could not be converted into a transaction.
    #[error("invalid wire transaction: {0}")]
    InvalidWireFormat(String),

    /// A wire-level record failed to decode.
    #[error("failed to decode wire transaction: {0}")]
    WireDecode(String),

    /// An address failed to parse.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// A cryptographic subsystem error, propagated unchanged.
    #[error(transparent)]
    Crypto(#[from] crypto::Error),
}

impl From<prost::DecodeError> for CoreError {
    fn from(error: prost::DecodeError) -> Self {
        CoreError::WireDecode(error.to_string())
    }
}
