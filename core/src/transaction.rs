//! The transaction value object and the deterministic state-transition
//! function that applies it against a block.

use std::{
    fmt::{self, Display, Formatter},
    time::{SystemTime, UNIX_EPOCH},
};

use once_cell::sync::Lazy;
use prost::Message;
use tracing::debug;

use tessera_types::{crypto, Address, Digest, Gas, Motes};

use crate::{
    block::Block,
    error::CoreError,
    event::{
        Event, TransactionEvent, TOPIC_EXECUTE_TX_FAILED, TOPIC_EXECUTE_TX_SUCCESS,
        TOPIC_TRANSACTION_EXECUTION_RESULT, TX_EXECUTION_FAILED, TX_EXECUTION_SUCCESS,
    },
    payload::{
        load_binary_payload, load_binary_payload_deprecated, load_binary_payload_deprecated_fail,
        load_call_payload, load_candidate_payload, load_delegate_payload, load_deploy_payload,
        ExecutionResult, TxPayload, TX_PAYLOAD_BINARY_TYPE, TX_PAYLOAD_CALL_TYPE,
        TX_PAYLOAD_CANDIDATE_TYPE, TX_PAYLOAD_DELEGATE_TYPE, TX_PAYLOAD_DEPLOY_TYPE,
    },
    proto,
};

/// Highest admissible price per gas unit.
pub static TRANSACTION_MAX_GAS_PRICE: Lazy<Motes> = Lazy::new(|| Motes::from(50_000_000_000_u64));

/// Highest admissible gas limit.
pub static TRANSACTION_MAX_GAS: Lazy<Gas> = Lazy::new(|| Gas::from(50_000_000_000_u64));

/// Price per gas unit applied when a transaction carries none.
pub static TRANSACTION_GAS_PRICE: Lazy<Motes> = Lazy::new(|| Motes::from(1_000_000_u64));

/// Gas charged by every transaction before any payload accounting.
pub static MIN_GAS_COUNT_PER_TRANSACTION: Lazy<Gas> = Lazy::new(|| Gas::from(20_000_u64));

/// Gas charged per byte of payload data.
pub static GAS_COUNT_PER_BYTE: Lazy<Gas> = Lazy::new(|| Gas::from(1_u64));

/// Base gas of a `delegate` payload.
pub static DELEGATE_BASE_GAS_COUNT: Lazy<Gas> = Lazy::new(|| Gas::from(20_000_u64));

/// Base gas of a `candidate` payload.
pub static CANDIDATE_BASE_GAS_COUNT: Lazy<Gas> = Lazy::new(|| Gas::from(20_000_u64));

/// A value-and-code-carrying message between two accounts.
///
/// A transaction is immutable once constructed, except for the `hash`, `alg`
/// and `sign` fields which are set exactly once by [`sign`](Transaction::sign).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    hash: Option<Digest>,
    from: Address,
    to: Address,
    value: Motes,
    nonce: u64,
    timestamp: i64,
    payload_type: String,
    payload: Vec<u8>,
    chain_id: u32,
    gas_price: Motes,
    gas_limit: Gas,
    alg: u8,
    sign: Vec<u8>,
}

impl Transaction {
    /// Constructs a new unsigned transaction.
    ///
    /// A missing or zero `gas_price` falls back to the default gas price, a
    /// missing or zero `gas_limit` to the per-transaction gas minimum. The
    /// timestamp is taken from the wall clock at construction.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain_id: u32,
        from: Address,
        to: Address,
        value: Motes,
        nonce: u64,
        payload_type: &str,
        payload: Vec<u8>,
        gas_price: Option<Motes>,
        gas_limit: Option<Gas>,
    ) -> Transaction {
        let gas_price = match gas_price {
            Some(price) if !price.is_zero() => price,
            _ => *TRANSACTION_GAS_PRICE,
        };
        let gas_limit = match gas_limit {
            Some(limit) if !limit.is_zero() => limit,
            _ => *MIN_GAS_COUNT_PER_TRANSACTION,
        };
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|since_epoch| since_epoch.as_secs() as i64)
            .unwrap_or_default();

        Transaction {
            hash: None,
            from,
            to,
            value,
            nonce,
            timestamp,
            payload_type: payload_type.to_string(),
            payload,
            chain_id,
            gas_price,
            gas_limit,
            alg: 0,
            sign: Vec::new(),
        }
    }

    /// Returns the stored hash, present once the transaction is signed.
    pub fn hash(&self) -> Option<Digest> {
        self.hash
    }

    /// Returns the sender address.
    pub fn from(&self) -> Address {
        self.from
    }

    /// Returns the receiver address.
    pub fn to(&self) -> Address {
        self.to
    }

    /// Returns the transferred amount.
    pub fn value(&self) -> Motes {
        self.value
    }

    /// Returns the per-sender sequence number.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Returns the construction timestamp, in seconds.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns the identifier of the chain the transaction was built for.
    pub fn chain_id(&self) -> u32 {
        self.chain_id
    }

    /// Returns the payload type tag.
    pub fn payload_type(&self) -> &str {
        &self.payload_type
    }

    /// Returns the opaque payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the price per gas unit.
    pub fn gas_price(&self) -> Motes {
        self.gas_price
    }

    /// Returns the gas ceiling.
    pub fn gas_limit(&self) -> Gas {
        self.gas_limit
    }

    /// Computes the canonical hash over every field except `hash`, `alg` and
    /// `sign`.
    ///
    /// The pre-image is the plain concatenation of the fields in wire order;
    /// amounts contribute their fixed 16-byte big-endian encoding, integers
    /// their big-endian bytes, and the payload its protobuf framing. The
    /// result is identical for identical input on every platform.
    pub fn compute_hash(&self) -> Digest {
        let data = proto::Data {
            payload_type: self.payload_type.clone(),
            payload: self.payload.clone(),
        }
        .encode_to_vec();

        Digest::hash_parts(&[
            self.from.as_bytes(),
            self.to.as_bytes(),
            &self.value.to_fixed_bytes(),
            &self.nonce.to_be_bytes(),
            &self.timestamp.to_be_bytes(),
            &data,
            &self.chain_id.to_be_bytes(),
            &self.gas_price.to_fixed_bytes(),
            &self.gas_limit.to_fixed_bytes(),
        ])
    }

    /// Signs the transaction, setting `hash`, `alg` and `sign`.
    pub fn sign(&mut self, secret_key: &crypto::SecretKey) -> Result<(), CoreError> {
        let hash = self.compute_hash();
        let sign = crypto::sign(hash, secret_key)?;
        self.hash = Some(hash);
        self.alg = secret_key.algorithm().tag();
        self.sign = sign;
        Ok(())
    }

    /// Verifies the transaction's chain id, stored hash and signature.
    ///
    /// The signer is established by recovering the public key from the
    /// signature and comparing its derived address against `from`.
    pub fn verify_integrity(&self, chain_id: u32) -> Result<(), CoreError> {
        if self.chain_id != chain_id {
            return Err(CoreError::InvalidChainId);
        }

        let wanted_hash = self.compute_hash();
        if self.hash != Some(wanted_hash) {
            return Err(CoreError::InvalidTransactionHash);
        }

        self.verify_sign(&wanted_hash)
    }

    fn verify_sign(&self, hash: &Digest) -> Result<(), CoreError> {
        let algorithm = crypto::Algorithm::try_from(self.alg)?;
        let public_key = crypto::recover_public(algorithm, hash.as_bytes(), &self.sign)?;
        let recovered = Address::from_public_key(&public_key);
        if recovered != self.from {
            debug!(recovered = %recovered, tx = %self, "failed to verify the transaction signature");
            return Err(CoreError::InvalidTransactionSigner);
        }
        Ok(())
    }

    /// Returns the address a contract deployed by this transaction lives at,
    /// derived from the sender and nonce.
    pub fn generate_contract_address(&self) -> Address {
        Address::new_contract(&Digest::hash_parts(&[
            self.from.as_bytes(),
            &self.nonce.to_be_bytes(),
        ]))
    }

    /// Returns the gas charged by this transaction before any payload
    /// accounting: the per-transaction minimum plus the per-byte price of the
    /// attached payload data.
    pub fn gas_count_of_tx_base(&self) -> Result<Gas, CoreError> {
        let mut tx_gas = *MIN_GAS_COUNT_PER_TRANSACTION;
        if !self.payload.is_empty() {
            let data_len = Gas::from(self.payload.len() as u64);
            let data_gas = data_len
                .checked_mul(*GAS_COUNT_PER_BYTE)
                .ok_or(CoreError::ArithmeticOverflow)?;
            tx_gas = tx_gas
                .checked_add(data_gas)
                .ok_or(CoreError::ArithmeticOverflow)?;
        }
        Ok(tx_gas)
    }

    /// Returns the gas left for payload execution once the base gas counts
    /// are taken out of the gas limit.
    pub fn payload_gas_limit(&self, payload: &dyn TxPayload) -> Result<Gas, CoreError> {
        let gas_count_of_tx_base = self.gas_count_of_tx_base()?;
        let after_base = self
            .gas_limit
            .checked_sub(gas_count_of_tx_base)
            .ok_or(CoreError::OutOfGasLimit)?;
        after_base
            .checked_sub(payload.base_gas_count())
            .ok_or(CoreError::OutOfGasLimit)
    }

    /// Returns `gas_price * gas_limit`, the balance a sender must hold before
    /// execution starts.
    pub fn min_balance_required(&self) -> Result<Motes, CoreError> {
        Motes::from_gas(self.gas_limit, self.gas_price).ok_or(CoreError::ArithmeticOverflow)
    }

    /// Selects and loads the payload for this transaction's type tag.
    ///
    /// The `binary` tag is height-gated: above the optimize height the
    /// revised loader applies; inside the two historical windows the
    /// rejecting legacy loader applies; everywhere else below the gate the
    /// tolerant legacy loader applies. The window bounds are consensus
    /// constants.
    pub fn load_payload(&self, block: &Block) -> Result<Box<dyn TxPayload>, CoreError> {
        match self.payload_type.as_str() {
            TX_PAYLOAD_BINARY_TYPE => {
                let height = block.height();
                if height > block.config().optimize_height {
                    load_binary_payload(&self.payload).map(boxed)
                } else if (280_921..=297_680).contains(&height)
                    || (300_087..=302_302).contains(&height)
                {
                    load_binary_payload_deprecated_fail(&self.payload).map(boxed)
                } else {
                    load_binary_payload_deprecated(&self.payload).map(boxed)
                }
            }
            TX_PAYLOAD_DEPLOY_TYPE => load_deploy_payload(&self.payload).map(boxed),
            TX_PAYLOAD_CALL_TYPE => load_call_payload(&self.payload).map(boxed),
            TX_PAYLOAD_CANDIDATE_TYPE => load_candidate_payload(&self.payload).map(boxed),
            TX_PAYLOAD_DELEGATE_TYPE => load_delegate_payload(&self.payload).map(boxed),
            _ => Err(CoreError::InvalidTxPayloadType),
        }
    }

    /// Applies the transaction to `block` and returns the gas charged.
    ///
    /// Precondition: the caller has already run
    /// [`verify_integrity`](Transaction::verify_integrity); no signature or
    /// hash check is repeated here, so gas accounting is unaffected by
    /// verification.
    ///
    /// A failed execution still charges gas, records a failure event on the
    /// block and returns `Ok(gas)`; only infrastructure failures (arithmetic
    /// overflow in gas math, a fee transfer that cannot be applied) surface
    /// as `Err`, as do the pre-charge rejections
    /// ([`CoreError::InsufficientBalance`], [`CoreError::OutOfGasLimit`])
    /// which leave the block untouched.
    pub fn verify_execution(&self, block: &mut Block) -> Result<Gas, CoreError> {
        let coinbase = block.coinbase();
        block.state_mut().get_or_create_user_account(&self.from);
        block.state_mut().get_or_create_user_account(&self.to);
        block.state_mut().get_or_create_user_account(&coinbase);

        let mut min_balance_required = self.min_balance_required()?;
        if block.state().balance_of(&self.from) < min_balance_required {
            return Err(CoreError::InsufficientBalance);
        }

        if block.height() > block.config().transaction_optimize_height {
            min_balance_required = min_balance_required
                .checked_add(self.value)
                .ok_or(CoreError::ArithmeticOverflow)?;
            if block.state().balance_of(&self.from) < min_balance_required {
                return Err(CoreError::InsufficientBalance);
            }
        }

        let mut gas_used = self.gas_count_of_tx_base()?;
        if self.gas_limit < gas_used {
            debug!(
                limit = %self.gas_limit,
                used = %gas_used,
                tx = %self,
                "failed to cover the base transaction gas"
            );
            return Err(CoreError::OutOfGasLimit);
        }

        let payload = match self.load_payload(block) {
            Ok(payload) => payload,
            Err(error) => {
                debug!(%error, tx = %self, "failed to load the transaction payload");
                self.gas_consumption(block, gas_used)?;
                self.trigger_event(TOPIC_EXECUTE_TX_FAILED, block, gas_used, Some(&error));
                return Ok(gas_used);
            }
        };

        gas_used = gas_used
            .checked_add(payload.base_gas_count())
            .ok_or(CoreError::ArithmeticOverflow)?;
        if self.gas_limit < gas_used {
            debug!(
                limit = %self.gas_limit,
                used = %gas_used,
                tx = %self,
                "failed to cover the base gas of the payload kind"
            );
            self.gas_consumption(block, self.gas_limit)?;
            self.trigger_event(
                TOPIC_EXECUTE_TX_FAILED,
                block,
                self.gas_limit,
                Some(&CoreError::OutOfGasLimit),
            );
            return Ok(self.gas_limit);
        }

        let mut tx_block = block.clone();
        let outcome = payload.execute(&mut tx_block, self)?;
        let gas_execution = outcome.gas();
        let mut exe_err = outcome.error().cloned();

        let mut gas = gas_used
            .checked_add(gas_execution)
            .ok_or(CoreError::ArithmeticOverflow)?;

        if block.height() > block.config().transaction_optimize_height && self.gas_limit < gas {
            gas = self.gas_limit;
            exe_err = Some(CoreError::OutOfGasLimit);
        }

        // Only a successful execution publishes the snapshot's effects.
        if exe_err.is_none() {
            block.merge(tx_block);
        }

        // The fee and the value transfer below read the post-merge state; no
        // account handle obtained before the merge survives it.
        self.gas_consumption(block, gas)?;

        match exe_err {
            Some(error) => {
                debug!(
                    %error,
                    gas_used = %gas_used,
                    gas_execution = %gas_execution,
                    tx = %self,
                    "failed to execute the transaction payload"
                );
                // Blocks below the activation height recorded these failures
                // with the loader error, which is always absent once loading
                // has succeeded.
                let reported = if block.height() < block.config().transaction_optimize_height {
                    None
                } else {
                    Some(&error)
                };
                self.trigger_event(TOPIC_EXECUTE_TX_FAILED, block, gas, reported);
            }
            None => {
                if block.state().balance_of(&self.from) < self.value {
                    debug!(tx = %self, "failed to cover the transferred value after fees");
                    self.trigger_event(
                        TOPIC_EXECUTE_TX_FAILED,
                        block,
                        gas,
                        Some(&CoreError::InsufficientBalance),
                    );
                } else {
                    block
                        .state_mut()
                        .get_or_create_user_account(&self.from)
                        .sub_balance(self.value)?;
                    block
                        .state_mut()
                        .get_or_create_user_account(&self.to)
                        .add_balance(self.value)?;
                    self.trigger_event(TOPIC_EXECUTE_TX_SUCCESS, block, gas, None);
                }
            }
        }

        Ok(gas)
    }

    /// Simulates the transaction against a discarded snapshot of `block` and
    /// returns the gas estimate together with the execution outcome.
    ///
    /// The input block is never mutated; this is the path behind read-only
    /// gas-estimation RPCs.
    pub fn local_execution(&self, block: &Block) -> Result<ExecutionResult, CoreError> {
        let mut tx_block = block.clone();
        tx_block.begin();
        let outcome = self.simulate(&mut tx_block);
        tx_block.rollback();
        outcome
    }

    fn simulate(&self, tx_block: &mut Block) -> Result<ExecutionResult, CoreError> {
        let payload = match self.load_payload(tx_block) {
            Ok(payload) => payload,
            Err(error) => return Ok(ExecutionResult::precondition_failure(error)),
        };

        let gas_used = self
            .gas_count_of_tx_base()?
            .checked_add(payload.base_gas_count())
            .ok_or(CoreError::ArithmeticOverflow)?;

        let outcome = payload.execute(tx_block, self)?;
        let gas = gas_used
            .checked_add(outcome.gas())
            .ok_or(CoreError::ArithmeticOverflow)?;

        Ok(match outcome {
            ExecutionResult::Success { result, .. } => ExecutionResult::Success { gas, result },
            ExecutionResult::Failure { error, .. } => ExecutionResult::Failure { gas, error },
        })
    }

    // Moves the fee for `gas` from the sender to the block's coinbase.
    fn gas_consumption(&self, block: &mut Block, gas: Gas) -> Result<(), CoreError> {
        let gas_cost = Motes::from_gas(gas, self.gas_price).ok_or(CoreError::ArithmeticOverflow)?;
        let coinbase = block.coinbase();
        block
            .state_mut()
            .get_or_create_user_account(&self.from)
            .sub_balance(gas_cost)?;
        block
            .state_mut()
            .get_or_create_user_account(&coinbase)
            .add_balance(gas_cost)
    }

    /// Records the execution outcome on the block.
    ///
    /// Above the optimize height every outcome is published as a structured
    /// record under [`TOPIC_TRANSACTION_EXECUTION_RESULT`]; at and below it
    /// the legacy format applies under the caller-supplied topic, embedding
    /// the serialized wire record, wrapped together with the error when one
    /// is present.
    fn trigger_event(&self, topic: &str, block: &mut Block, gas_used: Gas, error: Option<&CoreError>) {
        if block.height() > block.config().optimize_height {
            self.record_result_event(block, gas_used, error);
            return;
        }

        let wire_tx = self.to_proto();
        let data = match error {
            Some(error) => serde_json::json!({
                "transaction": wire_tx,
                "error": error.to_string(),
            })
            .to_string(),
            None => serde_json::to_string(&wire_tx).unwrap_or_default(),
        };

        let event = Event {
            topic: topic.to_string(),
            data,
        };
        block.record_event(self.hash.unwrap_or_default(), event);
    }

    fn record_result_event(&self, block: &mut Block, gas_used: Gas, error: Option<&CoreError>) {
        let tx_event = TransactionEvent {
            hash: self.hash.unwrap_or_default().to_string(),
            status: if error.is_some() {
                TX_EXECUTION_FAILED
            } else {
                TX_EXECUTION_SUCCESS
            },
            gas_used: gas_used.to_string(),
            error: error.map(ToString::to_string).unwrap_or_default(),
        };

        let event = Event {
            topic: TOPIC_TRANSACTION_EXECUTION_RESULT.to_string(),
            data: serde_json::to_string(&tx_event).unwrap_or_default(),
        };
        block.record_event(self.hash.unwrap_or_default(), event);
    }

    /// Converts the transaction into its wire-level record.
    pub fn to_proto(&self) -> proto::Transaction {
        proto::Transaction {
            hash: self
                .hash
                .map(|digest| digest.as_bytes().to_vec())
                .unwrap_or_default(),
            from: self.from.as_bytes().to_vec(),
            to: self.to.as_bytes().to_vec(),
            value: self.value.to_fixed_bytes().to_vec(),
            nonce: self.nonce,
            timestamp: self.timestamp,
            data: Some(proto::Data {
                payload_type: self.payload_type.clone(),
                payload: self.payload.clone(),
            }),
            chain_id: self.chain_id,
            gas_price: self.gas_price.to_fixed_bytes().to_vec(),
            gas_limit: self.gas_limit.to_fixed_bytes().to_vec(),
            alg: u32::from(self.alg),
            sign: self.sign.clone(),
        }
    }

    /// Encodes the transaction into wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }

    /// Decodes a transaction from wire bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Transaction, CoreError> {
        let message = proto::Transaction::decode(bytes)?;
        Transaction::try_from(message)
    }
}

impl TryFrom<proto::Transaction> for Transaction {
    type Error = CoreError;

    fn try_from(message: proto::Transaction) -> Result<Transaction, Self::Error> {
        let hash = if message.hash.is_empty() {
            None
        } else {
            let digest = Digest::try_from(message.hash.as_slice()).map_err(|_| {
                CoreError::InvalidWireFormat("transaction hash must be 32 bytes".to_string())
            })?;
            Some(digest)
        };
        let from = Address::try_from(message.from.as_slice())?;
        let to = Address::try_from(message.to.as_slice())?;
        let value = Motes::from_fixed_slice(&message.value)
            .ok_or_else(|| CoreError::InvalidWireFormat("value must be 16 bytes".to_string()))?;
        let data = message
            .data
            .ok_or_else(|| CoreError::InvalidWireFormat("transaction data is missing".to_string()))?;
        let gas_price = Motes::from_fixed_slice(&message.gas_price).ok_or_else(|| {
            CoreError::InvalidWireFormat("gas price must be 16 bytes".to_string())
        })?;
        let gas_limit = Gas::from_fixed_slice(&message.gas_limit).ok_or_else(|| {
            CoreError::InvalidWireFormat("gas limit must be 16 bytes".to_string())
        })?;
        let alg = u8::try_from(message.alg).map_err(|_| {
            CoreError::InvalidWireFormat("algorithm tag out of range".to_string())
        })?;

        Ok(Transaction {
            hash,
            from,
            to,
            value,
            nonce: message.nonce,
            timestamp: message.timestamp,
            payload_type: data.payload_type,
            payload: data.payload,
            chain_id: message.chain_id,
            gas_price,
            gas_limit,
            alg,
            sign: message.sign,
        })
    }
}

impl Display for Transaction {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(
            formatter,
            r#"{{"chainID":{}, "hash":"{}", "from":"{}", "to":"{}", "nonce":{}, "value":"{}", "timestamp":{}, "gasprice":"{}", "gaslimit":"{}", "type":"{}"}}"#,
            self.chain_id,
            self.hash.unwrap_or_default(),
            self.from,
            self.to,
            self.nonce,
            self.value,
            self.timestamp,
            self.gas_price,
            self.gas_limit,
            self.payload_type,
        )
    }
}

fn boxed<P: TxPayload + 'static>(payload: P) -> Box<dyn TxPayload> {
    Box::new(payload)
}
