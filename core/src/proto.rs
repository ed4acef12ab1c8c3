//! Wire-level transaction records.
//!
//! These are hand-written `prost` message structs; field numbers and widths
//! are consensus-observable and must never change. The canonical transaction
//! hash covers the protobuf encoding of [`Data`], so even the internal
//! framing of that message is fixed.

use serde::{Deserialize, Serialize};

/// The typed body of a transaction.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct Data {
    /// Payload kind tag, one of `binary`, `deploy`, `call`, `candidate`,
    /// `delegate`.
    #[prost(string, tag = "1")]
    #[serde(rename = "type")]
    pub payload_type: ::prost::alloc::string::String,
    /// Opaque payload bytes; meaning defined by the type tag.
    #[prost(bytes = "vec", tag = "2")]
    pub payload: ::prost::alloc::vec::Vec<u8>,
}

/// A transaction as framed on the wire.
///
/// `value`, `gas_price` and `gas_limit` travel as fixed 16-byte big-endian
/// byte strings; `alg` is widened to u32.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct Transaction {
    /// Canonical hash of the remaining fields.
    #[prost(bytes = "vec", tag = "1")]
    pub hash: ::prost::alloc::vec::Vec<u8>,
    /// Sender address.
    #[prost(bytes = "vec", tag = "2")]
    pub from: ::prost::alloc::vec::Vec<u8>,
    /// Receiver address.
    #[prost(bytes = "vec", tag = "3")]
    pub to: ::prost::alloc::vec::Vec<u8>,
    /// Transferred amount, 16-byte big-endian.
    #[prost(bytes = "vec", tag = "4")]
    pub value: ::prost::alloc::vec::Vec<u8>,
    /// Per-sender sequence number.
    #[prost(uint64, tag = "5")]
    pub nonce: u64,
    /// Construction wall-clock, seconds.
    #[prost(int64, tag = "6")]
    pub timestamp: i64,
    /// Typed payload body.
    #[prost(message, optional, tag = "7")]
    pub data: ::core::option::Option<Data>,
    /// Identifier of the chain the transaction was built for.
    #[prost(uint32, tag = "8")]
    pub chain_id: u32,
    /// Price per gas unit, 16-byte big-endian.
    #[prost(bytes = "vec", tag = "9")]
    pub gas_price: ::prost::alloc::vec::Vec<u8>,
    /// Gas ceiling, 16-byte big-endian.
    #[prost(bytes = "vec", tag = "10")]
    pub gas_limit: ::prost::alloc::vec::Vec<u8>,
    /// Signature algorithm tag, widened from u8.
    #[prost(uint32, tag = "11")]
    pub alg: u32,
    /// Signature over `hash`.
    #[prost(bytes = "vec", tag = "12")]
    pub sign: ::prost::alloc::vec::Vec<u8>,
}

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::*;

    #[test]
    fn should_encode_data_with_fixed_framing() {
        let data = Data {
            payload_type: "binary".to_string(),
            payload: vec![0xAA, 0xBB],
        };
        // field 1: tag 0x0A, len 6, "binary"; field 2: tag 0x12, len 2, bytes.
        let mut expected = vec![0x0A, 0x06];
        expected.extend_from_slice(b"binary");
        expected.extend_from_slice(&[0x12, 0x02, 0xAA, 0xBB]);
        assert_eq!(data.encode_to_vec(), expected);
    }

    #[test]
    fn should_omit_empty_data_fields() {
        let data = Data {
            payload_type: String::new(),
            payload: Vec::new(),
        };
        assert!(data.encode_to_vec().is_empty());
    }

    #[test]
    fn should_round_trip_wire_transaction() {
        let tx = Transaction {
            hash: vec![1; 32],
            from: vec![2; 21],
            to: vec![3; 21],
            value: vec![0; 16],
            nonce: 7,
            timestamp: 1_522_000_000,
            data: Some(Data {
                payload_type: "deploy".to_string(),
                payload: b"{}".to_vec(),
            }),
            chain_id: 1001,
            gas_price: vec![0; 16],
            gas_limit: vec![0; 16],
            alg: 1,
            sign: vec![9; 65],
        };
        let decoded = Transaction::decode(tx.encode_to_vec().as_slice()).expect("should decode");
        assert_eq!(tx, decoded);
    }
}
