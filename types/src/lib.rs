//! Types shared across the tessera network.
//!
//! This crate holds the primitives every other tessera crate speaks in:
//! the 128-bit unsigned integer used for currency and gas amounts, the
//! SHA3-256 [`Digest`], tagged account [`Address`]es, the checked [`Gas`] and
//! [`Motes`] newtypes, and the asymmetric-key operations in [`crypto`].

#![warn(missing_docs)]

mod address;
pub mod crypto;
mod digest;
mod gas;
mod motes;
mod uint;

pub use address::{Address, AddressError, ADDRESS_LENGTH};
pub use digest::Digest;
pub use gas::Gas;
pub use motes::Motes;
pub use uint::{U128, UINT128_SERIALIZED_LENGTH};
