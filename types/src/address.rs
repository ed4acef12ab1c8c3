//! Account addresses.

use std::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{crypto::PublicKey, Digest};

/// The number of bytes in an [`Address`].
pub const ADDRESS_LENGTH: usize = 21;

/// Tag byte identifying an address owned by an external keypair.
const USER_ADDRESS_TAG: u8 = 0x57;
/// Tag byte identifying an address owned by a deployed contract.
const CONTRACT_ADDRESS_TAG: u8 = 0x58;

/// The number of trailing digest bytes carried in an address.
const ADDRESS_BODY_LENGTH: usize = ADDRESS_LENGTH - 1;

/// Error while constructing an [`Address`] from raw material.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AddressError {
    /// The input was not exactly [`ADDRESS_LENGTH`] bytes long.
    #[error("address must be {ADDRESS_LENGTH} bytes, got {0}")]
    InvalidLength(usize),
    /// The leading tag byte named neither a user nor a contract account.
    #[error("unknown address tag byte {0:#04x}")]
    InvalidTag(u8),
    /// The input was not valid hexadecimal.
    #[error("address is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// A fixed-width account identifier.
///
/// The leading byte tags the account kind (user or contract); the remaining
/// 20 bytes are the tail of a SHA3-256 digest over the keying material.
#[derive(
    Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[serde(deny_unknown_fields)]
pub struct Address(#[serde(with = "serde_helpers")] [u8; ADDRESS_LENGTH]);

impl Address {
    /// Derives the user address owned by the given public key.
    ///
    /// The body is the trailing 20 bytes of the SHA3-256 digest of the key's
    /// encoded form.
    pub fn from_public_key(public_key: &PublicKey) -> Address {
        Self::from_digest(USER_ADDRESS_TAG, &Digest::hash(public_key.encoded()))
    }

    /// Derives the contract address named by the given creation digest.
    pub fn new_contract(digest: &Digest) -> Address {
        Self::from_digest(CONTRACT_ADDRESS_TAG, digest)
    }

    fn from_digest(tag: u8, digest: &Digest) -> Address {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[0] = tag;
        let body = &digest.as_bytes()[Digest::LENGTH - ADDRESS_BODY_LENGTH..];
        bytes[1..].copy_from_slice(body);
        Address(bytes)
    }

    /// Returns `true` if this address identifies a user account.
    pub fn is_user(&self) -> bool {
        self.0[0] == USER_ADDRESS_TAG
    }

    /// Returns `true` if this address identifies a contract account.
    pub fn is_contract(&self) -> bool {
        self.0[0] == CONTRACT_ADDRESS_TAG
    }

    /// Returns the raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns a copy of the wrapped byte array.
    pub fn value(self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = AddressError;

    fn try_from(slice: &[u8]) -> Result<Address, Self::Error> {
        let bytes = <[u8; ADDRESS_LENGTH]>::try_from(slice)
            .map_err(|_| AddressError::InvalidLength(slice.len()))?;
        match bytes[0] {
            USER_ADDRESS_TAG | CONTRACT_ADDRESS_TAG => Ok(Address(bytes)),
            tag => Err(AddressError::InvalidTag(tag)),
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(input: &str) -> Result<Address, Self::Err> {
        let bytes = hex::decode(input)?;
        Address::try_from(bytes.as_slice())
    }
}

impl Debug for Address {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "Address({})", hex::encode(self.0))
    }
}

impl Display for Address {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "{}", hex::encode(self.0))
    }
}

mod serde_helpers {
    use serde::{de::Error as DeError, Deserialize, Deserializer, Serializer};

    use super::{Address, ADDRESS_LENGTH};

    pub(super) fn serialize<S: Serializer>(
        bytes: &[u8; ADDRESS_LENGTH],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u8; ADDRESS_LENGTH], D::Error> {
        let hex_string = String::deserialize(deserializer)?;
        let address: Address = hex_string.parse().map_err(DeError::custom)?;
        Ok(address.value())
    }
}
