//! The output of the network's canonical hash function.

use std::{
    array::TryFromSliceError,
    fmt::{self, Debug, Display, Formatter, LowerHex, UpperHex},
};

use serde::{Deserialize, Serialize};
use sha3::{Digest as _, Sha3_256};

/// The 32-byte output of the canonical SHA3-256 hash function.
#[derive(
    Copy, Clone, Default, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[serde(deny_unknown_fields)]
pub struct Digest(#[serde(with = "serde_helpers")] [u8; Digest::LENGTH]);

impl Digest {
    /// The number of bytes in a `Digest`.
    pub const LENGTH: usize = 32;

    /// Hashes a piece of data.
    pub fn hash<T: AsRef<[u8]>>(data: T) -> Digest {
        let mut hasher = Sha3_256::new();
        hasher.update(data);
        Digest(hasher.finalize().into())
    }

    /// Hashes the concatenation of the given parts.
    ///
    /// Equivalent to hashing the parts joined into a single buffer, with no
    /// framing added between them.
    pub fn hash_parts(parts: &[&[u8]]) -> Digest {
        let mut hasher = Sha3_256::new();
        for part in parts {
            hasher.update(part);
        }
        Digest(hasher.finalize().into())
    }

    /// Returns a copy of the wrapped bytes.
    pub fn value(self) -> [u8; Digest::LENGTH] {
        self.0
    }

    /// Returns a reference to the wrapped bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; Digest::LENGTH]> for Digest {
    fn from(bytes: [u8; Digest::LENGTH]) -> Self {
        Digest(bytes)
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Digest, Self::Error> {
        <[u8; Digest::LENGTH]>::try_from(slice).map(Digest)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for Digest {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "Digest({})", hex::encode(self.0))
    }
}

impl Display for Digest {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "{}", hex::encode(self.0))
    }
}

impl LowerHex for Digest {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "{}", hex::encode(self.0))
    }
}

impl UpperHex for Digest {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "{}", hex::encode_upper(self.0))
    }
}

mod serde_helpers {
    use serde::{de::Error as DeError, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        bytes: &[u8; super::Digest::LENGTH],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u8; super::Digest::LENGTH], D::Error> {
        let hex_string = String::deserialize(deserializer)?;
        let bytes = hex::decode(hex_string).map_err(DeError::custom)?;
        <[u8; super::Digest::LENGTH]>::try_from(bytes.as_slice())
            .map_err(|_| DeError::custom("digest must be 32 bytes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_hash_deterministically() {
        let data = b"tessera canonical hashing";
        assert_eq!(Digest::hash(data), Digest::hash(data));
    }

    #[test]
    fn should_hash_known_vector() {
        // SHA3-256 of the empty string.
        let expected = "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a";
        assert_eq!(Digest::hash([]).to_string(), expected);
    }

    #[test]
    fn should_hash_parts_as_concatenation() {
        let joined = Digest::hash(b"tessera-network".as_slice());
        let parts = Digest::hash_parts(&[b"tessera", b"-", b"network"]);
        assert_eq!(joined, parts);
    }

    #[test]
    fn should_round_trip_slice_conversion() {
        let digest = Digest::hash(b"roundtrip");
        let converted = Digest::try_from(digest.as_bytes()).expect("should convert");
        assert_eq!(digest, converted);
    }

    #[test]
    fn should_reject_wrong_length_slice() {
        assert!(Digest::try_from([0u8; 31].as_slice()).is_err());
        assert!(Digest::try_from([0u8; 33].as_slice()).is_err());
    }

    #[test]
    fn should_serialize_as_hex_string() {
        let digest = Digest::hash(b"serde");
        let json = serde_json::to_string(&digest).expect("should serialize");
        assert_eq!(json, format!("\"{}\"", digest));
        let round_tripped: Digest = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(digest, round_tripped);
    }
}
