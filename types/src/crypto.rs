//! Asymmetric-key types and operations on them.
//!
//! Transactions are signed over their canonical hash with a recoverable
//! secp256k1 ECDSA signature; verification recovers the signer's public key
//! from the signature rather than carrying the key on the wire.

use std::fmt::{self, Debug, Display, Formatter};

use k256::ecdsa::{RecoveryId, Signature as Secp256k1Signature, SigningKey, VerifyingKey};
use rand::{CryptoRng, RngCore};
use thiserror::Error;

/// The number of bytes in a recoverable secp256k1 signature (`r || s || v`).
pub const SIGNATURE_LENGTH: usize = 65;

const SECP256K1: &str = "secp256k1";
const SECP256K1_TAG: u8 = 1;

/// Cryptography errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The algorithm tag names no known signature algorithm.
    #[error("unknown signature algorithm tag {0}")]
    UnknownAlgorithm(u8),
    /// A signature was not the expected width.
    #[error("signature must be {SIGNATURE_LENGTH} bytes, got {0}")]
    InvalidSignatureLength(usize),
    /// The trailing recovery byte was out of range.
    #[error("invalid signature recovery id {0}")]
    InvalidRecoveryId(u8),
    /// The `r || s` portion did not parse as a signature.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),
    /// Secret key material did not parse.
    #[error("malformed secret key: {0}")]
    MalformedSecretKey(String),
    /// No public key could be recovered from the signature.
    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),
    /// Producing a signature failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),
}

/// A signature algorithm identifier, carried on the wire as a single byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Algorithm {
    /// Recoverable ECDSA over the secp256k1 curve.
    Secp256k1 = SECP256K1_TAG,
}

impl Algorithm {
    /// Returns the wire tag of the algorithm.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Algorithm {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Algorithm, Self::Error> {
        match tag {
            SECP256K1_TAG => Ok(Algorithm::Secp256k1),
            _ => Err(Error::UnknownAlgorithm(tag)),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self {
            Algorithm::Secp256k1 => formatter.write_str(SECP256K1),
        }
    }
}

/// A secret key used to sign transactions.
#[derive(Clone)]
pub struct SecretKey(SigningKey);

impl SecretKey {
    /// The length in bytes of raw secp256k1 secret key material.
    pub const SECP256K1_LENGTH: usize = 32;

    /// Generates a fresh secret key using the given source of randomness.
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> SecretKey {
        SecretKey(SigningKey::random(rng))
    }

    /// Constructs a secret key from raw 32-byte scalar material.
    pub fn from_slice(bytes: &[u8]) -> Result<SecretKey, Error> {
        SigningKey::from_slice(bytes)
            .map(SecretKey)
            .map_err(|err| Error::MalformedSecretKey(err.to_string()))
    }

    /// Returns the algorithm this key signs with.
    pub fn algorithm(&self) -> Algorithm {
        Algorithm::Secp256k1
    }

    /// Returns the public half of the keypair.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.verifying_key().clone())
    }
}

// Avoid printing key material in logs.
impl Debug for SecretKey {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "SecretKey({})", self.algorithm())
    }
}

/// A public key.
#[derive(Clone)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Returns the uncompressed SEC1 encoding of the key.
    ///
    /// This is the form addresses are derived from.
    pub fn encoded(&self) -> Vec<u8> {
        self.0.to_encoded_point(false).as_bytes().to_vec()
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.encoded() == other.encoded()
    }
}

impl Eq for PublicKey {}

impl Debug for PublicKey {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "PublicKey({})", hex::encode(self.encoded()))
    }
}

/// Signs the given 32-byte message digest, returning the 65-byte recoverable
/// signature `r || s || v`.
pub fn sign<T: AsRef<[u8]>>(message: T, secret_key: &SecretKey) -> Result<Vec<u8>, Error> {
    let (signature, recovery_id) = secret_key
        .0
        .sign_prehash_recoverable(message.as_ref())
        .map_err(|err| Error::SigningFailed(err.to_string()))?;
    let mut bytes = Vec::with_capacity(SIGNATURE_LENGTH);
    bytes.extend_from_slice(&signature.to_bytes());
    bytes.push(recovery_id.to_byte());
    Ok(bytes)
}

/// Recovers the public key that produced `signature` over the given 32-byte
/// message digest, under the named algorithm.
pub fn recover_public(
    algorithm: Algorithm,
    message: &[u8],
    signature: &[u8],
) -> Result<PublicKey, Error> {
    match algorithm {
        Algorithm::Secp256k1 => recover_secp256k1(message, signature),
    }
}

fn recover_secp256k1(message: &[u8], signature: &[u8]) -> Result<PublicKey, Error> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(Error::InvalidSignatureLength(signature.len()));
    }
    let recovery_byte = signature[SIGNATURE_LENGTH - 1];
    let recovery_id =
        RecoveryId::from_byte(recovery_byte).ok_or(Error::InvalidRecoveryId(recovery_byte))?;
    let signature = Secp256k1Signature::from_slice(&signature[..SIGNATURE_LENGTH - 1])
        .map_err(|err| Error::MalformedSignature(err.to_string()))?;
    VerifyingKey::recover_from_prehash(message, &signature, recovery_id)
        .map(PublicKey)
        .map_err(|err| Error::RecoveryFailed(err.to_string()))
}
