//! The `motes` module is used for working with amounts of the native currency.

use std::fmt;

use crate::{Gas, U128};

/// A struct representing a number of `Motes`, the network's native currency unit.
///
/// All arithmetic on `Motes` is checked; there is deliberately no operator
/// overloading, so consensus code cannot wrap or panic on overflow.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Motes(U128);

impl Motes {
    /// Constructs a new `Motes`.
    pub fn new(value: U128) -> Motes {
        Motes(value)
    }

    /// Constructs a `Motes` of zero.
    pub fn zero() -> Self {
        Motes(U128::zero())
    }

    /// Returns `true` if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the inner `U128` value.
    pub fn value(&self) -> U128 {
        self.0
    }

    /// Checked integer addition. Computes `self + rhs`, returning `None` if overflow occurred.
    pub fn checked_add(&self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.value()).map(Self::new)
    }

    /// Checked integer subtraction. Computes `self - rhs`, returning `None` if underflow occurred.
    pub fn checked_sub(&self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.value()).map(Self::new)
    }

    /// Checked integer multiplication. Computes `self * rhs`, returning `None` if overflow
    /// occurred.
    pub fn checked_mul(&self, rhs: Self) -> Option<Self> {
        self.0.checked_mul(rhs.value()).map(Self::new)
    }

    /// Converts the given `gas` to `Motes` by multiplying it by the given price per gas unit.
    ///
    /// Returns `None` if an arithmetic overflow occurred.
    pub fn from_gas(gas: Gas, price: Motes) -> Option<Self> {
        price.value().checked_mul(gas.value()).map(Self::new)
    }

    /// Returns the canonical fixed 16-byte big-endian encoding of the amount.
    pub fn to_fixed_bytes(self) -> [u8; crate::UINT128_SERIALIZED_LENGTH] {
        self.0.to_fixed_bytes()
    }

    /// Decodes an amount from its canonical fixed 16-byte big-endian encoding.
    pub fn from_fixed_slice(slice: &[u8]) -> Option<Self> {
        U128::from_fixed_slice(slice).map(Self::new)
    }
}

impl fmt::Display for Motes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Motes {
    fn from(motes: u32) -> Self {
        let motes_u128: U128 = motes.into();
        Motes::new(motes_u128)
    }
}

impl From<u64> for Motes {
    fn from(motes: u64) -> Self {
        let motes_u128: U128 = motes.into();
        Motes::new(motes_u128)
    }
}
