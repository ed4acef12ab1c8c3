//! The 128-bit unsigned integer backing currency and gas amounts.

/// The number of bytes in the canonical fixed-width encoding of a [`U128`].
pub const UINT128_SERIALIZED_LENGTH: usize = 16;

#[allow(
    clippy::assign_op_pattern,
    clippy::ptr_offset_with_cast,
    clippy::manual_range_contains,
    clippy::range_plus_one,
    clippy::transmute_ptr_to_ptr,
    clippy::reversed_empty_ranges
)]
mod macro_code {
    use uint::construct_uint;

    construct_uint! {
        pub struct U128(2);
    }
}

pub use self::macro_code::U128;

impl U128 {
    /// Returns the canonical fixed 16-byte big-endian encoding of `self`.
    pub fn to_fixed_bytes(self) -> [u8; UINT128_SERIALIZED_LENGTH] {
        let mut buffer = [0u8; UINT128_SERIALIZED_LENGTH];
        self.to_big_endian(&mut buffer);
        buffer
    }

    /// Decodes a value from its canonical fixed 16-byte big-endian encoding.
    ///
    /// Returns `None` unless `slice` is exactly 16 bytes long.
    pub fn from_fixed_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != UINT128_SERIALIZED_LENGTH {
            return None;
        }
        Some(U128::from_big_endian(slice))
    }
}
