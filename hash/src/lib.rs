//! Fixed-width digest type used by the nipopow core.
//!
//! Mirrors the role of `nimiq-hash`'s `Blake2bHash`: a 32-byte digest with a
//! `Hash` trait for self-hashing content, plus a stable textual form for
//! logging and diagnostics.

use std::fmt;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

pub const SIZE: usize = 32;

type Blake2b256 = Blake2b<U32>;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash32(pub [u8; SIZE]);

impl Hash32 {
    pub fn as_bytes(&self) -> &[u8; SIZE] {
        &self.0
    }

    /// Interprets the leading 16 bytes as a big-endian integer. Used by
    /// `BlockUtils::hash_to_target` to read claimed work off a hash.
    pub fn leading_u128(&self) -> u128 {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(&self.0[..16]);
        u128::from_be_bytes(buf)
    }

    pub fn leading_zero_bits(&self) -> u32 {
        for (i, byte) in self.0.iter().enumerate() {
            if *byte != 0 {
                return (i as u32) * 8 + byte.leading_zeros();
            }
        }
        SIZE as u32 * 8
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base32())
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base32())
    }
}

impl Hash32 {
    pub fn to_base32(&self) -> String {
        data_encoding::BASE32_NOPAD.encode(&self.0)
    }
}

impl From<[u8; SIZE]> for Hash32 {
    fn from(bytes: [u8; SIZE]) -> Self {
        Hash32(bytes)
    }
}

/// Implemented by anything that can self-hash into a [`Hash32`], following
/// `nimiq-hash`'s `SerializeContent` + `Hash` split: content is first reduced
/// to bytes, then digested.
pub trait SerializeContent {
    fn serialize_content(&self, out: &mut Vec<u8>);
}

pub trait Hashable {
    fn hash(&self) -> Hash32;
}

impl<T: SerializeContent> Hashable for T {
    fn hash(&self) -> Hash32 {
        let mut buf = Vec::new();
        self.serialize_content(&mut buf);
        let mut hasher = Blake2b256::new();
        hasher.update(&buf);
        let digest = hasher.finalize();
        let mut out = [0u8; SIZE];
        out.copy_from_slice(&digest);
        Hash32(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bytes(Vec<u8>);
    impl SerializeContent for Bytes {
        fn serialize_content(&self, out: &mut Vec<u8>) {
            out.extend_from_slice(&self.0);
        }
    }

    #[test]
    fn hash_is_deterministic() {
        let a = Bytes(vec![1, 2, 3]).hash();
        let b = Bytes(vec![1, 2, 3]).hash();
        assert_eq!(a, b);
    }

    #[test]
    fn hash_differs_on_content() {
        let a = Bytes(vec![1, 2, 3]).hash();
        let b = Bytes(vec![1, 2, 4]).hash();
        assert_ne!(a, b);
    }

    #[test]
    fn leading_zero_bits_of_zero_hash() {
        let h = Hash32::default();
        assert_eq!(h.leading_zero_bits(), SIZE as u32 * 8);
    }
}
