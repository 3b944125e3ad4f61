//! Primitive bitstream layer
//!
//! A pair of cursors over raw bytes: [`BitWriter`] appends sub-byte fields
//! to a growable buffer, [`BitReader`] walks them back. Values are packed
//! least-significant-bit first; nothing here knows about blocks or records.

mod reader;
mod writer;

pub use reader::BitReader;
pub use writer::BitWriter;

/// Map a signed value into the unsigned domain used by VBR encoding.
///
/// Zero and small magnitudes of either sign stay small: non-negative `v`
/// becomes `v << 1`, negative `v` becomes `(-v << 1) | 1`. The domain
/// excludes `i64::MIN`, whose negation does not exist.
#[inline]
pub fn svbr_encode(value: i64) -> u64 {
    if value < 0 {
        (((-value) as u64) << 1) | 1
    } else {
        (value as u64) << 1
    }
}

/// Inverse of [`svbr_encode`].
#[inline]
pub fn svbr_decode(value: u64) -> i64 {
    if value & 1 == 0 {
        (value >> 1) as i64
    } else {
        -((value >> 1) as i64)
    }
}

/// The 64-symbol char6 alphabet, in code order.
pub const CHAR6_ALPHABET: &[u8; 64] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._";

/// Encode one character into its 6-bit code, or `None` outside the alphabet.
pub(crate) fn char6_encode(ch: u8) -> Option<u8> {
    match ch {
        b'a'..=b'z' => Some(ch - b'a'),
        b'A'..=b'Z' => Some(ch - b'A' + 26),
        b'0'..=b'9' => Some(ch - b'0' + 52),
        b'.' => Some(62),
        b'_' => Some(63),
        _ => None,
    }
}

/// Decode a 6-bit code back to its character. Total over 0..64.
pub(crate) fn char6_decode(code: u8) -> u8 {
    debug_assert!(code < 64);
    CHAR6_ALPHABET[(code & 0x3F) as usize]
}
