//! Bit-granular writer over a growable byte buffer
//!
//! Values are appended least-significant-bit first. The position is only
//! byte-aligned after an explicit [`BitWriter::align32`]; between calls it
//! may sit mid-byte.

use crate::error::EncodeError;

use super::char6_encode;

/// Append-only bit cursor owning the output buffer.
///
/// One instance per encoding session; hand the buffer off with
/// [`BitWriter::into_bytes`] once the session is complete.
#[derive(Debug, Default)]
pub struct BitWriter {
    buf: Vec<u8>,
    /// Total bits written so far
    bit_pos: usize,
}

impl BitWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with pre-allocated capacity in bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            bit_pos: 0,
        }
    }

    /// Append the low `width` bits of `value`, LSB first.
    ///
    /// Width 0 is a legal no-op; width above 64 is a contract violation.
    pub fn write_fixed(&mut self, width: u32, value: u64) -> Result<(), EncodeError> {
        if width > 64 {
            return Err(EncodeError::InvalidFixedWidth { width });
        }
        if width == 0 {
            return Ok(());
        }
        let masked = if width == 64 {
            value
        } else {
            value & ((1u64 << width) - 1)
        };
        self.push_bits(width, masked);
        Ok(())
    }

    /// Append `value` in VBR form: groups of `width - 1` payload bits, low
    /// group first, with the top bit of each group flagging continuation.
    pub fn write_vbr(&mut self, width: u32, mut value: u64) -> Result<(), EncodeError> {
        if !(2..=32).contains(&width) {
            return Err(EncodeError::InvalidVbrWidth { width });
        }
        let payload_mask = (1u64 << (width - 1)) - 1;
        let hi_bit = payload_mask + 1;
        loop {
            let group = value & payload_mask;
            value >>= width - 1;
            if value == 0 {
                self.push_bits(width, group);
                return Ok(());
            }
            self.push_bits(width, group | hi_bit);
        }
    }

    /// Append one character of the char6 alphabet as a 6-bit code
    pub fn write_char6(&mut self, ch: u8) -> Result<(), EncodeError> {
        let code = char6_encode(ch).ok_or(EncodeError::Char6OutOfRange { ch: ch as char })?;
        self.push_bits(6, u64::from(code));
        Ok(())
    }

    /// Append raw bytes through the bit cursor.
    ///
    /// Works mid-byte, though every call site in the structured layer is
    /// 32-bit aligned first.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push_bits(8, u64::from(b));
        }
    }

    /// Length-prefixed blob: vbr6 length, align, raw bytes, zero-pad back
    /// to a 32-bit boundary.
    pub fn write_blob(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.write_vbr(6, bytes.len() as u64)?;
        self.align32();
        self.write_bytes(bytes);
        self.align32();
        Ok(())
    }

    /// Pad with zero bits up to the next 32-bit boundary. Idempotent when
    /// already aligned.
    pub fn align32(&mut self) {
        let rem = (self.bit_pos % 32) as u32;
        if rem != 0 {
            self.push_bits(32 - rem, 0);
        }
    }

    /// Current position in whole bytes. Meaningful only while the stream is
    /// byte-aligned, which is the only time the structured layer asks.
    pub fn byte_offset(&self) -> usize {
        debug_assert!(self.bit_pos % 8 == 0, "byte_offset taken mid-byte");
        self.bit_pos / 8
    }

    /// Total bits written
    pub fn bit_len(&self) -> usize {
        self.bit_pos
    }

    /// Overwrite a previously written little-endian u32 at `offset`.
    ///
    /// The one mutation of already-flushed bytes; used to fill in block
    /// length words once the block is closed.
    pub fn patch_word(&mut self, offset: usize, value: u32) -> Result<(), EncodeError> {
        let len = self.buf.len();
        match offset.checked_add(4) {
            Some(end) if end <= len => {
                self.buf[offset..end].copy_from_slice(&value.to_le_bytes());
                Ok(())
            }
            _ => Err(EncodeError::PatchOutOfBounds { offset, len }),
        }
    }

    /// View the bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer, returning the output buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Append `width` (1..=64) pre-masked bits, LSB first.
    fn push_bits(&mut self, width: u32, value: u64) {
        debug_assert!(width >= 1 && width <= 64);
        debug_assert!(width == 64 || value >> width == 0, "value has stray high bits");
        let mut remaining = width;
        let mut v = value;
        while remaining > 0 {
            let idx = self.bit_pos / 8;
            let bit_in_byte = (self.bit_pos % 8) as u32;
            if idx == self.buf.len() {
                self.buf.push(0);
            }
            let take = (8 - bit_in_byte).min(remaining);
            let chunk = (v & ((1u64 << take) - 1)) as u8;
            self.buf[idx] |= chunk << bit_in_byte;
            v >>= take;
            self.bit_pos += take as usize;
            remaining -= take;
        }
    }
}
