//! Bit-granular reader mirroring [`BitWriter`](super::BitWriter)
//!
//! Borrows the encoded bytes and walks them LSB first. Running past the end
//! of the buffer is reported as [`DecodeError::UnexpectedEof`] so callers
//! can distinguish truncated input from well-formed streams.

use crate::error::DecodeError;

use super::char6_decode;

/// Read cursor over an encoded byte slice
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Bits consumed so far
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader over `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Read `width` bits as the low bits of the result, LSB first.
    pub fn read_fixed(&mut self, width: u32) -> Result<u64, DecodeError> {
        if width > 64 {
            return Err(DecodeError::InvalidFixedWidth { width });
        }
        if width == 0 {
            return Ok(0);
        }
        self.take_bits(width)
    }

    /// Read a VBR-encoded integer written with the same group width.
    pub fn read_vbr(&mut self, width: u32) -> Result<u64, DecodeError> {
        if !(2..=32).contains(&width) {
            return Err(DecodeError::InvalidVbrWidth { width });
        }
        let payload_bits = width - 1;
        let hi_bit = 1u64 << payload_bits;
        let mut result: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let group = self.take_bits(width)?;
            let payload = group & (hi_bit - 1);
            if shift >= 64 || (shift > 0 && payload >> (64 - shift) != 0) {
                return Err(DecodeError::VbrOverflow);
            }
            result |= payload << shift;
            if group & hi_bit == 0 {
                return Ok(result);
            }
            shift += payload_bits;
        }
    }

    /// Read one char6 code and map it back to its character.
    pub fn read_char6(&mut self) -> Result<u8, DecodeError> {
        let code = self.take_bits(6)?;
        Ok(char6_decode(code as u8))
    }

    /// Skip padding bits up to the next 32-bit boundary without validating
    /// their content. Idempotent when already aligned.
    pub fn align32(&mut self) -> Result<(), DecodeError> {
        let rem = self.bit_pos % 32;
        if rem != 0 {
            self.take_bits((32 - rem) as u32)?;
        }
        Ok(())
    }

    /// Read a blob written by [`BitWriter::write_blob`](super::BitWriter::write_blob),
    /// returning a view of the original bytes.
    pub fn read_blob(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.read_vbr(6)? as usize;
        self.align32()?;
        let start = self.bit_pos / 8;
        let end = start
            .checked_add(len)
            .ok_or(DecodeError::UnexpectedEof { offset: start })?;
        if end > self.data.len() {
            return Err(DecodeError::UnexpectedEof { offset: start });
        }
        self.bit_pos += len * 8;
        let blob = &self.data[start..end];
        self.align32()?;
        Ok(blob)
    }

    /// Current position in whole bytes. Meaningful only when byte-aligned.
    pub fn byte_offset(&self) -> usize {
        debug_assert!(self.bit_pos % 8 == 0, "byte_offset taken mid-byte");
        self.bit_pos / 8
    }

    /// True once every bit of the buffer has been consumed
    pub fn at_end(&self) -> bool {
        self.bit_pos >= self.data.len() * 8
    }

    fn take_bits(&mut self, width: u32) -> Result<u64, DecodeError> {
        debug_assert!(width >= 1 && width <= 64);
        let total = self.data.len() * 8;
        if self.bit_pos + width as usize > total {
            return Err(DecodeError::UnexpectedEof {
                offset: self.bit_pos / 8,
            });
        }
        let mut result: u64 = 0;
        let mut got: u32 = 0;
        while got < width {
            let idx = self.bit_pos / 8;
            let bit_in_byte = (self.bit_pos % 8) as u32;
            let take = (8 - bit_in_byte).min(width - got);
            let chunk = (u64::from(self.data[idx]) >> bit_in_byte) & ((1u64 << take) - 1);
            result |= chunk << got;
            got += take;
            self.bit_pos += take as usize;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::super::BitWriter;
    use super::*;

    #[test]
    fn test_eof_reported_with_offset() {
        let bytes = [0xFFu8; 2];
        let mut r = BitReader::new(&bytes);
        assert_eq!(r.read_fixed(16).unwrap(), 0xFFFF);
        assert_eq!(
            r.read_fixed(1),
            Err(DecodeError::UnexpectedEof { offset: 2 })
        );
    }

    #[test]
    fn test_truncated_vbr_is_eof() {
        // a lone continuation group with nothing after it
        let mut w = BitWriter::new();
        w.write_fixed(6, 0b10_0001).unwrap();
        let bytes = w.into_bytes();
        // only 8 bits in the buffer: the second group runs off the end
        let mut r = BitReader::new(&bytes[..1]);
        assert!(matches!(
            r.read_vbr(6),
            Err(DecodeError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_vbr_overflow_detected() {
        // 11 continuation groups of all-ones payload exceed 64 bits
        let mut w = BitWriter::new();
        for _ in 0..11 {
            w.write_fixed(8, 0xFF).unwrap();
        }
        w.write_fixed(8, 0x7F).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(r.read_vbr(8), Err(DecodeError::VbrOverflow));
    }

    #[test]
    fn test_align_skips_padding_without_validating() {
        // writer pads with zeros, but the reader must accept anything
        let bytes = [0x01u8, 0xAB, 0xCD, 0xEF, 0x02];
        let mut r = BitReader::new(&bytes);
        assert_eq!(r.read_fixed(1).unwrap(), 1);
        r.align32().unwrap();
        assert_eq!(r.byte_offset(), 4);
        assert_eq!(r.read_fixed(8).unwrap(), 0x02);
        assert!(r.at_end());
    }

    #[test]
    fn test_blob_truncated_body() {
        let mut w = BitWriter::new();
        w.write_blob(&[1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
        let bytes = w.into_bytes();
        // cut into the blob body
        let mut r = BitReader::new(&bytes[..6]);
        assert!(matches!(
            r.read_blob(),
            Err(DecodeError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_invalid_widths_rejected() {
        let bytes = [0u8; 16];
        let mut r = BitReader::new(&bytes);
        assert_eq!(
            r.read_fixed(65),
            Err(DecodeError::InvalidFixedWidth { width: 65 })
        );
        assert_eq!(
            r.read_vbr(1),
            Err(DecodeError::InvalidVbrWidth { width: 1 })
        );
        assert_eq!(
            r.read_vbr(33),
            Err(DecodeError::InvalidVbrWidth { width: 33 })
        );
    }
}
