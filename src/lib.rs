//! LLVM-compatible bitstream codec
//!
//! This crate provides the bit-level container encoding used when emitting
//! shader/program bytecode for an external LLVM bitcode reader. It is split
//! into two strictly ordered layers:
//!
//! - [`stream`] - primitive bit packing: fixed-width fields, VBR integers,
//!   the signed-VBR transform, char6, 32-bit alignment, blobs, and in-place
//!   word patching over a growable byte buffer.
//! - [`writer`] - structured emission: nested length-prefixed blocks with
//!   backpatched length words, unabbreviated records, and the BLOCKINFO
//!   block carrying the fixed abbreviation tables the external reader
//!   expects.
//!
//! The codec guarantees bit-exact framing only; it never interprets the
//! meaning of the record values it packs.

pub mod abbrev;
pub mod block;
pub mod stream;

mod error;
mod writer;

#[cfg(test)]
mod tests;

pub use abbrev::{bits_needed, known_abbrevs, AbbrevParam};
pub use block::BlockId;
pub use error::{BitstreamError, BitstreamResult, DecodeError, EncodeError};
pub use stream::{svbr_decode, svbr_encode, BitReader, BitWriter};
pub use writer::BitcodeWriter;
