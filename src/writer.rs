//! Structured bitcode writer
//!
//! Frames records into nested, length-prefixed blocks over the primitive
//! [`BitWriter`]. Each open block fixes the abbreviation width used for the
//! next selector code; block lengths are unknown at open time and
//! backpatched on close.

use tracing::{error, trace};

use crate::abbrev::{bits_needed, encoding, known_abbrevs, AbbrevParam};
use crate::block::{abbrev_id, BlockId, MAGIC, TOP_LEVEL_ABBREV_WIDTH};
use crate::error::{BitstreamResult, EncodeError};
use crate::stream::BitWriter;

/// An open block awaiting its END_BLOCK
#[derive(Debug, Clone, Copy)]
struct BlockFrame {
    block: BlockId,
    /// Byte offset of the zeroed length word, patched on close
    length_offset: usize,
}

/// Writer for the structured block/record layer.
///
/// One session per output stream; the constructor emits the 4-byte magic and
/// [`finish`](Self::finish) hands the buffer off once every block is closed.
///
/// ```
/// use bcbits::{BitcodeWriter, BlockId};
///
/// let mut w = BitcodeWriter::new();
/// w.begin_block(BlockId::Module)?;
/// w.write_record(1, &[60])?;
/// w.end_block()?;
/// let bytes = w.finish()?;
/// assert_eq!(&bytes[..2], b"BC");
/// # Ok::<(), bcbits::BitstreamError>(())
/// ```
#[derive(Debug)]
pub struct BitcodeWriter {
    stream: BitWriter,
    stack: Vec<BlockFrame>,
    /// Width used to encode the next abbreviation-id selector
    abbrev_width: u32,
}

impl BitcodeWriter {
    /// Start a session: writes the stream magic, no block open.
    pub fn new() -> Self {
        let mut stream = BitWriter::new();
        stream.write_bytes(&MAGIC);
        Self {
            stream,
            stack: Vec::new(),
            abbrev_width: TOP_LEVEL_ABBREV_WIDTH,
        }
    }

    /// Open a nested block.
    ///
    /// Emits ENTER_SUBBLOCK at the enclosing width, the block id (vbr8), the
    /// block's own abbreviation width (vbr4), then a zeroed 32-bit length
    /// placeholder to be patched by [`end_block`](Self::end_block).
    pub fn begin_block(&mut self, block: BlockId) -> BitstreamResult<()> {
        let new_width = block.abbrev_width();
        trace!(block = block.name(), width = new_width, "begin block");

        self.stream.write_fixed(self.abbrev_width, abbrev_id::ENTER_SUBBLOCK)?;
        self.stream.write_vbr(8, block as u64)?;
        self.stream.write_vbr(4, u64::from(new_width))?;
        self.stream.align32();

        let length_offset = self.stream.byte_offset();
        self.stream.write_fixed(32, 0)?;

        self.stack.push(BlockFrame {
            block,
            length_offset,
        });
        self.abbrev_width = new_width;
        Ok(())
    }

    /// Open a block from its raw wire id.
    ///
    /// An id with no registered width is a contract violation: nothing is
    /// emitted and the block stack is untouched.
    pub fn begin_block_id(&mut self, id: u64) -> BitstreamResult<()> {
        let block = BlockId::from_u64(id).ok_or_else(|| {
            error!(id, "encoding error: unrecognised block id");
            EncodeError::UnknownBlock { id }
        })?;
        self.begin_block(block)
    }

    /// Close the innermost block and backpatch its length word.
    ///
    /// The patched value is the block's content size in 32-bit words, the
    /// length word itself excluded.
    pub fn end_block(&mut self) -> BitstreamResult<()> {
        let frame = *self.stack.last().ok_or(EncodeError::UnbalancedEndBlock)?;

        self.stream.write_fixed(self.abbrev_width, abbrev_id::END_BLOCK)?;
        self.stream.align32();

        // the length word itself is not counted
        let length_bytes = self.stream.byte_offset() - frame.length_offset - 4;
        self.stream.patch_word(frame.length_offset, (length_bytes / 4) as u32)?;

        self.stack.pop();
        self.abbrev_width = match self.stack.last() {
            Some(parent) => parent.block.abbrev_width(),
            None => TOP_LEVEL_ABBREV_WIDTH,
        };
        trace!(
            block = frame.block.name(),
            words = length_bytes / 4,
            "end block"
        );
        Ok(())
    }

    /// Emit an unabbreviated record: explicit code, operand count, then each
    /// operand, all vbr6. Operands keep full 64-bit precision.
    pub fn write_record(&mut self, code: u64, operands: &[u64]) -> BitstreamResult<()> {
        self.stream.write_fixed(self.abbrev_width, abbrev_id::UNABBREV_RECORD)?;
        self.stream.write_vbr(6, code)?;
        self.stream.write_vbr(6, operands.len() as u64)?;
        for &op in operands {
            self.stream.write_vbr(6, op)?;
        }
        Ok(())
    }

    /// Single-operand convenience for [`write_record`](Self::write_record)
    pub fn write_record_one(&mut self, code: u64, value: u64) -> BitstreamResult<()> {
        self.write_record(code, &[value])
    }

    /// Emit the BLOCKINFO block predefining the abbreviation tables for the
    /// block kinds that recur as subblocks (value symtab, constants,
    /// function).
    ///
    /// `num_types` is the size of the module's type table; every
    /// [`AbbrevParam::TypeIndexWidth`] parameter resolves here to a fixed
    /// field of [`bits_needed`]`(num_types)` bits.
    pub fn write_blockinfo(&mut self, num_types: u32) -> BitstreamResult<()> {
        self.begin_block(BlockId::BlockInfo)?;

        for block in [BlockId::ValueSymtab, BlockId::Constants, BlockId::Function] {
            self.write_record_one(crate::block::record::blockinfo::SETBID, block as u64)?;

            for def in known_abbrevs(block) {
                self.write_abbrev_def(def, num_types)?;
            }
        }

        self.end_block()
    }

    /// Serialize one DEFINE_ABBREV: param count vbr5, then per parameter a
    /// 1-bit literal flag and either the literal value (vbr8) or the 3-bit
    /// encoding tag plus width operand (vbr5) for Fixed/Vbr.
    fn write_abbrev_def(&mut self, def: &[AbbrevParam], num_types: u32) -> BitstreamResult<()> {
        self.stream.write_fixed(self.abbrev_width, abbrev_id::DEFINE_ABBREV)?;
        self.stream.write_vbr(5, def.len() as u64)?;

        for &param in def {
            let param = match param {
                AbbrevParam::TypeIndexWidth => AbbrevParam::Fixed(bits_needed(num_types) as u8),
                other => other,
            };
            match param {
                AbbrevParam::Literal(value) => {
                    self.stream.write_fixed(1, 1)?;
                    self.stream.write_vbr(8, value)?;
                }
                AbbrevParam::Fixed(width) => {
                    self.stream.write_fixed(1, 0)?;
                    self.stream.write_fixed(3, encoding::FIXED)?;
                    self.stream.write_vbr(5, u64::from(width))?;
                }
                AbbrevParam::Vbr(width) => {
                    self.stream.write_fixed(1, 0)?;
                    self.stream.write_fixed(3, encoding::VBR)?;
                    self.stream.write_vbr(5, u64::from(width))?;
                }
                AbbrevParam::Array => {
                    self.stream.write_fixed(1, 0)?;
                    self.stream.write_fixed(3, encoding::ARRAY)?;
                }
                AbbrevParam::Char6 => {
                    self.stream.write_fixed(1, 0)?;
                    self.stream.write_fixed(3, encoding::CHAR6)?;
                }
                AbbrevParam::TypeIndexWidth => unreachable!("resolved above"),
            }
        }
        Ok(())
    }

    /// Number of blocks currently open
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Kind of the innermost open block, if any
    pub fn current_block(&self) -> Option<BlockId> {
        self.stack.last().map(|f| f.block)
    }

    /// Abbreviation width of the current scope
    pub fn abbrev_width(&self) -> u32 {
        self.abbrev_width
    }

    /// View the bytes emitted so far
    pub fn as_bytes(&self) -> &[u8] {
        self.stream.as_bytes()
    }

    /// Close the session and return the stream.
    ///
    /// Fails if any block is still open; a truncated stream must not reach
    /// the external reader.
    pub fn finish(self) -> BitstreamResult<Vec<u8>> {
        if !self.stack.is_empty() {
            return Err(EncodeError::UnclosedBlocks {
                depth: self.stack.len(),
            }
            .into());
        }
        Ok(self.stream.into_bytes())
    }
}

impl Default for BitcodeWriter {
    fn default() -> Self {
        Self::new()
    }
}
