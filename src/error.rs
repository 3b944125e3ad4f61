//! Error types for the bitstream codec

use thiserror::Error;

/// Result type alias for bitstream operations
pub type BitstreamResult<T> = Result<T, BitstreamError>;

/// Top-level error type
#[derive(Debug, Error)]
pub enum BitstreamError {
    /// Encoding error
    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    /// Decoding error
    #[error("Decoding error: {0}")]
    Decode(#[from] DecodeError),
}

/// Encoding-side errors
///
/// Every variant is a contract violation by the caller; a session that has
/// produced one of these must not have its output treated as a valid stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// Fixed-width field width out of range
    #[error("Invalid fixed width {width}: must be at most 64 bits")]
    InvalidFixedWidth { width: u32 },

    /// VBR group width out of range
    #[error("Invalid VBR width {width}: must be in 2..=32")]
    InvalidVbrWidth { width: u32 },

    /// Character outside the char6 alphabet
    #[error("Character {ch:?} is outside the char6 alphabet [a-zA-Z0-9._]")]
    Char6OutOfRange { ch: char },

    /// Block id with no registered abbreviation width
    #[error("Unrecognised block id {id}")]
    UnknownBlock { id: u64 },

    /// End-block with no matching open block
    #[error("end_block called with no open block")]
    UnbalancedEndBlock,

    /// Session finished while blocks remain open
    #[error("Stream finished with {depth} block(s) still open")]
    UnclosedBlocks { depth: usize },

    /// Backpatch target outside the written buffer
    #[error("Patch offset {offset} out of bounds for buffer of {len} bytes")]
    PatchOutOfBounds { offset: usize, len: usize },
}

/// Decoding-side errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Requested more bits than remain in the stream
    #[error("Unexpected end of stream at byte offset {offset}")]
    UnexpectedEof { offset: usize },

    /// Fixed-width field width out of range
    #[error("Invalid fixed width {width}: must be at most 64 bits")]
    InvalidFixedWidth { width: u32 },

    /// VBR group width out of range
    #[error("Invalid VBR width {width}: must be in 2..=32")]
    InvalidVbrWidth { width: u32 },

    /// VBR value does not fit in 64 bits
    #[error("VBR overflow: value exceeds 64 bits")]
    VbrOverflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EncodeError::Char6OutOfRange { ch: '?' };
        assert!(err.to_string().contains("char6 alphabet"));

        let err = DecodeError::UnexpectedEof { offset: 12 };
        assert!(err.to_string().contains("offset 12"));

        let top: BitstreamError = EncodeError::UnbalancedEndBlock.into();
        assert!(top.to_string().contains("no open block"));
    }
}
