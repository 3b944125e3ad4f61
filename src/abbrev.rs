//! Known abbreviation tables
//!
//! The external reader's LLVM hardcodes compact encodings for value symbol
//! table entries, constant records, and function instruction records. The
//! tables here reproduce those definitions as immutable data; the structured
//! writer serializes them into the BLOCKINFO block.

use serde::{Deserialize, Serialize};

use crate::block::record::{constants, function, value_symtab};
use crate::block::BlockId;

/// One parameter of an abbreviation definition.
///
/// `TypeIndexWidth` is the single dynamically resolved parameter: at
/// BLOCKINFO emission time it becomes `Fixed(bits_needed(num_types))`, the
/// minimum fixed width addressing the module's type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbbrevParam {
    /// Constant value baked into the abbreviation, absent from records
    Literal(u64),
    /// Fixed-width field of the given bit width
    Fixed(u8),
    /// VBR field of the given group width
    Vbr(u8),
    /// Variable-length tail; the following parameter gives the element type
    Array,
    /// One char6-coded character
    Char6,
    /// Fixed-width field sized to the module's type count, resolved at
    /// emission time
    TypeIndexWidth,
}

/// Wire codes for the 3-bit encoding tag in DEFINE_ABBREV
pub mod encoding {
    /// Fixed-width operand follows (vbr5 width)
    pub const FIXED: u64 = 1;
    /// VBR operand follows (vbr5 group width)
    pub const VBR: u64 = 2;
    /// Array marker, no operand
    pub const ARRAY: u64 = 3;
    /// Char6 element, no operand
    pub const CHAR6: u64 = 4;
}

use AbbrevParam::{Array, Char6, Fixed, Literal, TypeIndexWidth, Vbr};

/// Value symbol table abbreviations: Entry8, Entry7, Entry6, BbEntry6
pub const VALUE_SYMTAB_ABBREVS: &[&[AbbrevParam]] = &[
    &[Fixed(3), Vbr(8), Array, Fixed(8)],
    &[Literal(value_symtab::ENTRY), Vbr(8), Array, Fixed(7)],
    &[Literal(value_symtab::ENTRY), Vbr(8), Array, Char6],
    &[Literal(value_symtab::BBENTRY), Vbr(8), Array, Char6],
];

/// Constants block abbreviations: SetType, Integer, EvalCast, Null
pub const CONSTANTS_ABBREVS: &[&[AbbrevParam]] = &[
    &[Literal(constants::SETTYPE), TypeIndexWidth],
    &[Literal(constants::INTEGER), Vbr(8)],
    &[Literal(constants::CE_CAST), Fixed(4), TypeIndexWidth, Vbr(8)],
    &[Literal(constants::NULL)],
];

/// Function block abbreviations: Load, BinOp, BinOpFlags, Cast, RetVoid,
/// RetValue, Unreachable, GEP
pub const FUNCTION_ABBREVS: &[&[AbbrevParam]] = &[
    &[Literal(function::INST_LOAD), Vbr(6), TypeIndexWidth, Vbr(4), Fixed(1)],
    &[Literal(function::INST_BINOP), Vbr(6), Vbr(6), Fixed(4)],
    &[Literal(function::INST_BINOP), Vbr(6), Vbr(6), Fixed(4), Fixed(7)],
    &[Literal(function::INST_CAST), Vbr(6), TypeIndexWidth, Fixed(4)],
    &[Literal(function::INST_RET)],
    &[Literal(function::INST_RET), Vbr(6)],
    &[Literal(function::INST_UNREACHABLE)],
    &[Literal(function::INST_GEP), Fixed(1), TypeIndexWidth, Array, Vbr(6)],
];

/// Known abbreviations for a block kind; empty for kinds without tables.
pub fn known_abbrevs(block: BlockId) -> &'static [&'static [AbbrevParam]] {
    match block {
        BlockId::ValueSymtab => VALUE_SYMTAB_ABBREVS,
        BlockId::Constants => CONSTANTS_ABBREVS,
        BlockId::Function => FUNCTION_ABBREVS,
        _ => &[],
    }
}

/// Minimum fixed width able to index a table of `count` entries, defined as
/// the bit width of the count itself, clamped to 1 for an empty table.
///
/// Transitions at powers of two: 1→1, 2→2, 255→8, 256→9.
pub fn bits_needed(count: u32) -> u32 {
    (32 - count.leading_zeros()).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_abbrev_lookup() {
        assert_eq!(known_abbrevs(BlockId::ValueSymtab).len(), 4);
        assert_eq!(known_abbrevs(BlockId::Constants).len(), 4);
        assert_eq!(known_abbrevs(BlockId::Function).len(), 8);
        assert!(known_abbrevs(BlockId::Module).is_empty());
        assert!(known_abbrevs(BlockId::Metadata).is_empty());
        assert!(known_abbrevs(BlockId::BlockInfo).is_empty());
    }

    #[test]
    fn test_definitions_within_parameter_limit() {
        for block in [BlockId::ValueSymtab, BlockId::Constants, BlockId::Function] {
            for def in known_abbrevs(block) {
                assert!(!def.is_empty());
                assert!(def.len() <= 8, "definition exceeds 8 parameters");
            }
        }
    }

    #[test]
    fn test_array_parameter_has_element_type() {
        // an Array must be followed by exactly one scalar element parameter
        for block in [BlockId::ValueSymtab, BlockId::Constants, BlockId::Function] {
            for def in known_abbrevs(block) {
                if let Some(pos) = def.iter().position(|p| *p == AbbrevParam::Array) {
                    assert_eq!(pos, def.len() - 2, "Array must be second-to-last");
                    assert!(matches!(
                        def[pos + 1],
                        AbbrevParam::Fixed(_) | AbbrevParam::Vbr(_) | AbbrevParam::Char6
                    ));
                }
            }
        }
    }

    #[test]
    fn test_bits_needed_transitions_at_powers_of_two() {
        assert_eq!(bits_needed(0), 1);
        assert_eq!(bits_needed(1), 1);
        assert_eq!(bits_needed(2), 2);
        assert_eq!(bits_needed(3), 2);
        assert_eq!(bits_needed(4), 3);
        assert_eq!(bits_needed(255), 8);
        assert_eq!(bits_needed(256), 9);
        assert_eq!(bits_needed(257), 9);
        assert_eq!(bits_needed(u32::MAX), 32);
    }
}
