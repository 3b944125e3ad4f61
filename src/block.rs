//! Block and record vocabulary for the bitstream container
//!
//! Container structure:
//! ```text
//! +---------------------+
//! | Magic: "BC" 0xC0DE  | 4 bytes
//! +---------------------+
//! | ENTER_SUBBLOCK      | abbrev-id at current width
//! |   block id          | vbr8
//! |   new abbrev width  | vbr4
//! |   <align32>         |
//! |   length in words   | u32, backpatched at END_BLOCK
//! |   records/subblocks |
//! | END_BLOCK           |
//! |   <align32>         |
//! +---------------------+
//! ```
//!
//! All ids, widths, and record codes here are fixed by the external reader
//! and must not be renumbered.

use serde::{Deserialize, Serialize};

/// Magic number identifying a bitcode stream ("BC" 0xC0DE)
pub const MAGIC: [u8; 4] = [0x42, 0x43, 0xC0, 0xDE];

/// Abbreviation width of the top-level scope, outside any block
pub const TOP_LEVEL_ABBREV_WIDTH: u32 = 2;

/// Builtin abbreviation ids, present in every block scope
pub mod abbrev_id {
    /// Close the current block
    pub const END_BLOCK: u64 = 0;
    /// Open a nested block
    pub const ENTER_SUBBLOCK: u64 = 1;
    /// Define an abbreviation in the current scope
    pub const DEFINE_ABBREV: u64 = 2;
    /// Record encoded without an abbreviation
    pub const UNABBREV_RECORD: u64 = 3;
    /// First id available for application-defined abbreviations
    pub const FIRST_APPLICATION: u64 = 4;
}

/// Record codes for the block kinds the codec emits records into
pub mod record {
    /// BLOCKINFO block records
    pub mod blockinfo {
        /// Select the block id subsequent DEFINE_ABBREVs apply to
        pub const SETBID: u64 = 1;
    }

    /// Value symbol table records
    pub mod value_symtab {
        /// Named value entry
        pub const ENTRY: u64 = 1;
        /// Named basic-block entry
        pub const BBENTRY: u64 = 2;
    }

    /// Constants block records
    pub mod constants {
        /// Select the type for subsequent constants
        pub const SETTYPE: u64 = 1;
        /// Null value of the current type
        pub const NULL: u64 = 2;
        /// Integer constant
        pub const INTEGER: u64 = 4;
        /// Constant-expression cast
        pub const CE_CAST: u64 = 11;
    }

    /// Function block instruction records
    pub mod function {
        /// Binary operation
        pub const INST_BINOP: u64 = 2;
        /// Cast operation
        pub const INST_CAST: u64 = 3;
        /// Return
        pub const INST_RET: u64 = 10;
        /// Unreachable terminator
        pub const INST_UNREACHABLE: u64 = 15;
        /// Memory load
        pub const INST_LOAD: u64 = 20;
        /// Get-element-pointer
        pub const INST_GEP: u64 = 43;
    }
}

/// Known block kinds in the container format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockId {
    /// Abbreviation-table block, applies to sibling blocks that follow
    BlockInfo = 0,
    /// Top-level module block
    Module = 8,
    /// Parameter attributes
    ParamAttr = 9,
    /// Parameter attribute groups
    ParamAttrGroup = 10,
    /// Constant values
    Constants = 11,
    /// Function body
    Function = 12,
    /// Value symbol table
    ValueSymtab = 14,
    /// Module metadata
    Metadata = 15,
    /// Metadata attached to instructions
    MetadataAttachment = 16,
    /// Type table
    Type = 17,
    /// Use-list ordering
    UseList = 18,
}

impl BlockId {
    /// Abbreviation width used inside this block.
    ///
    /// These are fixed by the external reader's LLVM and are not derivable
    /// from anything else in the stream.
    pub const fn abbrev_width(self) -> u32 {
        match self {
            Self::BlockInfo => 2,
            Self::Module => 3,
            Self::ParamAttr => 3,
            Self::ParamAttrGroup => 3,
            Self::Constants => 4,
            Self::Function => 4,
            Self::ValueSymtab => 4,
            Self::Metadata => 3,
            Self::MetadataAttachment => 3,
            Self::Type => 4,
            Self::UseList => 3,
        }
    }

    /// Convert from a wire block id
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            0 => Some(Self::BlockInfo),
            8 => Some(Self::Module),
            9 => Some(Self::ParamAttr),
            10 => Some(Self::ParamAttrGroup),
            11 => Some(Self::Constants),
            12 => Some(Self::Function),
            14 => Some(Self::ValueSymtab),
            15 => Some(Self::Metadata),
            16 => Some(Self::MetadataAttachment),
            17 => Some(Self::Type),
            18 => Some(Self::UseList),
            _ => None,
        }
    }

    /// Get the name of this block kind
    pub const fn name(self) -> &'static str {
        match self {
            Self::BlockInfo => "blockinfo",
            Self::Module => "module",
            Self::ParamAttr => "paramattr",
            Self::ParamAttrGroup => "paramattr_group",
            Self::Constants => "constants",
            Self::Function => "function",
            Self::ValueSymtab => "value_symtab",
            Self::Metadata => "metadata",
            Self::MetadataAttachment => "metadata_attachment",
            Self::Type => "type",
            Self::UseList => "uselist",
        }
    }

    /// All block kinds in canonical order
    pub const ALL: [Self; 11] = [
        Self::BlockInfo,
        Self::Module,
        Self::ParamAttr,
        Self::ParamAttrGroup,
        Self::Constants,
        Self::Function,
        Self::ValueSymtab,
        Self::Metadata,
        Self::MetadataAttachment,
        Self::Type,
        Self::UseList,
    ];
}
