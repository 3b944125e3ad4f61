//! Integration tests for the bcbits crate
//!
//! Tests full emission flows: block framing with backpatched lengths,
//! BLOCKINFO abbreviation tables, and re-parsing the produced stream the
//! way the external bitcode reader walks it.
