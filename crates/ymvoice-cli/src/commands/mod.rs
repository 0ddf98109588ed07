//! CLI command implementations

pub mod convert;
pub mod decode;
pub mod parse;
pub mod rom_match;
