//! ymvoice CLI library.
//!
//! Command implementations for the `ymvoice` binary, plus the hex input
//! helpers they share.

pub mod commands;
pub mod input;
