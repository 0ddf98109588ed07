//! Yamaha FM Voice Library
//!
//! This crate models instrument patches ("voices") for four Yamaha FM chip
//! families, reads and writes their exact register images, converts voices
//! between families, and parses multi-voice VOPM text banks.
//!
//! # Overview
//!
//! | Dialect | Chips                    | Operators | Register image |
//! |---------|--------------------------|-----------|----------------|
//! | OPL     | YM3526, YM3812, YMF262   | 2         | 11 bytes       |
//! | OPLL    | YM2413, VRC7             | 2         | 8 bytes        |
//! | OPM     | YM2151                   | 4         | 26 bytes       |
//! | OPN     | YM2203, YM2608, YM2612   | 4         | 30 bytes       |
//!
//! Decoding never fails; encoding never checks ranges unless asked to through
//! [`EncodePolicy`]. Conversions are lossy and always produce a voice.
//!
//! # Example
//!
//! ```
//! use ymvoice::{ConvertOptions, Dialect, OplVoice, RomBank, Voice, YmVoice};
//!
//! // YM2413 guitar preset laid out as an OPL melody channel
//! let opl = OplVoice::decode(&[0x13, 0x41, 0x1a, 0x00, 0xd8, 0xf7, 0x23, 0x13, 0x01, 0x02, 0x0f]);
//! assert_eq!(opl.encode().len(), 11);
//!
//! // Convert to OPN for a YM2612
//! let opn = Voice::from(opl).convert(Dialect::Opn, &ConvertOptions::default());
//! assert_eq!(opn[0].dialect(), Dialect::Opn);
//!
//! // Closest built-in OPLL preset
//! let preset = opl.to_opll_rom(RomBank::Ym2413);
//! assert!(preset.program <= 15);
//! ```
//!
//! # Modules
//!
//! - [`opl`], [`opll`], [`opm`], [`opn`]: voice records and register codecs
//! - [`convert`]: cross-dialect conversion and nearest-preset search
//! - [`rom`]: built-in YM2413 and VRC7 preset banks
//! - [`vopm`]: VOPM text bank parser
//! - [`export`]: MML text and instrument file export
//! - [`persist`]: tagged JSON persistence
//! - [`error`]: error types

pub mod convert;
pub mod error;
pub mod export;
pub mod opl;
pub mod opll;
pub mod opm;
pub mod opn;
pub mod persist;
pub mod rom;
pub mod voice;
pub mod vopm;

// Re-export commonly used types at the crate root
pub use convert::{convert, ConvertOptions, RomVoiceMatch};
pub use error::VoiceError;
pub use export::{InstrumentFormat, MmlFormat};
pub use opl::{OplSlotParam, OplVoice};
pub use opll::{OpllSlotParam, OpllVoice};
pub use opm::{OpmSlotParam, OpmVoice};
pub use opn::{OpnSlotParam, OpnVoice};
pub use rom::RomBank;
pub use voice::{Dialect, EncodePolicy, Voice, YmVoice};
pub use vopm::{parse_vopm, ParseWarning, VopmBank, WarningCode};
