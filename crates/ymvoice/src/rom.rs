//! Built-in OPLL preset banks.
//!
//! Both banks hold 19 patches: index 0 is the user slot, 1-15 are melodic
//! presets and 16-18 drive the rhythm section. The tables are decoded through
//! the OPLL codec at compile time and never change afterwards.

use crate::opll::OpllVoice;

/// Number of patches in a ROM bank, including the user slot and rhythm patches.
pub const ROM_BANK_SIZE: usize = 19;

const YM2413_PATCHES: [[u8; 8]; ROM_BANK_SIZE] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    [0x71, 0x61, 0x1e, 0x17, 0xd0, 0x78, 0x00, 0x17],
    [0x13, 0x41, 0x1a, 0x0d, 0xd8, 0xf7, 0x23, 0x13],
    [0x13, 0x01, 0x99, 0x00, 0xf2, 0xd4, 0x21, 0x23],
    [0x11, 0x61, 0x0e, 0x07, 0x8d, 0x64, 0x70, 0x27],
    [0x32, 0x21, 0x1e, 0x06, 0xe1, 0x76, 0x01, 0x28],
    [0x31, 0x22, 0x16, 0x05, 0xe0, 0x71, 0x00, 0x18],
    [0x21, 0x61, 0x1d, 0x07, 0x82, 0x81, 0x11, 0x07],
    [0x33, 0x21, 0x2d, 0x13, 0xb0, 0x70, 0x00, 0x07],
    [0x61, 0x61, 0x1b, 0x06, 0x64, 0x65, 0x10, 0x17],
    [0x41, 0x61, 0x0b, 0x18, 0x85, 0xf0, 0x81, 0x07],
    [0x33, 0x01, 0x83, 0x11, 0xea, 0xef, 0x10, 0x04],
    [0x17, 0xc1, 0x24, 0x07, 0xf8, 0xf8, 0x22, 0x12],
    [0x61, 0x50, 0x0c, 0x05, 0xd2, 0xf5, 0x40, 0x42],
    [0x01, 0x01, 0x55, 0x03, 0xe4, 0x90, 0x03, 0x02],
    [0x41, 0x41, 0x89, 0x03, 0xf1, 0xe4, 0xc0, 0x13],
    [0x01, 0x01, 0x18, 0x0f, 0xdf, 0xf8, 0x6a, 0x6d],
    [0x01, 0x01, 0x00, 0x00, 0xc8, 0xd8, 0xa7, 0x68],
    [0x05, 0x01, 0x00, 0x00, 0xf8, 0xaa, 0x59, 0x55],
];

const VRC7_PATCHES: [[u8; 8]; ROM_BANK_SIZE] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    [0x03, 0x21, 0x05, 0x06, 0xe8, 0x81, 0x42, 0x27],
    [0x13, 0x41, 0x14, 0x0d, 0xd8, 0xf6, 0x23, 0x12],
    [0x11, 0x11, 0x08, 0x08, 0xfa, 0xb2, 0x20, 0x12],
    [0x31, 0x61, 0x0c, 0x07, 0xa8, 0x64, 0x61, 0x27],
    [0x32, 0x21, 0x1e, 0x06, 0xe1, 0x76, 0x01, 0x28],
    [0x02, 0x01, 0x06, 0x00, 0xa3, 0xe2, 0xf4, 0xf4],
    [0x21, 0x61, 0x1d, 0x07, 0x82, 0x81, 0x11, 0x07],
    [0x23, 0x21, 0x22, 0x17, 0xa2, 0x72, 0x01, 0x17],
    [0x35, 0x11, 0x25, 0x00, 0x40, 0x73, 0x72, 0x01],
    [0xb5, 0x01, 0x0f, 0x0f, 0xa8, 0xa5, 0x51, 0x02],
    [0x17, 0xc1, 0x24, 0x07, 0xf8, 0xf8, 0x22, 0x12],
    [0x71, 0x23, 0x11, 0x06, 0x65, 0x74, 0x18, 0x16],
    [0x01, 0x02, 0xd3, 0x05, 0xc9, 0x95, 0x03, 0x02],
    [0x61, 0x63, 0x0c, 0x00, 0x94, 0xc0, 0x33, 0xf6],
    [0x21, 0x72, 0x0d, 0x00, 0xc1, 0xd5, 0x56, 0x06],
    [0x01, 0x01, 0x18, 0x0f, 0xdf, 0xf8, 0x6a, 0x6d],
    [0x01, 0x01, 0x00, 0x00, 0xc8, 0xd8, 0xa7, 0x68],
    [0x05, 0x01, 0x00, 0x00, 0xf8, 0xaa, 0x59, 0x55],
];

/// YM2413 preset names, indexed by program number.
pub const YM2413_PATCH_NAMES: [&str; ROM_BANK_SIZE] = [
    "User",
    "Violin",
    "Guitar",
    "Piano",
    "Flute",
    "Clarinet",
    "Oboe",
    "Trumpet",
    "Organ",
    "Horn",
    "Synthesizer",
    "Harpsichord",
    "Vibraphone",
    "Synthesizer Bass",
    "Acoustic Bass",
    "Electric Guitar",
    "Bass Drum",
    "High-Hat / Snare Drum",
    "Tom-tom / Top Cymbal",
];

const fn decode_bank(patches: &[[u8; 8]; ROM_BANK_SIZE]) -> [OpllVoice; ROM_BANK_SIZE] {
    let mut voices = [OpllVoice::ZERO; ROM_BANK_SIZE];
    let mut i = 0;
    while i < ROM_BANK_SIZE {
        voices[i] = OpllVoice::from_registers(&patches[i]);
        i += 1;
    }
    voices
}

/// YM2413 preset voices.
pub static YM2413_VOICES: [OpllVoice; ROM_BANK_SIZE] = decode_bank(&YM2413_PATCHES);

/// VRC7 preset voices.
pub static VRC7_VOICES: [OpllVoice; ROM_BANK_SIZE] = decode_bank(&VRC7_PATCHES);

/// Which chip's built-in preset bank to match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RomBank {
    /// Yamaha YM2413.
    #[default]
    Ym2413,
    /// Konami VRC7.
    Vrc7,
}

impl RomBank {
    /// Returns the decoded voices of this bank.
    pub fn voices(&self) -> &'static [OpllVoice; ROM_BANK_SIZE] {
        match self {
            RomBank::Ym2413 => &YM2413_VOICES,
            RomBank::Vrc7 => &VRC7_VOICES,
        }
    }

    /// Returns the bank name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RomBank::Ym2413 => "ym2413",
            RomBank::Vrc7 => "vrc7",
        }
    }
}

impl std::str::FromStr for RomBank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ym2413" | "opll" => Ok(RomBank::Ym2413),
            "vrc7" => Ok(RomBank::Vrc7),
            other => Err(format!(
                "unknown ROM bank '{}' (expected ym2413 or vrc7)",
                other
            )),
        }
    }
}
