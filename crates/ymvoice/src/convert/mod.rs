//! Cross-dialect voice conversion.
//!
//! Every conversion is total and lossy: values are clamped or saturated into the
//! destination's ranges, never rejected.
//!
//! - [`two_op`]: OPL <-> OPLL, and two-operator voices onto OPN
//! - [`four_op`]: OPM <-> OPN, and OPN emulation on a pair of OPL channels
//! - [`rom_match`]: nearest OPLL ROM preset for an OPL voice

pub mod four_op;
pub mod rom_match;
pub mod two_op;

pub use rom_match::RomVoiceMatch;

use crate::rom::RomBank;
use crate::voice::{Dialect, Voice};

/// Knobs for conversions that need more than the source voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Build OPL emulation parameters for the key-on phase (`true`) or the
    /// key-off phase (`false`).
    pub key_on: bool,
    /// Preset bank used by the nearest-preset search.
    pub rom_bank: RomBank,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            key_on: true,
            rom_bank: RomBank::default(),
        }
    }
}

impl ConvertOptions {
    /// Sets the key phase.
    pub fn key_on(mut self, key_on: bool) -> Self {
        self.key_on = key_on;
        self
    }

    /// Sets the preset bank.
    pub fn rom_bank(mut self, bank: RomBank) -> Self {
        self.rom_bank = bank;
        self
    }
}

/// Converts `voice` to `target`.
///
/// Returns a single voice except for four-operator sources converted to OPL,
/// which need two OPL channels. Converting to the source dialect clones it.
pub fn convert(voice: &Voice, target: Dialect, options: &ConvertOptions) -> Vec<Voice> {
    match (voice, target) {
        (Voice::Opl(v), Dialect::Opl) => vec![Voice::Opl(*v)],
        (Voice::Opl(v), Dialect::Opll) => vec![Voice::Opll(v.to_opll())],
        (Voice::Opl(v), Dialect::Opm) => vec![Voice::Opm(v.to_opn().to_opm())],
        (Voice::Opl(v), Dialect::Opn) => vec![Voice::Opn(v.to_opn())],

        (Voice::Opll(v), Dialect::Opl) => vec![Voice::Opl(v.to_opl())],
        (Voice::Opll(v), Dialect::Opll) => vec![Voice::Opll(*v)],
        (Voice::Opll(v), Dialect::Opm) => vec![Voice::Opm(v.to_opm())],
        (Voice::Opll(v), Dialect::Opn) => vec![Voice::Opn(v.to_opn())],

        (Voice::Opm(v), Dialect::Opl) => opl_pair(v.to_opn().to_opl(options.key_on)),
        (Voice::Opm(v), Dialect::Opll) => {
            let [first, _] = v.to_opn().to_opl(options.key_on);
            vec![Voice::Opll(first.to_opll())]
        }
        (Voice::Opm(v), Dialect::Opm) => vec![Voice::Opm(*v)],
        (Voice::Opm(v), Dialect::Opn) => vec![Voice::Opn(v.to_opn())],

        (Voice::Opn(v), Dialect::Opl) => opl_pair(v.to_opl(options.key_on)),
        (Voice::Opn(v), Dialect::Opll) => {
            let [first, _] = v.to_opl(options.key_on);
            vec![Voice::Opll(first.to_opll())]
        }
        (Voice::Opn(v), Dialect::Opm) => vec![Voice::Opm(v.to_opm())],
        (Voice::Opn(v), Dialect::Opn) => vec![Voice::Opn(*v)],
    }
}

fn opl_pair(pair: [crate::opl::OplVoice; 2]) -> Vec<Voice> {
    pair.into_iter().map(Voice::Opl).collect()
}

/// Widens a 4-bit envelope rate to the 5-bit range.
///
/// 0 and 15 map to 0 and 31; other rates follow `round((rate + 1.5) * 2)`,
/// which is exactly `2 * rate + 3`, saturated at 31.
pub fn widen_rate(rate: u8) -> u8 {
    match rate {
        0 => 0,
        15 => 31,
        r => (2 * r as u16 + 3).min(31) as u8,
    }
}

/// Narrows a 5-bit envelope rate to the 4-bit range.
///
/// 0 and 31 map to 0 and 15; other rates become `(rate * 28) >> 6` held in 1..=15.
pub fn narrow_rate(rate: u8) -> u8 {
    match rate {
        0 => 0,
        31 => 15,
        r => ((r as u16 * 28) >> 6).clamp(1, 15) as u8,
    }
}

/// Release rate that never leaves a note ringing forever.
pub fn nonzero_release(rate: u8) -> u8 {
    if rate == 0 {
        1
    } else {
        rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opn::OpnVoice;

    #[test]
    fn widen_rate_endpoints_and_midpoints() {
        assert_eq!(widen_rate(0), 0);
        assert_eq!(widen_rate(1), 5);
        assert_eq!(widen_rate(7), 17);
        assert_eq!(widen_rate(13), 29);
        assert_eq!(widen_rate(14), 31);
        assert_eq!(widen_rate(15), 31);
    }

    #[test]
    fn widen_rate_is_monotone() {
        for r in 0..15u8 {
            assert!(widen_rate(r) <= widen_rate(r + 1));
        }
    }

    #[test]
    fn narrow_rate_endpoints_and_midpoints() {
        assert_eq!(narrow_rate(0), 0);
        assert_eq!(narrow_rate(1), 1);
        assert_eq!(narrow_rate(2), 1);
        assert_eq!(narrow_rate(16), 7);
        assert_eq!(narrow_rate(30), 13);
        assert_eq!(narrow_rate(31), 15);
    }

    #[test]
    fn narrow_rate_is_monotone() {
        for r in 0..31u8 {
            assert!(narrow_rate(r) <= narrow_rate(r + 1));
        }
    }

    #[test]
    fn nonzero_release_substitutes_one() {
        assert_eq!(nonzero_release(0), 1);
        assert_eq!(nonzero_release(9), 9);
    }

    #[test]
    fn four_op_to_opl_yields_two_channels() {
        let voice = Voice::Opn(OpnVoice::default());
        let out = convert(&voice, Dialect::Opl, &ConvertOptions::default());
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|v| v.dialect() == Dialect::Opl));
    }

    #[test]
    fn same_dialect_is_identity() {
        let voice = Voice::Opm(crate::opm::OpmVoice {
            fb: 3,
            con: 5,
            ..Default::default()
        });
        let out = convert(&voice, Dialect::Opm, &ConvertOptions::default());
        assert_eq!(out, vec![voice]);
    }

    #[test]
    fn every_pair_converts_to_target_dialect() {
        let options = ConvertOptions::default().key_on(false);
        for source in Dialect::ALL {
            let voice = Voice::decode(source, &[0x5a; 30]);
            for target in Dialect::ALL {
                let out = convert(&voice, target, &options);
                assert!(!out.is_empty());
                assert!(out.iter().all(|v| v.dialect() == target));
            }
        }
    }
}
