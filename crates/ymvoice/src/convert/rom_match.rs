//! Nearest built-in OPLL preset for an OPL voice.
//!
//! OPLL chips offer one user voice per chip, so a song that needs more
//! timbres has to fall back to the ROM presets. The search scores each melodic
//! preset against the source voice and returns the closest, together with the
//! octave and volume corrections needed to play it at the source's pitch and
//! loudness.

use serde::{Deserialize, Serialize};

use crate::opl::OplVoice;
use crate::opll::OpllVoice;
use crate::rom::RomBank;

/// Effective frequency multiplier for each ML register value.
pub const ML_TABLE: [f64; 16] = [
    0.5, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 10.0, 12.0, 12.0, 15.0, 15.0,
];

/// Melodic presets considered by the search.
const MELODIC_PROGRAMS: std::ops::RangeInclusive<u8> = 1..=15;

/// Program 13 (synth bass on YM2413) is never chosen.
const SKIPPED_PROGRAM: u8 = 13;

/// Result of a nearest-preset search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RomVoiceMatch {
    /// Preset number, or 0 when no preset is compatible.
    pub program: u8,
    /// Volume correction in OPLL volume steps.
    pub volume_offset: i32,
    /// Octave correction.
    pub octave_offset: i32,
}

fn ml_value(ml: u8) -> f64 {
    ML_TABLE[(ml & 0x0f) as usize]
}

fn abs_diff(a: u8, b: u8) -> i32 {
    (a as i32 - b as i32).abs()
}

/// Distance from `voice` to `preset`, or `None` if their envelope types differ.
fn distance(voice: &OplVoice, preset: &OpllVoice) -> Option<i32> {
    let [m, c] = &voice.slots;
    let [pm, pc] = &preset.slots;

    let ratio = c.ml as f64 / ml_value(m.ml);
    let preset_ratio = pc.ml as f64 / ml_value(pm.ml);
    let mut d = ((ratio - preset_ratio).abs() as i32) << 1;

    d += abs_diff(voice.fb, preset.fb) >> 1;
    d += abs_diff(m.ar, pm.ar) + abs_diff(c.ar, pc.ar);
    d += abs_diff(m.dr, pm.dr) + abs_diff(c.dr, pc.dr);

    // only whether the preset modulator has any level or waveform counts
    let preset_level = if pm.tl as i32 + pm.ws as i32 != 0 { 8 } else { 0 };
    let level = 4 * abs_diff(m.sl, pm.sl) + (m.tl as i32 - preset_level).abs();
    d += level.min(63) >> 3;

    if c.rr == 0 {
        // sustained tone
        if pc.eg == 0 {
            return None;
        }
        d += abs_diff(c.sl, pc.sl);
    } else {
        // percussive tone
        if pc.eg == 1 {
            return None;
        }
        d += abs_diff(c.rr, pc.rr);
    }
    Some(d)
}

/// Scans the melodic presets of `bank` for the one closest to `voice`.
pub fn nearest_rom_voice(voice: &OplVoice, bank: RomBank) -> RomVoiceMatch {
    let result = nearest_in(voice, bank.voices());
    log::debug!(
        "{} ROM match: program {} volume {:+} octave {:+}",
        bank.as_str(),
        result.program,
        result.volume_offset,
        result.octave_offset
    );
    result
}

/// Scans `presets`, indexed by program number, falling back to program 0.
fn nearest_in(voice: &OplVoice, presets: &[OpllVoice]) -> RomVoiceMatch {
    let mut best: Option<(u8, i32)> = None;
    for program in MELODIC_PROGRAMS {
        if program == SKIPPED_PROGRAM {
            continue;
        }
        let Some(preset) = presets.get(program as usize) else {
            break;
        };
        let Some(d) = distance(voice, preset) else {
            continue;
        };
        if best.map_or(true, |(_, min)| d < min) {
            best = Some((program, d));
        }
    }

    let program = best.map_or(0, |(program, _)| program);
    let preset = presets
        .get(program as usize)
        .copied()
        .unwrap_or(OpllVoice::ZERO);

    let octave_offset =
        ((ml_value(voice.slots[1].ml) / ml_value(preset.slots[1].ml)).log2() / 2.0).floor() as i32;

    let mut volume_offset = 1;
    if preset.slots[1].ws != 0 {
        volume_offset -= 2;
        if preset.slots[0].ws != 0 {
            volume_offset -= 2;
        }
    }

    RomVoiceMatch {
        program,
        volume_offset,
        octave_offset,
    }
}
