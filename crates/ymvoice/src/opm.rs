//! OPM (YM2151) four-operator voice record and register codec.

use serde::{Deserialize, Serialize};

use crate::error::VoiceError;
use crate::voice::{
    check_field, clamp_field, register_fields, registers, Dialect, YmVoice, FOUR_OP_WIRE_ORDER,
};

/// One OPM operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct OpmSlotParam {
    /// Fine detune (0-7).
    pub dt1: u8,
    /// Frequency multiplier (0-15).
    pub ml: u8,
    /// Total level (0-127).
    pub tl: u8,
    /// Key scale (0-3).
    pub ks: u8,
    /// Attack rate (0-31).
    pub ar: u8,
    /// Amplitude modulation enable.
    pub am: u8,
    /// Coarse detune (0-3).
    pub dt2: u8,
    /// First decay rate (0-31).
    pub dr: u8,
    /// Second decay (sustain) rate (0-31).
    pub sr: u8,
    /// Sustain level (0-15).
    pub sl: u8,
    /// Release rate (0-15).
    pub rr: u8,
}

register_fields!(OpmSlotParam {
    dt1: 3,
    ml: 4,
    tl: 7,
    ks: 2,
    ar: 5,
    am: 1,
    dt2: 2,
    dr: 5,
    sr: 5,
    sl: 4,
    rr: 4,
});

/// OPM voice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct OpmVoice {
    /// Operator 1 feedback (0-7).
    pub fb: u8,
    /// Algorithm (0-7).
    pub con: u8,
    /// Amplitude modulation sensitivity (0-3).
    pub ams: u8,
    /// Phase modulation sensitivity (0-7).
    pub pms: u8,
    /// Operators in physical order 1, 2, 3, 4 (M1, C1, M2, C2).
    pub slots: [OpmSlotParam; 4],
}

impl OpmVoice {
    /// Builds the 26-byte register image.
    ///
    /// Each plane holds four bytes in wire order (operator 1, 3, 2, 4).
    ///
    /// ```text
    ///        |D7|D6|D5|D4|D3|D2|D1|D0|
    /// 00-03: |--|  DT1   |     ML    |
    /// 04-07: |--|         TL         |
    /// 08-0B: | KS  |--|      AR      |
    /// 0C-0F: |AM|-----|      DR      |
    /// 10-13: | DT2 |--|      SR      |
    /// 14-17: |     SL    |    RR     |
    /// 18:    |-----|   FB   |  CON   |
    /// 19:    |-----|  PMS   |--| AMS |
    /// ```
    pub fn to_registers(&self) -> [u8; 26] {
        let mut d = [0u8; 26];
        for (j, &index) in FOUR_OP_WIRE_ORDER.iter().enumerate() {
            let s = &self.slots[index];
            d[j] = s.dt1 << 4 | s.ml;
            d[4 + j] = s.tl;
            d[8 + j] = s.ks << 6 | s.ar;
            d[12 + j] = s.am << 7 | s.dr;
            d[16 + j] = s.dt2 << 6 | s.sr;
            d[20 + j] = s.sl << 4 | s.rr;
        }
        d[24] = self.fb << 3 | self.con;
        d[25] = self.pms << 3 | self.ams;
        d
    }

    /// Reads a 26-byte register image.
    pub fn from_registers(d: &[u8; 26]) -> Self {
        let mut slots = [OpmSlotParam::default(); 4];
        for (j, &index) in FOUR_OP_WIRE_ORDER.iter().enumerate() {
            slots[index] = OpmSlotParam {
                dt1: (d[j] >> 4) & 7,
                ml: d[j] & 0x0f,
                tl: d[4 + j] & 0x7f,
                ks: (d[8 + j] >> 6) & 3,
                ar: d[8 + j] & 0x1f,
                am: (d[12 + j] >> 7) & 1,
                dr: d[12 + j] & 0x1f,
                dt2: (d[16 + j] >> 6) & 3,
                sr: d[16 + j] & 0x1f,
                sl: (d[20 + j] >> 4) & 0x0f,
                rr: d[20 + j] & 0x0f,
            };
        }
        Self {
            fb: (d[24] >> 3) & 7,
            con: d[24] & 7,
            ams: d[25] & 3,
            pms: (d[25] >> 3) & 7,
            slots,
        }
    }
}

impl YmVoice for OpmVoice {
    const DIALECT: Dialect = Dialect::Opm;
    const ENCODED_LEN: usize = 26;

    fn encode(&self) -> Vec<u8> {
        self.to_registers().to_vec()
    }

    fn decode(data: &[u8]) -> Self {
        Self::from_registers(&registers(data))
    }

    fn check_ranges(&self) -> Result<(), VoiceError> {
        check_field("fb", None, self.fb, 3)?;
        check_field("con", None, self.con, 3)?;
        check_field("ams", None, self.ams, 2)?;
        check_field("pms", None, self.pms, 3)?;
        for (i, slot) in self.slots.iter().enumerate() {
            slot.check_ranges(Some(i))?;
        }
        Ok(())
    }

    fn clamped(&self) -> Self {
        Self {
            fb: clamp_field(self.fb, 3),
            con: clamp_field(self.con, 3),
            ams: clamp_field(self.ams, 2),
            pms: clamp_field(self.pms, 3),
            slots: self.slots.map(|s| s.clamped()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_order_swaps_operators_two_and_three() {
        let mut voice = OpmVoice::default();
        for (i, slot) in voice.slots.iter_mut().enumerate() {
            slot.ml = i as u8 + 1;
        }
        assert_eq!(&voice.encode()[0..4], &[1, 3, 2, 4]);
    }

    #[test]
    fn key_scale_shares_attack_byte() {
        let mut voice = OpmVoice::default();
        voice.slots[0].ks = 3;
        voice.slots[0].ar = 31;
        let bytes = voice.encode();
        assert_eq!(bytes[8], 0xdf);
        assert_eq!(OpmVoice::decode(&bytes).slots[0], voice.slots[0]);
    }

    #[test]
    fn channel_bytes() {
        let voice = OpmVoice {
            fb: 5,
            con: 7,
            ams: 2,
            pms: 6,
            ..Default::default()
        };
        let bytes = voice.encode();
        assert_eq!(bytes[24], 0x2f);
        assert_eq!(bytes[25], 0x32);
    }
}
