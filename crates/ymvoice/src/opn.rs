//! OPN (YM2203 / YM2608 / YM2612) four-operator voice record and register codec.

use serde::{Deserialize, Serialize};

use crate::error::VoiceError;
use crate::voice::{
    check_field, clamp_field, register_fields, registers, Dialect, YmVoice, FOUR_OP_WIRE_ORDER,
};

/// One OPN operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct OpnSlotParam {
    /// Detune (0-7; 4-7 are negative offsets).
    pub dt: u8,
    pub ml: u8,
    pub tl: u8,
    pub ks: u8,
    pub ar: u8,
    pub am: u8,
    pub dr: u8,
    pub sr: u8,
    pub sl: u8,
    pub rr: u8,
    /// SSG-type envelope mode (0-15, bit 3 enables).
    pub ssg: u8,
}

register_fields!(OpnSlotParam {
    dt: 3,
    ml: 4,
    tl: 7,
    ks: 2,
    ar: 5,
    am: 1,
    dr: 5,
    sr: 5,
    sl: 4,
    rr: 4,
    ssg: 4,
});

/// OPN voice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct OpnVoice {
    pub fb: u8,
    /// Algorithm (0-7).
    pub con: u8,
    /// Amplitude modulation sensitivity (0-3).
    pub ams: u8,
    /// Phase modulation sensitivity (0-7).
    pub pms: u8,
    /// Operators in physical order 1, 2, 3, 4 (not wire order 1, 3, 2, 4).
    pub slots: [OpnSlotParam; 4],
}

impl OpnVoice {
    /// Builds the 30-byte register image.
    ///
    /// ```text
    ///        |D7|D6|D5|D4|D3|D2|D1|D0|
    /// 00-03: |--|   DT   |     ML    |
    /// 04-07: |--|         TL         |
    /// 08-0B: | KS  |--|      AR      |
    /// 0C-0F: |AM|-----|      DR      |
    /// 10-13: |--------|      SR      |
    /// 14-17: |     SL    |    RR     |
    /// 18-1B: |-----------|   SSG-EG  |
    /// 1C:    |-----|   FB   |  CON   |
    /// 1D:    |--|--| AMS |--|  PMS   |
    /// ```
    pub fn to_registers(&self) -> [u8; 30] {
        let mut d = [0u8; 30];
        for (j, &index) in FOUR_OP_WIRE_ORDER.iter().enumerate() {
            let s = &self.slots[index];
            d[j] = s.dt << 4 | s.ml;
            d[4 + j] = s.tl;
            d[8 + j] = s.ks << 6 | s.ar;
            d[12 + j] = s.am << 7 | s.dr;
            d[16 + j] = s.sr;
            d[20 + j] = s.sl << 4 | s.rr;
            d[24 + j] = s.ssg;
        }
        d[28] = self.fb << 3 | self.con;
        d[29] = self.ams << 4 | self.pms;
        d
    }

    /// Reads a 30-byte register image.
    pub fn from_registers(d: &[u8; 30]) -> Self {
        let mut slots = [OpnSlotParam::default(); 4];
        for (j, &index) in FOUR_OP_WIRE_ORDER.iter().enumerate() {
            slots[index] = OpnSlotParam {
                dt: (d[j] >> 4) & 7,
                ml: d[j] & 0x0f,
                tl: d[4 + j] & 0x7f,
                ks: (d[8 + j] >> 6) & 3,
                ar: d[8 + j] & 0x1f,
                am: (d[12 + j] >> 7) & 1,
                dr: d[12 + j] & 0x1f,
                sr: d[16 + j] & 0x1f,
                sl: (d[20 + j] >> 4) & 0x0f,
                rr: d[20 + j] & 0x0f,
                ssg: d[24 + j] & 0x0f,
            };
        }
        Self {
            fb: (d[28] >> 3) & 7,
            con: d[28] & 7,
            ams: (d[29] >> 4) & 3,
            pms: d[29] & 7,
            slots,
        }
    }
}

impl YmVoice for OpnVoice {
    const DIALECT: Dialect = Dialect::Opn;
    const ENCODED_LEN: usize = 30;

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
    fn ssg_plane_follows_wire_order() {
        let mut voice = OpnVoice::default();
        for (i, slot) in voice.slots.iter_mut().enumerate() {
            slot.ssg = 8 + i as u8;
        }
        assert_eq!(&voice.encode()[24..28], &[8, 10, 9, 11]);
    }

    #[test]
    fn ams_sits_above_pms() {
        let voice = OpnVoice {
            ams: 3,
            pms: 5,
            ..Default::default()
        };
        assert_eq!(voice.encode()[29], 0x35);
    }

    #[test]
    fn decode_masks_reserved_bits() {
        let voice = OpnVoice::decode(&[0xff; 30]);
        assert_eq!(voice.slots[0].sr, 31);
        assert_eq!(voice.slots[0].ssg, 15);
        assert_eq!(voice.ams, 3);
        assert_eq!(voice.pms, 7);
    }
}
