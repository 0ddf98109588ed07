//! OPL (two-operator) voice record and register codec.

use serde::{Deserialize, Serialize};

use crate::error::VoiceError;
use crate::voice::{check_field, clamp_field, register_fields, registers, Dialect, YmVoice};

/// One OPL operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct OplSlotParam {
    /// Amplitude modulation (tremolo) enable.
    pub am: u8,
    /// Pitch modulation (vibrato) enable.
    pub pm: u8,
    /// Envelope type: 1 sustains at SL while key is held, 0 is percussive.
    pub eg: u8,
    /// Key scale rate.
    pub kr: u8,
    /// Frequency multiplier (0-15).
    pub ml: u8,
    /// Key scale level (0-3).
    pub kl: u8,
    /// Total level (0-63, higher is quieter).
    pub tl: u8,
    /// Attack rate (0-15).
    pub ar: u8,
    /// Decay rate (0-15).
    pub dr: u8,
    /// Sustain level (0-15).
    pub sl: u8,
    /// Release rate (0-15).
    pub rr: u8,
    /// Waveform select (0-3).
    pub ws: u8,
}

register_fields!(OplSlotParam {
    am: 1,
    pm: 1,
    eg: 1,
    kr: 1,
    ml: 4,
    kl: 2,
    tl: 6,
    ar: 4,
    dr: 4,
    sl: 4,
    rr: 4,
    ws: 2,
});

/// OPL voice: one modulator and one carrier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct OplVoice {
    /// Modulator feedback (0-7).
    pub fb: u8,
    /// Connection: 0 = FM, 1 = additive.
    pub con: u8,
    /// `[modulator, carrier]`.
    pub slots: [OplSlotParam; 2],
}

impl OplVoice {
    /// Builds the 11-byte register image.
    ///
    /// ```text
    ///    |D7|D6|D5|D4|D3|D2|D1|D0|
    /// 0: |AM|PM|EG|KR|    ML     | slot1
    /// 1: |AM|PM|EG|KR|    ML     | slot2
    /// 2: |  KL |        TL       | slot1
    /// 3: |  KL |        TL       | slot2
    /// 4: |     AR    |    DR     | slot1
    /// 5: |     AR    |    DR     | slot2
    /// 6: |     SL    |    RR     | slot1
    /// 7: |     SL    |    RR     | slot2
    /// 8: |-----------------| WS  | slot1
    /// 9: |-----------------| WS  | slot2
    /// A: |-----------|   FB   |CN|
    /// ```
    pub fn to_registers(&self) -> [u8; 11] {
        let [m, c] = &self.slots;
        [
            m.am << 7 | m.pm << 6 | m.eg << 5 | m.kr << 4 | m.ml,
            c.am << 7 | c.pm << 6 | c.eg << 5 | c.kr << 4 | c.ml,
            m.kl << 6 | m.tl,
            c.kl << 6 | c.tl,
            m.ar << 4 | m.dr,
            c.ar << 4 | c.dr,
            m.sl << 4 | m.rr,
            c.sl << 4 | c.rr,
            m.ws,
            c.ws,
            self.fb << 1 | self.con,
        ]
    }

    /// Reads an 11-byte register image.
    pub fn from_registers(d: &[u8; 11]) -> Self {
        let slot = |i: usize| OplSlotParam {
            am: (d[i] >> 7) & 1,
            pm: (d[i] >> 6) & 1,
            eg: (d[i] >> 5) & 1,
            kr: (d[i] >> 4) & 1,
            ml: d[i] & 0x0f,
            kl: (d[2 + i] >> 6) & 3,
            tl: d[2 + i] & 0x3f,
            ar: (d[4 + i] >> 4) & 0x0f,
            dr: d[4 + i] & 0x0f,
            sl: (d[6 + i] >> 4) & 0x0f,
            rr: d[6 + i] & 0x0f,
            ws: d[8 + i] & 3,
        };
        Self {
            fb: (d[10] >> 1) & 7,
            con: d[10] & 1,
            slots: [slot(0), slot(1)],
        }
    }
}

impl YmVoice for OplVoice {
    const DIALECT: Dialect = Dialect::Opl;
    const ENCODED_LEN: usize = 11;

    fn encode(&self) -> Vec<u8> {
        self.to_registers().to_vec()
    }

    fn decode(data: &[u8]) -> Self {
        Self::from_registers(&registers(data))
    }

    fn check_ranges(&self) -> Result<(), VoiceError> {
        check_field("fb", None, self.fb, 3)?;
        check_field("con", None, self.con, 1)?;
        for (i, slot) in self.slots.iter().enumerate() {
            slot.check_ranges(Some(i))?;
        }
        Ok(())
    }

    fn clamped(&self) -> Self {
        Self {
            fb: clamp_field(self.fb, 3),
            con: clamp_field(self.con, 1),
            slots: self.slots.map(|s| s.clamped()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guitar() -> OplVoice {
        OplVoice {
            fb: 7,
            con: 1,
            slots: [
                OplSlotParam {
                    ml: 3,
                    kr: 1,
                    tl: 26,
                    ar: 13,
                    dr: 8,
                    sl: 2,
                    rr: 3,
                    ws: 1,
                    ..Default::default()
                },
                OplSlotParam {
                    pm: 1,
                    ml: 1,
                    ar: 15,
                    dr: 7,
                    sl: 1,
                    rr: 3,
                    ws: 2,
                    ..Default::default()
                },
            ],
        }
    }

    #[test]
    fn encodes_fixture() {
        assert_eq!(
            guitar().encode(),
            vec![0x13, 0x41, 0x1a, 0x00, 0xd8, 0xf7, 0x23, 0x13, 0x01, 0x02, 0x0f]
        );
    }

    #[test]
    fn feedback_is_read_above_connection_bit() {
        let voice = OplVoice::decode(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x0a]);
        assert_eq!(voice.fb, 5);
        assert_eq!(voice.con, 0);
    }

    #[test]
    fn out_of_range_tl_bleeds_into_kl() {
        let mut voice = OplVoice::default();
        voice.slots[0].tl = 0x40;
        let bytes = voice.encode();
        assert_eq!(bytes[2], 0x40);
        assert_eq!(OplVoice::decode(&bytes).slots[0].kl, 1);
    }

    #[test]
    fn check_ranges_reports_slot() {
        let mut voice = guitar();
        voice.slots[1].ws = 4;
        match voice.check_ranges().unwrap_err() {
            VoiceError::FieldOutOfRange {
                field, slot, max, ..
            } => {
                assert_eq!(field, "ws");
                assert_eq!(slot, Some(1));
                assert_eq!(max, 3);
            }
            other => panic!("expected FieldOutOfRange, got {:?}", other),
        }
    }
}
