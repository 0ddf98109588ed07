//! OPLL (YM2413 / VRC7) voice record and register codec.

use serde::{Deserialize, Serialize};

use crate::error::VoiceError;
use crate::voice::{check_field, clamp_field, register_fields, registers, Dialect, YmVoice};

/// One OPLL operator.
///
/// The carrier has no TL register; its `tl` is always decoded as 0 and never encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct OpllSlotParam {
    pub am: u8,
    pub pm: u8,
    /// Envelope type: 1 sustains at SL while key is held, 0 is percussive.
    pub eg: u8,
    pub kr: u8,
    pub ml: u8,
    pub kl: u8,
    pub tl: u8,
    pub ar: u8,
    pub dr: u8,
    pub sl: u8,
    pub rr: u8,
    /// Half-sine rectification (0-1).
    pub ws: u8,
}

register_fields!(OpllSlotParam {
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
    ws: 1,
});

impl OpllSlotParam {
    const ZERO: Self = Self {
        am: 0,
        pm: 0,
        eg: 0,
        kr: 0,
        ml: 0,
        kl: 0,
        tl: 0,
        ar: 0,
        dr: 0,
        sl: 0,
        rr: 0,
        ws: 0,
    };
}

/// OPLL voice. The connection is fixed (modulator into carrier).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct OpllVoice {
    /// Modulator feedback (0-7).
    pub fb: u8,
    /// `[modulator, carrier]`.
    pub slots: [OpllSlotParam; 2],
}

impl OpllVoice {
    pub(crate) const ZERO: Self = Self {
        fb: 0,
        slots: [OpllSlotParam::ZERO; 2],
    };

    /// Builds the 8-byte register image.
    ///
    /// ```text
    ///    |D7|D6|D5|D4|D3|D2|D1|D0|
    /// 0: |AM|PM|EG|KR|    ML     | slot1
    /// 1: |AM|PM|EG|KR|    ML     | slot2
    /// 2: |  KL |        TL       | slot1
    /// 3: |  KL |--|WC|WM|   FB   | slot2
    /// 4: |     AR    |    DR     | slot1
    /// 5: |     AR    |    DR     | slot2
    /// 6: |     SL    |    RR     | slot1
    /// 7: |     SL    |    RR     | slot2
    /// ```
    ///
    /// WC/WM are the waveform bits of the carrier and modulator.
    pub fn to_registers(&self) -> [u8; 8] {
        let [m, c] = &self.slots;
        [
            m.am << 7 | m.pm << 6 | m.eg << 5 | m.kr << 4 | m.ml,
            c.am << 7 | c.pm << 6 | c.eg << 5 | c.kr << 4 | c.ml,
            m.kl << 6 | m.tl,
            c.kl << 6 | c.ws << 4 | m.ws << 3 | self.fb,
            m.ar << 4 | m.dr,
            c.ar << 4 | c.dr,
            m.sl << 4 | m.rr,
            c.sl << 4 | c.rr,
        ]
    }

    /// Reads an 8-byte register image.
    pub const fn from_registers(d: &[u8; 8]) -> Self {
        Self {
            fb: d[3] & 7,
            slots: [
                OpllSlotParam {
                    am: (d[0] >> 7) & 1,
                    pm: (d[0] >> 6) & 1,
                    eg: (d[0] >> 5) & 1,
                    kr: (d[0] >> 4) & 1,
                    ml: d[0] & 0x0f,
                    kl: (d[2] >> 6) & 3,
                    tl: d[2] & 0x3f,
                    ar: (d[4] >> 4) & 0x0f,
                    dr: d[4] & 0x0f,
                    sl: (d[6] >> 4) & 0x0f,
                    rr: d[6] & 0x0f,
                    ws: (d[3] >> 3) & 1,
                },
                OpllSlotParam {
                    am: (d[1] >> 7) & 1,
                    pm: (d[1] >> 6) & 1,
                    eg: (d[1] >> 5) & 1,
                    kr: (d[1] >> 4) & 1,
                    ml: d[1] & 0x0f,
                    kl: (d[3] >> 6) & 3,
                    tl: 0,
                    ar: (d[5] >> 4) & 0x0f,
                    dr: d[5] & 0x0f,
                    sl: (d[7] >> 4) & 0x0f,
                    rr: d[7] & 0x0f,
                    ws: (d[3] >> 4) & 1,
                },
            ],
        }
    }
}

impl YmVoice for OpllVoice {
    const DIALECT: Dialect = Dialect::Opll;
    const ENCODED_LEN: usize = 8;

    fn encode(&self) -> Vec<u8> {
        self.to_registers().to_vec()
    }

    fn decode(data: &[u8]) -> Self {
        Self::from_registers(&registers(data))
    }

    fn check_ranges(&self) -> Result<(), VoiceError> {
        check_field("fb", None, self.fb, 3)?;
        for (i, slot) in self.slots.iter().enumerate() {
            slot.check_ranges(Some(i))?;
        }
        Ok(())
    }

    fn clamped(&self) -> Self {
        Self {
            fb: clamp_field(self.fb, 3),
            slots: self.slots.map(|s| s.clamped()),
        }
    }
}
