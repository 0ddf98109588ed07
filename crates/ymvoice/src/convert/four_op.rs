//! Conversions from the four-operator dialects.

use super::{narrow_rate, nonzero_release};
use crate::opl::{OplSlotParam, OplVoice};
use crate::opm::{OpmSlotParam, OpmVoice};
use crate::opn::{OpnSlotParam, OpnVoice};

impl OpmSlotParam {
    /// Converts to an OPN operator. DT2 has no OPN counterpart and is dropped.
    pub fn to_opn(&self) -> OpnSlotParam {
        OpnSlotParam {
            dt: self.dt1,
            ml: self.ml,
            tl: self.tl,
            ks: self.ks,
            ar: self.ar,
            am: self.am,
            dr: self.dr,
            sr: self.sr,
            sl: self.sl,
            rr: self.rr,
            ssg: 0,
        }
    }
}

impl OpmVoice {
    /// Converts to an OPN voice with the same algorithm.
    pub fn to_opn(&self) -> OpnVoice {
        OpnVoice {
            fb: self.fb,
            con: self.con,
            ams: self.ams,
            pms: self.pms,
            slots: self.slots.map(|s| s.to_opn()),
        }
    }

    /// Emulates this voice on two OPL channels; see [`OpnVoice::to_opl`].
    pub fn to_opl(&self, key_on: bool) -> [OplVoice; 2] {
        self.to_opn().to_opl(key_on)
    }
}

impl OpnSlotParam {
    /// Converts to an OPM operator. SSG-EG has no OPM counterpart and is dropped.
    pub fn to_opm(&self) -> OpmSlotParam {
        OpmSlotParam {
            dt1: self.dt,
            ml: self.ml,
            tl: self.tl,
            ks: self.ks,
            ar: self.ar,
            am: self.am,
            dt2: 0,
            dr: self.dr,
            sr: self.sr,
            sl: self.sl,
            rr: self.rr,
        }
    }

    /// Converts to an OPL operator for the key-on (`key_on`) or key-off phase.
    ///
    /// In the key-on phase the envelope is percussive and the sustain rate
    /// becomes the release rate. In the key-off phase the envelope sustains and
    /// releases at the OPN release rate, never at zero.
    pub fn to_opl(&self, key_on: bool) -> OplSlotParam {
        OplSlotParam {
            am: self.am,
            pm: 0,
            eg: u8::from(!key_on),
            kr: self.ks >> 1,
            ml: self.ml,
            kl: 0,
            tl: self.tl.min(63),
            ar: narrow_rate(self.ar),
            dr: narrow_rate(self.dr),
            sl: self.sl,
            rr: if key_on {
                narrow_rate(self.sr)
            } else {
                nonzero_release(self.rr)
            },
            ws: 0,
        }
    }
}

impl OpnVoice {
    /// Converts to an OPM voice with the same algorithm.
    pub fn to_opm(&self) -> OpmVoice {
        OpmVoice {
            fb: self.fb,
            con: self.con,
            ams: self.ams,
            pms: self.pms,
            slots: self.slots.map(|s| s.to_opm()),
        }
    }

    /// Emulates this voice on two OPL channels.
    ///
    /// The split depends on the algorithm. Where two modulators stack onto one
    /// carrier, the carrier of the first channel takes the second modulator's
    /// multiplier and a combined total level. Use the first voice alone when
    /// only one channel is available.
    pub fn to_opl(&self, key_on: bool) -> [OplVoice; 2] {
        let [s1, s2, s3, s4] = self.slots.map(|s| s.to_opl(key_on));
        let fb = self.fb;
        let (first, second) = match self.con {
            0 | 3 => ((0, [s1, blend(&s2, &s4)]), (0, [s3, s4])),
            1 => ((0, [s1, blend(&s3, &s4)]), (0, [s3, s4])),
            2 => ((0, [s1, s4]), (0, [s3, s4])),
            4 => ((0, [s1, s2]), (0, [s3, s4])),
            5 => {
                return [
                    OplVoice {
                        fb,
                        con: 0,
                        slots: [s1, s2],
                    },
                    OplVoice {
                        fb,
                        con: 0,
                        slots: [s1, s4],
                    },
                ]
            }
            6 => ((0, [s1, s2]), (1, [s3, s4])),
            _ => ((1, [s1, s2]), (1, [s3, s4])),
        };
        [
            OplVoice {
                fb,
                con: first.0,
                slots: first.1,
            },
            OplVoice {
                fb: 0,
                con: second.0,
                slots: second.1,
            },
        ]
    }
}

/// Folds `modulator` into `carrier`: the multiplier of the modulator with the
/// summed total level, attenuated by 2 and capped at 63.
fn blend(modulator: &OplSlotParam, carrier: &OplSlotParam) -> OplSlotParam {
    OplSlotParam {
        ml: modulator.ml,
        tl: (modulator.tl.saturating_sub(2) as u16 + carrier.tl as u16).min(63) as u8,
        ..*carrier
    }
}
