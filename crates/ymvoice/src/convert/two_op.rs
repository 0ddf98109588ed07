//! Conversions from the two-operator dialects.

use super::{widen_rate, RomVoiceMatch};
use crate::opl::{OplSlotParam, OplVoice};
use crate::opll::{OpllSlotParam, OpllVoice};
use crate::opm::OpmVoice;
use crate::opn::{OpnSlotParam, OpnVoice};
use crate::rom::RomBank;

/// OPL and OPLL number the key scale level steps in opposite bit order.
const KL_SWAP: [u8; 4] = [0, 2, 1, 3];

/// OPN algorithm with operator 1 modulating operator 4 (2 and 3 silent).
const SERIAL_ALGORITHM: u8 = 2;
/// OPN algorithm with all four operators as carriers.
const PARALLEL_ALGORITHM: u8 = 7;
/// AMS 2 is about 5.9 dB of tremolo depth, close to the fixed OPL depth.
const TREMOLO_AMS: u8 = 2;
/// PMS 2 is about 6.7 cents of vibrato, close to the fixed OPL depth.
const VIBRATO_PMS: u8 = 2;
/// Feedback boost that stands in for a rectified modulator waveform.
const HALF_SINE_FEEDBACK_BOOST: u8 = 6;

impl OplSlotParam {
    /// Converts to an OPLL operator.
    pub fn to_opll(&self) -> OpllSlotParam {
        OpllSlotParam {
            am: self.am,
            pm: self.pm,
            eg: self.eg,
            ml: self.ml,
            kr: self.kr,
            kl: KL_SWAP[(self.kl & 3) as usize],
            tl: self.tl & 0x3f,
            ar: self.ar,
            dr: self.dr,
            sl: self.sl,
            rr: self.rr,
            ws: u8::from(self.ws > 0),
        }
    }

    /// Converts to an OPN operator.
    ///
    /// `carrier` selects the TL compensation for a non-sine waveform and the
    /// release rate used for percussive envelopes.
    pub fn to_opn(&self, carrier: bool) -> OpnSlotParam {
        let waveform_offset: u16 = match (self.ws != 0, carrier) {
            (false, _) => 0,
            (true, true) => 8,
            (true, false) => 5,
        };
        let sustained = self.eg != 0;
        OpnSlotParam {
            dt: 0,
            ml: self.ml,
            tl: (self.tl as u16 + waveform_offset).min(127) as u8,
            ks: self.kr.saturating_mul(2),
            ar: widen_rate(self.ar),
            am: self.am,
            dr: widen_rate(self.dr),
            sr: widen_rate(if sustained { 0 } else { self.rr }),
            sl: self.sl,
            rr: if sustained {
                self.rr.saturating_add(1).min(15)
            } else if carrier {
                8
            } else {
                0
            },
            ssg: 0,
        }
    }
}

impl OpllSlotParam {
    /// Converts to an OPL operator.
    pub fn to_opl(&self) -> OplSlotParam {
        OplSlotParam {
            am: self.am,
            pm: self.pm,
            eg: self.eg,
            ml: self.ml,
            kr: self.kr,
            kl: KL_SWAP[(self.kl & 3) as usize],
            tl: self.tl,
            ar: self.ar,
            dr: self.dr,
            sl: self.sl,
            rr: self.rr,
            ws: self.ws,
        }
    }

    /// Converts to an OPN operator; see [`OplSlotParam::to_opn`].
    pub fn to_opn(&self, carrier: bool) -> OpnSlotParam {
        self.to_opl().to_opn(carrier)
    }
}

impl OplVoice {
    /// Converts slot by slot to an OPLL user voice.
    ///
    /// OPLL has no additive connection, so an additive voice keeps only its carrier.
    pub fn to_opll(&self) -> OpllVoice {
        OpllVoice {
            fb: self.fb,
            slots: [
                if self.con == 0 {
                    self.slots[0].to_opll()
                } else {
                    OpllSlotParam::default()
                },
                self.slots[1].to_opll(),
            ],
        }
    }

    /// Finds the closest built-in preset of `bank`.
    pub fn to_opll_rom(&self, bank: RomBank) -> RomVoiceMatch {
        super::rom_match::nearest_rom_voice(self, bank)
    }

    /// Places the operator pair on OPN operators 1 and 4.
    ///
    /// An FM voice uses algorithm 2, an additive voice algorithm 7; operators 2
    /// and 3 are left silent.
    pub fn to_opn(&self) -> OpnVoice {
        let [m, c] = &self.slots;
        let (con, modulator) = if self.con == 0 {
            (SERIAL_ALGORITHM, m.to_opn(false))
        } else {
            (PARALLEL_ALGORITHM, m.to_opn(true))
        };
        OpnVoice {
            fb: boosted_feedback(self.fb, m.ws),
            con,
            ams: TREMOLO_AMS,
            pms: vibrato_pms(m.pm, c.pm),
            slots: [
                modulator,
                OpnSlotParam::default(),
                OpnSlotParam::default(),
                c.to_opn(true),
            ],
        }
    }

    /// Converts to OPM through OPN.
    pub fn to_opm(&self) -> OpmVoice {
        self.to_opn().to_opm()
    }
}

impl OpllVoice {
    /// Converts to an FM-connected OPL voice.
    pub fn to_opl(&self) -> OplVoice {
        OplVoice {
            fb: self.fb,
            con: 0,
            slots: [self.slots[0].to_opl(), self.slots[1].to_opl()],
        }
    }

    /// Places the operator pair on OPN operators 1 and 4 with algorithm 2.
    pub fn to_opn(&self) -> OpnVoice {
        let [m, c] = &self.slots;
        OpnVoice {
            fb: boosted_feedback(self.fb, m.ws),
            con: SERIAL_ALGORITHM,
            ams: TREMOLO_AMS,
            pms: vibrato_pms(m.pm, c.pm),
            slots: [
                m.to_opn(false),
                OpnSlotParam::default(),
                OpnSlotParam::default(),
                c.to_opn(true),
            ],
        }
    }

    /// Converts to OPM through OPN.
    pub fn to_opm(&self) -> OpmVoice {
        self.to_opn().to_opm()
    }
}

fn boosted_feedback(fb: u8, modulator_ws: u8) -> u8 {
    if modulator_ws != 0 {
        fb.saturating_add(HALF_SINE_FEEDBACK_BOOST).min(7)
    } else {
        fb
    }
}

fn vibrato_pms(modulator_pm: u8, carrier_pm: u8) -> u8 {
    if modulator_pm != 0 || carrier_pm != 0 {
        VIBRATO_PMS
    } else {
        0
    }
}
