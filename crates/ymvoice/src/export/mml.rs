//! MML voice definitions for tracker and MML drivers.

use crate::opl::OplVoice;
use crate::opll::OpllVoice;
use crate::opm::{OpmSlotParam, OpmVoice};
use crate::opn::{OpnSlotParam, OpnVoice};
use crate::voice::YmVoice;

/// MML driver dialects a voice can be rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MmlFormat {
    /// PMD (Professional Music Driver), for OPL, OPM and OPN voices.
    Pmd,
    /// MGSDRV, for OPLL voices.
    Mgsdrv,
    /// MXDRV, for OPM voices.
    Mxdrv,
    /// MUCOM88 parameter form, for OPN voices.
    Mucom88,
    /// MUCOM88 register form (POLL V), for OPN voices.
    Mucom88PollV,
}

impl MmlFormat {
    /// All formats in declaration order.
    pub const ALL: [MmlFormat; 5] = [
        MmlFormat::Pmd,
        MmlFormat::Mgsdrv,
        MmlFormat::Mxdrv,
        MmlFormat::Mucom88,
        MmlFormat::Mucom88PollV,
    ];

    /// Returns the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MmlFormat::Pmd => "pmd",
            MmlFormat::Mgsdrv => "mgsdrv",
            MmlFormat::Mxdrv => "mxdrv",
            MmlFormat::Mucom88 => "mucom88",
            MmlFormat::Mucom88PollV => "mucom88:poll_v",
        }
    }
}

impl std::fmt::Display for MmlFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MmlFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pmd" => Ok(MmlFormat::Pmd),
            "mgsdrv" => Ok(MmlFormat::Mgsdrv),
            "mxdrv" => Ok(MmlFormat::Mxdrv),
            "mucom88" => Ok(MmlFormat::Mucom88),
            "mucom88:poll_v" | "mucom88-poll-v" | "poll_v" => Ok(MmlFormat::Mucom88PollV),
            other => Err(format!(
                "unknown MML format '{}' (expected pmd, mgsdrv, mxdrv, mucom88 or mucom88:poll_v)",
                other
            )),
        }
    }
}

fn join(values: &[u8], width: usize, zero_pad: bool, sep: &str) -> String {
    values
        .iter()
        .map(|v| {
            if zero_pad {
                format!("{:0width$}", v, width = width)
            } else {
                format!("{:>width$}", v, width = width)
            }
        })
        .collect::<Vec<_>>()
        .join(sep)
}

fn pad03(values: &[u8]) -> String {
    join(values, 3, true, " ")
}

fn pad3(values: &[u8]) -> String {
    join(values, 3, false, ",")
}

fn pad2(values: &[u8]) -> String {
    join(values, 2, false, ",")
}

/// OPL voice for PMD.
pub fn opl_pmd(voice: &OplVoice) -> String {
    let mut out = String::from("; OPL voice for PMD\n; NUM ALG FB\n");
    out.push_str(&format!("@ {}\n", pad03(&[0, voice.con, voice.fb])));
    out.push_str("; AR  DR  RR  SL  TL  KSL ML  KSR EGT VIB AM\n");
    for s in &voice.slots {
        out.push_str(&format!(
            "  {}\n",
            pad03(&[s.ar, s.dr, s.rr, s.sl, s.tl, s.kl, s.ml, s.kr, s.eg, s.pm, s.am])
        ));
    }
    out
}

/// OPLL voice for MGSDRV.
pub fn opll_mgsdrv(voice: &OpllVoice) -> String {
    let [m, c] = &voice.slots;
    let mut out = String::from("; OPLL voice for MGSDRV\n@v15 = {\n; TL FB\n");
    out.push_str(&format!("  {},\n", pad2(&[m.tl, voice.fb])));
    out.push_str("; AR DR SL RR KL MT AM PM EG KR DT\n");
    let row = |s: &crate::opll::OpllSlotParam| {
        pad2(&[s.ar, s.dr, s.sl, s.rr, s.kl, s.ml, s.am, s.pm, s.eg, s.kr, s.ws])
    };
    out.push_str(&format!("  {},\n", row(m)));
    out.push_str(&format!("  {} }}\n", row(c)));
    out
}

fn opm_row(s: &OpmSlotParam) -> [u8; 11] {
    [s.ar, s.dr, s.sr, s.rr, s.sl, s.tl, s.ks, s.ml, s.dt1, s.dt2, s.am]
}

/// OPM voice for PMD.
pub fn opm_pmd(voice: &OpmVoice) -> String {
    let mut out = String::from("; OPM voice for PMD\n; NUM ALG FB\n");
    out.push_str(&format!("@ {}\n", pad03(&[0, voice.con, voice.fb])));
    out.push_str("; AR  DR  SR  RR  SL  TL  KS  ML  DT  DT2 AMS\n");
    for s in &voice.slots {
        out.push_str(&format!("  {}\n", pad03(&opm_row(s))));
    }
    out
}

/// OPM voice for MXDRV.
pub fn opm_mxdrv(voice: &OpmVoice) -> String {
    let mut out = String::from("; OPM voice for MXDRV\n@v0 = {\n");
    out.push_str(";  AR  DR  SR  RR  SL  OL  KS  ML DT1 DT2 AME\n");
    for s in &voice.slots {
        out.push_str(&format!("  {},\n", pad3(&opm_row(s))));
    }
    out.push_str("; CON  FL  OP\n");
    out.push_str(&format!("  {}\n", pad3(&[voice.con, voice.fb, 15])));
    out
}

/// OPN voice for PMD.
pub fn opn_pmd(voice: &OpnVoice) -> String {
    let mut out = String::from("; OPN voice for PMD\n; NUM ALG FB\n");
    out.push_str(&format!("@ {}\n", pad03(&[0, voice.con, voice.fb])));
    out.push_str("; AR  DR  SR  RR  SL  TL  KS  ML  DT  AMS\n");
    for s in &voice.slots {
        out.push_str(&format!(
            "  {}\n",
            pad03(&[s.ar, s.dr, s.sr, s.rr, s.sl, s.tl, s.ks, s.ml, s.dt, s.am])
        ));
    }
    out
}

fn mucom_row(s: &OpnSlotParam) -> [u8; 9] {
    [s.ar, s.dr, s.sr, s.rr, s.sl, s.tl, s.ks, s.ml, s.dt]
}

/// OPN voice for MUCOM88.
pub fn opn_mucom88(voice: &OpnVoice) -> String {
    let mut out = String::from("; OPN voice for MUCOM88\n  @0\n");
    out.push_str(&format!("{}\n", pad3(&[voice.fb, voice.con])));
    for s in &voice.slots {
        out.push_str(&format!("{}\n", pad3(&mucom_row(s))));
    }
    out
}

/// OPN voice for MUCOM88 as raw register planes (POLL V).
pub fn opn_mucom88_poll_v(voice: &OpnVoice) -> String {
    let raw = voice.encode();
    let hex = |bytes: &[u8]| {
        bytes
            .iter()
            .map(|b| format!("${:03X}", b))
            .collect::<Vec<_>>()
            .join(",")
    };
    let mut out = String::from("; OPN voice for MUCOM88(POLL V)\n@%000\n");
    for (plane, label) in ["DT/ML", "TL", "KS/AR", "AM/DR", "SR", "SL/RR"]
        .iter()
        .enumerate()
    {
        let start = plane * 4;
        out.push_str(&format!("{} ; {}\n", hex(&raw[start..start + 4]), label));
    }
    out.push_str(&format!("{}                ; FB/AL\n", hex(&raw[28..29])));
    out
}
