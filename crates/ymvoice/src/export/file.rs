//! Binary OPN instrument files.
//!
//! - DMP: DefleMask preset, version 10, FM mode
//! - TFI: TFM Music Maker instrument
//! - VGI: VGM Music Maker instrument (TFI plus an LFO sensitivity byte)

use std::io::{self, Write};

use byteorder::WriteBytesExt;

use crate::opn::{OpnSlotParam, OpnVoice};

/// DMP file version written by [`OpnVoice::write_instrument`].
const DMP_VERSION: u8 = 0x0a;
/// DMP instrument mode byte for FM instruments.
const DMP_MODE_FM: u8 = 1;

/// Binary instrument file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InstrumentFormat {
    Dmp,
    #[default]
    Tfi,
    Vgi,
}

impl InstrumentFormat {
    /// All formats in declaration order.
    pub const ALL: [InstrumentFormat; 3] = [
        InstrumentFormat::Dmp,
        InstrumentFormat::Tfi,
        InstrumentFormat::Vgi,
    ];

    /// Returns the file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            InstrumentFormat::Dmp => "dmp",
            InstrumentFormat::Tfi => "tfi",
            InstrumentFormat::Vgi => "vgi",
        }
    }

    /// Size of a written file in bytes.
    pub fn file_len(&self) -> usize {
        match self {
            InstrumentFormat::Dmp => 6 + 4 * 11,
            InstrumentFormat::Tfi => 2 + 4 * 10,
            InstrumentFormat::Vgi => 3 + 4 * 10,
        }
    }
}

impl std::str::FromStr for InstrumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().trim_start_matches('.') {
            "dmp" => Ok(InstrumentFormat::Dmp),
            "tfi" => Ok(InstrumentFormat::Tfi),
            "vgi" => Ok(InstrumentFormat::Vgi),
            other => Err(format!(
                "unknown instrument format '{}' (expected dmp, tfi or vgi)",
                other
            )),
        }
    }
}

/// Folds the chip's negative detune codes 4..=7 onto 3..=0 for TFI and VGI.
///
/// Codes 0..=3 pass through unchanged.
fn signed_detune(dt: u8) -> u8 {
    if dt > 3 {
        7 - dt
    } else {
        dt
    }
}

fn write_tfm_operator<W: Write>(writer: &mut W, s: &OpnSlotParam) -> io::Result<()> {
    writer.write_u8(s.ml)?;
    writer.write_u8(signed_detune(s.dt))?;
    writer.write_u8(s.tl)?;
    writer.write_u8(s.ks)?;
    writer.write_u8(s.ar)?;
    writer.write_u8(s.dr)?;
    writer.write_u8(s.sr)?;
    writer.write_u8(s.rr)?;
    writer.write_u8(s.sl)?;
    writer.write_u8(0)?; // SSG-EG
    Ok(())
}

fn write_dmp_operator<W: Write>(writer: &mut W, s: &OpnSlotParam) -> io::Result<()> {
    writer.write_u8(s.ml)?;
    writer.write_u8(s.tl)?;
    writer.write_u8(s.ar)?;
    writer.write_u8(s.dr)?;
    writer.write_u8(s.sl)?;
    writer.write_u8(s.rr)?;
    writer.write_u8(s.am)?;
    writer.write_u8(s.ks)?;
    writer.write_u8(s.dt)?;
    writer.write_u8(s.sr)?;
    writer.write_u8(0)?; // SSG-EG
    Ok(())
}

impl OpnVoice {
    /// Writes this voice as an instrument file.
    pub fn write_instrument<W: Write>(
        &self,
        format: InstrumentFormat,
        writer: &mut W,
    ) -> io::Result<()> {
        match format {
            InstrumentFormat::Dmp => {
                writer.write_u8(DMP_VERSION)?;
                writer.write_u8(DMP_MODE_FM)?;
                writer.write_u8(self.pms)?;
                writer.write_u8(self.fb)?;
                writer.write_u8(self.con)?;
                writer.write_u8(self.ams)?;
                for slot in &self.slots {
                    write_dmp_operator(writer, slot)?;
                }
            }
            InstrumentFormat::Tfi | InstrumentFormat::Vgi => {
                writer.write_u8(self.con)?;
                writer.write_u8(self.fb)?;
                if format == InstrumentFormat::Vgi {
                    writer.write_u8(self.pms | self.ams << 4)?;
                }
                for slot in &self.slots {
                    write_tfm_operator(writer, slot)?;
                }
            }
        }
        Ok(())
    }

    /// Returns this voice as instrument file bytes.
    pub fn to_instrument_bytes(&self, format: InstrumentFormat) -> Vec<u8> {
        let mut buf = Vec::with_capacity(format.file_len());
        // Writing to a Vec never fails
        let _ = self.write_instrument(format, &mut buf);
        buf
    }
}
