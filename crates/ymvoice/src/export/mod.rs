//! Text and binary export of voices for music drivers and trackers.
//!
//! | Dialect | MML formats                     | Instrument files |
//! |---------|---------------------------------|------------------|
//! | OPL     | PMD                             | -                |
//! | OPLL    | MGSDRV                          | -                |
//! | OPM     | PMD, MXDRV                      | -                |
//! | OPN     | PMD, MUCOM88, MUCOM88 (POLL V)  | DMP, TFI, VGI    |

pub mod file;
pub mod mml;

use std::io::Write;

pub use file::InstrumentFormat;
pub use mml::MmlFormat;

use crate::error::VoiceError;
use crate::voice::{Dialect, Voice};

impl Voice {
    /// Renders this voice as an MML voice definition.
    pub fn to_mml(&self, format: MmlFormat) -> Result<String, VoiceError> {
        match (self, format) {
            (Voice::Opl(v), MmlFormat::Pmd) => Ok(mml::opl_pmd(v)),
            (Voice::Opll(v), MmlFormat::Mgsdrv) => Ok(mml::opll_mgsdrv(v)),
            (Voice::Opm(v), MmlFormat::Pmd) => Ok(mml::opm_pmd(v)),
            (Voice::Opm(v), MmlFormat::Mxdrv) => Ok(mml::opm_mxdrv(v)),
            (Voice::Opn(v), MmlFormat::Pmd) => Ok(mml::opn_pmd(v)),
            (Voice::Opn(v), MmlFormat::Mucom88) => Ok(mml::opn_mucom88(v)),
            (Voice::Opn(v), MmlFormat::Mucom88PollV) => Ok(mml::opn_mucom88_poll_v(v)),
            _ => Err(VoiceError::UnsupportedFormat {
                dialect: self.dialect(),
                format: format.as_str(),
            }),
        }
    }

    /// Writes this voice as a binary instrument file.
    pub fn write_instrument<W: Write>(
        &self,
        format: InstrumentFormat,
        writer: &mut W,
    ) -> Result<(), VoiceError> {
        match self {
            Voice::Opn(v) => Ok(v.write_instrument(format, writer)?),
            other => Err(VoiceError::UnsupportedFormat {
                dialect: other.dialect(),
                format: format.extension(),
            }),
        }
    }
}

/// Returns the MML formats available for `dialect`, default first.
pub fn mml_formats(dialect: Dialect) -> &'static [MmlFormat] {
    match dialect {
        Dialect::Opl => &[MmlFormat::Pmd],
        Dialect::Opll => &[MmlFormat::Mgsdrv],
        Dialect::Opm => &[MmlFormat::Pmd, MmlFormat::Mxdrv],
        Dialect::Opn => &[MmlFormat::Pmd, MmlFormat::Mucom88, MmlFormat::Mucom88PollV],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listed_formats_are_supported() {
        for dialect in Dialect::ALL {
            let voice = Voice::decode(dialect, &[]);
            for format in MmlFormat::ALL {
                let listed = mml_formats(dialect).contains(&format);
                assert_eq!(voice.to_mml(format).is_ok(), listed, "{} {}", dialect, format);
            }
        }
    }

    #[test]
    fn unsupported_pair_reports_dialect_and_format() {
        let err = Voice::decode(Dialect::Opll, &[])
            .to_mml(MmlFormat::Pmd)
            .unwrap_err();
        assert_eq!(err.code(), "VOICE_004");
        assert_eq!(err.to_string(), "OPLL voices cannot be exported as pmd");
    }

    #[test]
    fn instrument_files_are_opn_only() {
        let mut buf = Vec::new();
        assert!(Voice::decode(Dialect::Opm, &[])
            .write_instrument(InstrumentFormat::Tfi, &mut buf)
            .is_err());
        assert!(buf.is_empty());
        Voice::decode(Dialect::Opn, &[])
            .write_instrument(InstrumentFormat::Tfi, &mut buf)
            .unwrap();
        assert_eq!(buf.len(), InstrumentFormat::Tfi.file_len());
    }
}
