//! VOPM text bank reader.
//!
//! VOPM is the plain-text OPM voice format used by VOPM, vgm-conv and many
//! tracker tools:
//!
//! ```text
//! @:0 Instrument name
//! //  LFRQ AMD PMD  WF NFRQ
//! LFO:   0   0   0   0   0
//! //  PAN  FL CON AMS PMS SLOT  NE
//! CH:  64   3   4   1   2  15   0
//! //   AR D1R D2R  RR D1L  TL  KS MUL DT1 DT2 AMS-EN
//! M1:  18   1   2   6   4  35   1   2   6   0   0
//! C1:  19   0   0   6   0   0   0   2   5   0   0
//! M2:  17   0   0   6   0  35   0   2   1   0   0
//! C2:  16   0   0   6   0   0   0   2   0   0   0
//! ```
//!
//! The operator lines M1, C1, M2, C2 become slots 0 to 3 of the voice.

mod parser;
pub mod warning;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::opm::OpmVoice;

pub use parser::parse_vopm;
pub use warning::{ParseWarning, WarningCode};

/// Result of parsing a VOPM text bank.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VopmBank {
    /// Successfully built voices keyed by their declared index.
    pub voices: BTreeMap<u32, OpmVoice>,
    /// Comment lines of each built voice, including the `//` marker.
    pub comments: BTreeMap<u32, Vec<String>>,
    /// Problems found while parsing, in source order.
    pub warnings: Vec<ParseWarning>,
}

impl VopmBank {
    /// Returns true if parsing produced no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Returns the comment lines of voice `index`.
    pub fn comments_for(&self, index: u32) -> &[String] {
        self.comments.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }
}
