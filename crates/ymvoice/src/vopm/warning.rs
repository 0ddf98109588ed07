//! Structured parser warnings.

use serde::{Serialize, Serializer};

/// Warning codes emitted by the VOPM parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W101: Line with an unknown field-group tag
    UnknownLineType,
    /// W102: Field-group line before the first voice marker
    LineOutsideVoice,
    /// W103: Field group repeated within one voice
    DuplicateFieldGroup,
    /// W104: Voice marker without a valid index
    InvalidVoiceIndex,
    /// W105: Voice with missing or malformed field groups
    MalformedVoice,
    /// W106: Voice index declared more than once
    DuplicateVoiceIndex,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W101").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::UnknownLineType => "W101",
            WarningCode::LineOutsideVoice => "W102",
            WarningCode::DuplicateFieldGroup => "W103",
            WarningCode::InvalidVoiceIndex => "W104",
            WarningCode::MalformedVoice => "W105",
            WarningCode::DuplicateVoiceIndex => "W106",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for WarningCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// A parser warning with code, location and message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    /// The warning code.
    pub code: WarningCode,
    /// 1-indexed source line.
    pub line: usize,
    /// Voice index of the enclosing block, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<u32>,
    /// Human-readable warning message.
    pub message: String,
}

impl ParseWarning {
    /// Creates a warning outside any voice block.
    pub fn new(code: WarningCode, line: usize, message: impl Into<String>) -> Self {
        Self {
            code,
            line,
            voice: None,
            message: message.into(),
        }
    }

    /// Creates a warning attached to voice `voice`.
    pub fn for_voice(
        code: WarningCode,
        line: usize,
        voice: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            line,
            voice: Some(voice),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} (line {})", self.code, self.message, self.line)
    }
}
