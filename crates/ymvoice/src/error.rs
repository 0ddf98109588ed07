//! Error types for voice encoding, persistence and export.

use thiserror::Error;

use crate::voice::Dialect;

/// Errors that can occur when working with voice records.
///
/// Decoding and conversion are total and never produce these; they come from
/// strict encoding, the JSON persistence boundary and export generators.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// A field value does not fit its register width.
    #[error("{field} = {value} exceeds the {max} register limit{}", slot_suffix(.slot))]
    FieldOutOfRange {
        field: &'static str,
        slot: Option<usize>,
        value: u8,
        max: u8,
    },

    /// A persisted record carries a different type discriminant.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested export format does not exist for this dialect.
    #[error("{dialect} voices cannot be exported as {format}")]
    UnsupportedFormat {
        dialect: Dialect,
        format: &'static str,
    },

    /// I/O error while writing an export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VoiceError {
    /// Returns a stable code string for this error.
    pub fn code(&self) -> &'static str {
        match self {
            VoiceError::FieldOutOfRange { .. } => "VOICE_001",
            VoiceError::TypeMismatch { .. } => "VOICE_002",
            VoiceError::Json(_) => "VOICE_003",
            VoiceError::UnsupportedFormat { .. } => "VOICE_004",
            VoiceError::Io(_) => "VOICE_005",
        }
    }
}

fn slot_suffix(slot: &Option<usize>) -> String {
    match slot {
        Some(index) => format!(" (slot {})", index + 1),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_out_of_range_mentions_slot() {
        let err = VoiceError::FieldOutOfRange {
            field: "tl",
            slot: Some(1),
            value: 80,
            max: 63,
        };
        assert_eq!(err.to_string(), "tl = 80 exceeds the 63 register limit (slot 2)");
        assert_eq!(err.code(), "VOICE_001");
    }

    #[test]
    fn channel_field_has_no_slot_suffix() {
        let err = VoiceError::FieldOutOfRange {
            field: "fb",
            slot: None,
            value: 9,
            max: 7,
        };
        assert_eq!(err.to_string(), "fb = 9 exceeds the 7 register limit");
    }

    #[test]
    fn type_mismatch_message() {
        let err = VoiceError::TypeMismatch {
            expected: "OPMVoice",
            found: "OPNVoice".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch: expected OPMVoice, found OPNVoice"
        );
        assert_eq!(err.code(), "VOICE_002");
    }
}
