//! Decode command implementation
//!
//! Decodes a register image and prints the voice as tagged JSON.

use anyhow::{Context, Result};
use serde_json::Value;
use std::process::ExitCode;
use ymvoice::Voice;

use crate::input::{parse_dialect, parse_hex, warn_on_length};

/// Run the decode command
///
/// # Arguments
/// * `dialect` - Register dialect of the input (opl, opll, opm, opn)
/// * `hex` - Register image as hex
/// * `pretty` - Pretty-print the output JSON
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(dialect: &str, hex: &str, pretty: bool) -> Result<ExitCode> {
    println!("{}", decode_to_json(dialect, hex, pretty)?);
    Ok(ExitCode::SUCCESS)
}

/// Decodes `hex` as a `dialect` voice and renders its JSON.
pub fn decode_to_json(dialect: &str, hex: &str, pretty: bool) -> Result<String> {
    let dialect = parse_dialect(dialect)?;
    let bytes = parse_hex(hex).context("Failed to read register image")?;
    warn_on_length(dialect, &bytes);

    let voice = Voice::decode(dialect, &bytes);
    let json = voice.to_json().context("Failed to serialize voice")?;
    if !pretty {
        return Ok(json);
    }
    let value: Value = serde_json::from_str(&json).context("Failed to re-read voice JSON")?;
    serde_json::to_string_pretty(&value).context("Failed to format JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymvoice::{Dialect, OpllVoice, YmVoice};

    #[test]
    fn test_decode_to_json_is_tagged() {
        let json = decode_to_json("opll", "13411a15d8f72313", false).unwrap();
        assert!(json.contains("\"__type\":\"OPLLVoice\""));
        let voice = OpllVoice::from_json(&json).unwrap();
        assert_eq!(voice.fb, 5);
        assert_eq!(voice.slots[0].ml, 3);
    }

    #[test]
    fn test_decode_to_json_pretty_loads_back() {
        let json = decode_to_json("opl", "13 41 1a 00 d8 f7 23 13 01 02 0f", true).unwrap();
        assert!(json.contains('\n'));
        let voice = Voice::from_json(Dialect::Opl, &json).unwrap();
        assert_eq!(voice.to_hash(), "13411a00d8f7231301020f");
    }

    #[test]
    fn test_decode_rejects_unknown_dialect() {
        assert!(decode_to_json("opx", "00", false).is_err());
    }
}
