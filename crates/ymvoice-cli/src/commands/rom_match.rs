//! Rom-match command implementation
//!
//! Finds the built-in OPLL preset closest to an OPL voice.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;
use ymvoice::rom::YM2413_PATCH_NAMES;
use ymvoice::{ConvertOptions, Dialect, OplVoice, RomBank, RomVoiceMatch, YmVoice};

use crate::input::{parse_hex, warn_on_length};

/// Machine-readable result of the rom-match command.
#[derive(Debug, Serialize)]
pub struct RomMatchOutput {
    pub bank: &'static str,
    #[serde(flatten)]
    pub result: RomVoiceMatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
}

/// Run the rom-match command
///
/// # Arguments
/// * `hex` - OPL register image as hex
/// * `bank` - Preset bank name (ym2413, vrc7)
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(hex: &str, bank: &str, json_output: bool) -> Result<ExitCode> {
    let bytes = parse_hex(hex).context("Failed to read register image")?;
    warn_on_length(Dialect::Opl, &bytes);
    let output = match_preset(&bytes, bank)?;

    if json_output {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialize result")?;
        println!("{}", json);
        return Ok(ExitCode::SUCCESS);
    }

    if output.result.program == 0 {
        println!(
            "{} no compatible {} preset, use the user voice",
            "!".yellow(),
            output.bank
        );
        return Ok(ExitCode::SUCCESS);
    }
    match output.name {
        Some(name) => println!(
            "{} @{} ({})",
            "Program:".cyan().bold(),
            output.result.program,
            name
        ),
        None => println!("{} @{}", "Program:".cyan().bold(), output.result.program),
    }
    println!(
        "{} {:+}",
        "Volume offset:".dimmed(),
        output.result.volume_offset
    );
    println!(
        "{} {:+}",
        "Octave offset:".dimmed(),
        output.result.octave_offset
    );
    Ok(ExitCode::SUCCESS)
}

/// Decodes an OPL voice and searches `bank` for its nearest preset.
pub fn match_preset(bytes: &[u8], bank: &str) -> Result<RomMatchOutput> {
    let bank: RomBank = bank.parse().map_err(anyhow::Error::msg)?;
    let options = ConvertOptions::default().rom_bank(bank);
    let result = OplVoice::decode(bytes).to_opll_rom(options.rom_bank);

    let name = match options.rom_bank {
        RomBank::Ym2413 if result.program != 0 => Some(YM2413_PATCH_NAMES[result.program as usize]),
        _ => None,
    };
    Ok(RomMatchOutput {
        bank: options.rom_bank.as_str(),
        result,
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUITAR: [u8; 11] = [
        0x13, 0x41, 0x1a, 0x00, 0xd8, 0xf7, 0x23, 0x13, 0x01, 0x00, 0x0a,
    ];

    #[test]
    fn test_match_preset_names_ym2413_program() {
        let output = match_preset(&GUITAR, "ym2413").unwrap();
        assert_eq!(output.result.program, 2);
        assert_eq!(output.name, Some("Guitar"));
    }

    #[test]
    fn test_match_preset_vrc7_has_no_names() {
        let output = match_preset(&GUITAR, "vrc7").unwrap();
        assert_eq!(output.bank, "vrc7");
        assert_eq!(output.name, None);
    }

    #[test]
    fn test_output_json_is_flat() {
        let output = match_preset(&GUITAR, "ym2413").unwrap();
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"program\":2"));
        assert!(json.contains("\"bank\":\"ym2413\""));
    }

    #[test]
    fn test_match_preset_rejects_unknown_bank() {
        assert!(match_preset(&GUITAR, "sn76489").is_err());
    }
}
