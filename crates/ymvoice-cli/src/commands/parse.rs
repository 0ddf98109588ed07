//! Parse command implementation
//!
//! Reads a VOPM text bank and prints its voices along with any parser
//! warnings.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::process::ExitCode;
use ymvoice::{parse_vopm, MmlFormat, ParseWarning, Voice, VopmBank, YmVoice};

/// One voice in the machine-readable parse output.
#[derive(Debug, Serialize)]
pub struct ParsedVoice<'a> {
    pub index: u32,
    pub hex: String,
    pub comments: &'a [String],
}

/// Machine-readable result of the parse command.
#[derive(Debug, Serialize)]
pub struct ParseOutput<'a> {
    pub input: &'a str,
    pub voices: Vec<ParsedVoice<'a>>,
    pub warnings: &'a [ParseWarning],
}

/// Run the parse command
///
/// # Arguments
/// * `input` - Path to the VOPM text file
/// * `format` - Per-voice output (json, hex, mml)
/// * `mml_format` - MML dialect used by `--format mml` (pmd, mxdrv)
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(input: &str, format: &str, mml_format: &str, json_output: bool) -> Result<ExitCode> {
    let bank = load_bank(input)?;

    if json_output {
        let voices = bank
            .voices
            .iter()
            .map(|(&index, voice)| ParsedVoice {
                index,
                hex: voice.to_hash(),
                comments: bank.comments_for(index),
            })
            .collect();
        let output = ParseOutput {
            input,
            voices,
            warnings: &bank.warnings,
        };
        let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
        println!("{}", json);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Parsing:".cyan().bold(), input);
    for warning in &bank.warnings {
        println!(
            "  {} [{}] line {}: {}",
            "!".yellow(),
            warning.code,
            warning.line,
            warning.message
        );
    }
    for (index, text) in render_voices(&bank, format, mml_format)? {
        println!("{}", format!("@{}", index).bold());
        println!("{}", text.trim_end());
    }

    let status = if bank.is_clean() {
        "SUCCESS".green().bold()
    } else {
        "WARNINGS".yellow().bold()
    };
    println!(
        "{} {} voice(s), {} warning(s)",
        status,
        bank.voices.len(),
        bank.warnings.len()
    );
    Ok(ExitCode::SUCCESS)
}

/// Reads and parses a VOPM file.
pub fn load_bank(path: &str) -> Result<VopmBank> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read VOPM file: {}", path))?;
    Ok(parse_vopm(&text))
}

/// Renders every voice of `bank` in the requested per-voice format.
pub fn render_voices(
    bank: &VopmBank,
    format: &str,
    mml_format: &str,
) -> Result<Vec<(u32, String)>> {
    let mml_format: MmlFormat = mml_format.parse().map_err(anyhow::Error::msg)?;

    bank.voices
        .iter()
        .map(|(&index, voice)| -> Result<(u32, String)> {
            let text = match format {
                "json" => voice.to_json().context("Failed to serialize voice")?,
                "hex" => voice.to_hash(),
                "mml" => Voice::Opm(*voice)
                    .to_mml(mml_format)
                    .context("Failed to render MML")?,
                other => bail!("unknown output format: {} (expected json, hex or mml)", other),
            };
            Ok((index, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BANK: &str = "\
//VOPM tone data
@:4 Lead
LFO:   0   0   0   0   0
CH:  64   3   4   1   2  15   0
M1:  18   1   2   6   4  35   1   2   6   0   0
C1:  19   0   0   6   0   0   0   2   5   0   0
M2:  17   0   0   6   0  35   0   2   1   0   0
C2:  16   0   0   6   0   0   0   2   0   0   0
@:x broken
";

    fn write_bank() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BANK.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_bank_reads_file() {
        let file = write_bank();
        let bank = load_bank(file.path().to_str().unwrap()).unwrap();
        assert_eq!(bank.voices.keys().copied().collect::<Vec<_>>(), vec![4]);
        assert_eq!(bank.warnings.len(), 1);
        assert_eq!(bank.warnings[0].code.code(), "W104");
    }

    #[test]
    fn test_load_bank_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.opm");
        let err = load_bank(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Failed to read VOPM file"));
    }

    #[test]
    fn test_render_voices_formats() {
        let bank = parse_vopm(BANK);
        let hex = render_voices(&bank, "hex", "pmd").unwrap();
        assert_eq!(hex[0].0, 4);
        assert_eq!(hex[0].1.len(), 52);

        let json = render_voices(&bank, "json", "pmd").unwrap();
        assert!(json[0].1.contains("\"__type\":\"OPMVoice\""));

        let mml = render_voices(&bank, "mml", "mxdrv").unwrap();
        assert!(mml[0].1.starts_with("; OPM voice for MXDRV"));
    }

    #[test]
    fn test_render_voices_rejects_unsupported_mml() {
        let bank = parse_vopm(BANK);
        assert!(render_voices(&bank, "mml", "mgsdrv").is_err());
        assert!(render_voices(&bank, "yaml", "pmd").is_err());
    }

    #[test]
    fn test_output_json_lists_voices_and_warnings() {
        let bank = parse_vopm(BANK);
        let output = ParseOutput {
            input: "bank.opm",
            voices: vec![ParsedVoice {
                index: 4,
                hex: bank.voices[&4].to_hash(),
                comments: bank.comments_for(4),
            }],
            warnings: &bank.warnings,
        };
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"index\":4"));
        assert!(json.contains("\"code\":\"W104\""));
    }
}
