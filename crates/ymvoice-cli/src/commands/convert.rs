//! Convert command implementation
//!
//! Converts a register image from one dialect to another and prints the
//! register image of each resulting voice.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;
use ymvoice::{ConvertOptions, Dialect, EncodePolicy, Voice};

use crate::input::{format_hex, parse_dialect, parse_hex, warn_on_length};

/// Run the convert command
///
/// # Arguments
/// * `from` - Source dialect
/// * `to` - Target dialect
/// * `hex` - Source register image as hex
/// * `key_off` - Emulate the key-off phase when splitting onto OPL channels
/// * `policy` - Encode policy name (bleed, reject, clamp)
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(from: &str, to: &str, hex: &str, key_off: bool, policy: &str) -> Result<ExitCode> {
    let from = parse_dialect(from)?;
    let to = parse_dialect(to)?;
    let bytes = parse_hex(hex).context("Failed to read register image")?;
    warn_on_length(from, &bytes);

    let images = convert_images(from, to, &bytes, key_off, policy)?;
    if images.len() > 1 {
        eprintln!(
            "  {} {} voice needs {} {} channels",
            "!".yellow(),
            from,
            images.len(),
            to
        );
    }
    for image in &images {
        println!("{}", format_hex(image));
    }
    Ok(ExitCode::SUCCESS)
}

/// Converts a register image and encodes each result under `policy`.
pub fn convert_images(
    from: Dialect,
    to: Dialect,
    bytes: &[u8],
    key_off: bool,
    policy: &str,
) -> Result<Vec<Vec<u8>>> {
    let policy: EncodePolicy = policy.parse().map_err(anyhow::Error::msg)?;
    let options = ConvertOptions::default().key_on(!key_off);

    Voice::decode(from, bytes)
        .convert(to, &options)
        .iter()
        .map(|voice| {
            voice
                .encode_with(policy)
                .with_context(|| format!("Failed to encode {} voice", voice.dialect()))
        })
        .collect()
}
