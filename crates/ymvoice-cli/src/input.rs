//! Register image input parsing.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use ymvoice::Dialect;

/// Parses a hex register image.
///
/// Accepts contiguous digits (`13411a`), separated bytes (`13 41 1a`,
/// `13,41,1a`) and `0x`-prefixed tokens. Each token must hold whole bytes.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    for token in text
        .split(|c: char| c.is_whitespace() || c == ',' || c == ':')
        .filter(|t| !t.is_empty())
    {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        if digits.len() % 2 != 0 {
            bail!("hex token '{}' has an odd number of digits", token);
        }
        for i in (0..digits.len()).step_by(2) {
            let pair = digits
                .get(i..i + 2)
                .with_context(|| format!("invalid hex token '{}'", token))?;
            let byte = u8::from_str_radix(pair, 16)
                .with_context(|| format!("invalid hex byte '{}' in '{}'", pair, token))?;
            bytes.push(byte);
        }
    }
    Ok(bytes)
}

/// Formats bytes as lowercase hex separated by spaces.
pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a dialect name given on the command line.
pub fn parse_dialect(name: &str) -> Result<Dialect> {
    name.parse::<Dialect>().map_err(anyhow::Error::msg)
}

/// Prints a warning when `bytes` is not a full register image of `dialect`.
///
/// Decoding still succeeds: missing bytes read as zero and extra bytes are
/// ignored.
pub fn warn_on_length(dialect: Dialect, bytes: &[u8]) {
    let expected = dialect.encoded_len();
    if bytes.len() < expected {
        eprintln!(
            "  {} input is {} bytes, a {} voice is {}; missing bytes read as zero",
            "!".yellow(),
            bytes.len(),
            dialect,
            expected
        );
    } else if bytes.len() > expected {
        eprintln!(
            "  {} input is {} bytes, a {} voice is {}; trailing bytes ignored",
            "!".yellow(),
            bytes.len(),
            dialect,
            expected
        );
    }
}
