//! ymvoice CLI - decode, convert and parse Yamaha FM voices
//!
//! This binary wraps the `ymvoice` library: it decodes register images to
//! JSON, converts voices between chip families, finds the nearest OPLL ROM
//! preset and reads VOPM text banks.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use ymvoice_cli::commands;

/// ymvoice - Yamaha FM voice toolkit
#[derive(Parser)]
#[command(name = "ymvoice")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a register image and print the voice as JSON
    Decode {
        /// Register dialect (opl, opll, opm, opn)
        #[arg(short, long, value_parser = ["opl", "opll", "opm", "opn"])]
        dialect: String,

        /// Register image as hex (e.g. "13411a15d8f72313")
        #[arg(long)]
        hex: String,

        /// Pretty-print the output JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Convert a register image to another dialect
    Convert {
        /// Source dialect (opl, opll, opm, opn)
        #[arg(short, long, value_parser = ["opl", "opll", "opm", "opn"])]
        from: String,

        /// Target dialect (opl, opll, opm, opn)
        #[arg(short, long, value_parser = ["opl", "opll", "opm", "opn"])]
        to: String,

        /// Source register image as hex
        #[arg(long)]
        hex: String,

        /// Emulate the key-off phase when splitting a 4-op voice onto OPL
        #[arg(long)]
        key_off: bool,

        /// How out-of-range fields are encoded (bleed, reject, clamp)
        #[arg(long, default_value = "bleed", value_parser = ["bleed", "reject", "clamp"])]
        policy: String,
    },

    /// Find the OPLL ROM preset closest to an OPL voice
    RomMatch {
        /// OPL register image as hex (11 bytes)
        #[arg(long)]
        hex: String,

        /// Preset bank to search (ym2413, vrc7)
        #[arg(short, long, default_value = "ym2413", value_parser = ["ym2413", "vrc7"])]
        bank: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Parse a VOPM text bank
    Parse {
        /// Path to the VOPM file
        #[arg(short, long)]
        input: String,

        /// Per-voice output (json, hex, mml)
        #[arg(long, default_value = "hex", value_parser = ["json", "hex", "mml"])]
        format: String,

        /// MML dialect for --format mml (pmd, mxdrv)
        #[arg(long, default_value = "pmd", value_parser = ["pmd", "mxdrv"])]
        mml: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            dialect,
            hex,
            pretty,
        } => commands::decode::run(&dialect, &hex, pretty),
        Commands::Convert {
            from,
            to,
            hex,
            key_off,
            policy,
        } => commands::convert::run(&from, &to, &hex, key_off, &policy),
        Commands::RomMatch { hex, bank, json } => commands::rom_match::run(&hex, &bank, json),
        Commands::Parse {
            input,
            format,
            mml,
            json,
        } => commands::parse::run(&input, &format, &mml, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
