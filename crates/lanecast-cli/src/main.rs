//! lanecast CLI - single-column to multi-lane beatmap conversion
//!
//! This binary provides commands for converting beatmaps, inspecting what a
//! conversion would do, and verifying that conversion is reproducible.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;

use lanecast_cli::{commands, logging};
use lanecast_convert::LaneTarget;

/// lanecast - Deterministic beatmap lane conversion
#[derive(Parser)]
#[command(name = "lanecast")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single-column beatmap into a multi-lane chart
    Convert {
        /// Path to the beatmap JSON file
        #[arg(short, long)]
        input: String,

        /// Output lane count (`auto` or 1-10)
        #[arg(short, long, default_value = "auto")]
        lanes: LaneTarget,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Pretty-print the converted beatmap
        #[arg(short, long)]
        pretty: bool,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show statistics and derived conversion parameters for a beatmap
    Inspect {
        /// Path to the beatmap JSON file
        #[arg(short, long)]
        input: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Convert repeatedly and check the output hash is stable
    Verify {
        /// Path to the beatmap JSON file
        #[arg(short, long)]
        input: String,

        /// Output lane count (`auto` or 1-10)
        #[arg(short, long, default_value = "auto")]
        lanes: LaneTarget,

        /// Number of conversions to compare
        #[arg(long, default_value_t = commands::verify::DEFAULT_RUNS)]
        runs: u32,

        /// Expected BLAKE3 hash of the converted notes
        #[arg(long)]
        expect_hash: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            input,
            lanes,
            output,
            pretty,
            json,
        } => commands::convert::run(&input, lanes, output.as_deref(), pretty, json),
        Commands::Inspect { input, json } => commands::inspect::run(&input, json),
        Commands::Verify {
            input,
            lanes,
            runs,
            expect_hash,
            json,
        } => commands::verify::run(&input, lanes, runs, expect_hash.as_deref(), json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(1)
        }
    }
}
