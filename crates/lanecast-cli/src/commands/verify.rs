//! Verify command implementation
//!
//! Converts clones of the loaded beatmap several times and checks that every
//! run yields the same note hash, optionally matching a known hash.

use anyhow::{Context, Result};
use colored::Colorize;
use lanecast_chart::{notes_hash, Beatmap};
use lanecast_convert::{convert, ConvertOptions, LaneTarget};
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{
    convert_error_to_json, error_codes, input_error_to_json, JsonError, VerifyOutput,
};
use super::print_json;
use crate::input::load_beatmap;

/// Default number of conversions compared by `verify`.
pub const DEFAULT_RUNS: u32 = 3;

/// Outcome of the repeated conversions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    /// Note hash of each run, in run order.
    pub hashes: Vec<String>,
    /// Hash the first run must match, if any.
    pub expected_hash: Option<String>,
}

impl VerifyReport {
    /// True when every run produced the same hash.
    pub fn is_stable(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// True when no hash was expected or the first run matches it.
    pub fn matches_expected(&self) -> bool {
        match (&self.expected_hash, self.hashes.first()) {
            (Some(expected), Some(actual)) => expected.eq_ignore_ascii_case(actual),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }

    /// True when the runs agree and match the expected hash.
    pub fn is_ok(&self) -> bool {
        self.is_stable() && self.matches_expected()
    }
}

/// Converts clones of `beatmap` `runs` times and collects their hashes.
pub fn verify_beatmap(
    beatmap: &Beatmap,
    lanes: LaneTarget,
    runs: u32,
    expected_hash: Option<&str>,
) -> lanecast_convert::ConvertResult<VerifyReport> {
    let options = ConvertOptions { lanes };
    let mut hashes = Vec::with_capacity(runs as usize);
    for _ in 0..runs.max(1) {
        let mut working = beatmap.clone();
        convert(&mut working, &options)?;
        hashes.push(notes_hash(&working.notes));
    }
    Ok(VerifyReport {
        hashes,
        expected_hash: expected_hash.map(str::to_string),
    })
}

/// Run the verify command
///
/// # Returns
/// Exit code: 0 if all runs agree (and match `expected_hash`), 1 otherwise
pub fn run(
    input_path: &str,
    lanes: LaneTarget,
    runs: u32,
    expected_hash: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        return run_json(input_path, lanes, runs, expected_hash);
    }

    println!("{} {}", "Verifying:".cyan().bold(), input_path);
    let loaded = load_beatmap(Path::new(input_path))
        .with_context(|| format!("Failed to load beatmap: {}", input_path))?;

    let report = verify_beatmap(&loaded.beatmap, lanes, runs, expected_hash)
        .with_context(|| format!("Failed to convert beatmap: {}", input_path))?;

    for (i, hash) in report.hashes.iter().enumerate() {
        println!("  {} run {}: {}", "-".dimmed(), i + 1, hash);
    }

    if !report.is_stable() {
        println!(
            "\n{} Conversion is not deterministic across {} runs",
            "FAILED".red().bold(),
            report.hashes.len()
        );
        return Ok(ExitCode::from(1));
    }
    if !report.matches_expected() {
        println!(
            "\n{} Hash differs from expected {}",
            "FAILED".red().bold(),
            report.expected_hash.as_deref().unwrap_or_default()
        );
        return Ok(ExitCode::from(1));
    }

    println!(
        "\n{} {} identical run(s)",
        "SUCCESS".green().bold(),
        report.hashes.len()
    );
    Ok(ExitCode::SUCCESS)
}

fn run_json(
    input_path: &str,
    lanes: LaneTarget,
    runs: u32,
    expected_hash: Option<&str>,
) -> Result<ExitCode> {
    let failure = |errors: Vec<JsonError>| VerifyOutput {
        success: false,
        errors,
        runs,
        hashes: vec![],
        expected_hash: expected_hash.map(str::to_string),
    };

    let loaded = match load_beatmap(Path::new(input_path)) {
        Ok(loaded) => loaded,
        Err(e) => {
            print_json(&failure(vec![input_error_to_json(&e, Some(input_path))]))?;
            return Ok(ExitCode::from(1));
        }
    };

    let report = match verify_beatmap(&loaded.beatmap, lanes, runs, expected_hash) {
        Ok(report) => report,
        Err(e) => {
            print_json(&failure(convert_error_to_json(&e)))?;
            return Ok(ExitCode::from(1));
        }
    };

    let mut errors = Vec::new();
    if !report.is_stable() {
        errors.push(JsonError::new(
            error_codes::NONDETERMINISTIC,
            "repeated conversions produced different notes",
        ));
    } else if !report.matches_expected() {
        errors.push(JsonError::new(
            error_codes::HASH_MISMATCH,
            "output hash differs from the expected hash",
        ));
    }

    let success = errors.is_empty();
    print_json(&VerifyOutput {
        success,
        errors,
        runs: report.hashes.len() as u32,
        hashes: report.hashes,
        expected_hash: report.expected_hash,
    })?;

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
