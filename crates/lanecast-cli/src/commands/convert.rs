//! Convert command implementation
//!
//! Loads a single-column beatmap, converts it and writes the multi-lane
//! result.

use anyhow::{Context, Result};
use colored::Colorize;
use lanecast_chart::{notes_hash, validate_beatmap, Beatmap};
use lanecast_convert::{convert_with_observer, ConvertOptions, LaneTarget, TracingObserver};
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::{
    convert_error_to_json, error_codes, input_error_to_json, validation_warning_to_json,
    ConvertOutput, JsonError,
};
use super::{print_json, print_validation};
use crate::input::{load_beatmap, LoadResult};

/// Run the convert command
///
/// # Arguments
/// * `input_path` - Path to the beatmap JSON file
/// * `lanes` - Requested lane count
/// * `output_path` - Where to write the converted beatmap (stdout if `None`)
/// * `pretty` - Pretty-print the converted beatmap
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 on success, 1 if the beatmap could not be converted
pub fn run(
    input_path: &str,
    lanes: LaneTarget,
    output_path: Option<&str>,
    pretty: bool,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(input_path, lanes, output_path, pretty)
    } else {
        run_human(input_path, lanes, output_path, pretty)
    }
}

fn serialize(beatmap: &Beatmap, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        beatmap.to_json_pretty()
    } else {
        beatmap.to_json()
    }
}

fn run_human(
    input_path: &str,
    lanes: LaneTarget,
    output_path: Option<&str>,
    pretty: bool,
) -> Result<ExitCode> {
    let start = Instant::now();

    // Converted JSON goes to stdout when there is no output file, so
    // progress is only printed when writing to a file.
    let chatty = output_path.is_some();
    if chatty {
        println!("{} {}", "Converting:".cyan().bold(), input_path);
    }

    let LoadResult {
        mut beatmap,
        source_hash,
    } = load_beatmap(Path::new(input_path))
        .with_context(|| format!("Failed to load beatmap: {}", input_path))?;

    let validation = validate_beatmap(&beatmap);
    if chatty {
        println!("{} {}", "Source:".dimmed(), &source_hash[..16]);
        print_validation(&validation);
    }

    let options = ConvertOptions { lanes };
    let summary = match convert_with_observer(&mut beatmap, &options, &mut TracingObserver) {
        Ok(summary) => summary,
        Err(e) => {
            if !chatty {
                print_validation(&validation);
            }
            eprintln!("\n{} {}", "FAILED".red().bold(), e);
            return Ok(ExitCode::from(1));
        }
    };

    let hash = notes_hash(&beatmap.notes);
    let json = serialize(&beatmap, pretty).context("Failed to serialize converted beatmap")?;
    let duration_ms = start.elapsed().as_millis();

    match output_path {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write output to: {}", path))?;
            if summary.passthrough {
                println!(
                    "{} already multi-lane ({} lanes), copied unchanged",
                    "Passthrough:".yellow(),
                    summary.lane_count
                );
            } else {
                println!(
                    "{} {} lanes{}, seed {}, difficulty {:.3}",
                    "Lanes:".dimmed(),
                    summary.lane_count,
                    if summary.auto_lanes { " (auto)" } else { "" },
                    summary.seed,
                    summary.conversion_difficulty
                );
            }
            println!(
                "{} {} objects -> {} notes ({} holds)",
                "Notes:".dimmed(),
                summary.source_objects,
                summary.note_count,
                summary.hold_count
            );
            println!("{} {}", "Hash:".dimmed(), hash);
            println!(
                "\n{} Wrote {} ({}ms)",
                "SUCCESS".green().bold(),
                path,
                duration_ms
            );
        }
        None => {
            println!("{}", json);
            tracing::info!(
                notes = summary.note_count,
                lanes = summary.lane_count,
                hash = %hash,
                "converted in {}ms",
                duration_ms
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_json(
    input_path: &str,
    lanes: LaneTarget,
    output_path: Option<&str>,
    pretty: bool,
) -> Result<ExitCode> {
    let LoadResult {
        mut beatmap,
        source_hash,
    } = match load_beatmap(Path::new(input_path)) {
        Ok(loaded) => loaded,
        Err(e) => {
            let error = input_error_to_json(&e, Some(input_path));
            print_json(&ConvertOutput::failure(vec![error], vec![], None))?;
            return Ok(ExitCode::from(1));
        }
    };

    let warnings: Vec<_> = validate_beatmap(&beatmap)
        .warnings
        .iter()
        .map(validation_warning_to_json)
        .collect();

    let options = ConvertOptions { lanes };
    let summary = match convert_with_observer(&mut beatmap, &options, &mut TracingObserver) {
        Ok(summary) => summary,
        Err(e) => {
            let output = ConvertOutput::failure(convert_error_to_json(&e), warnings, Some(source_hash));
            print_json(&output)?;
            return Ok(ExitCode::from(1));
        }
    };

    if let Some(path) = output_path {
        let written = serialize(&beatmap, pretty)
            .map_err(anyhow::Error::from)
            .and_then(|json| fs::write(path, json).map_err(anyhow::Error::from));
        if let Err(e) = written {
            let error = JsonError::new(error_codes::FILE_WRITE, e.to_string()).with_file(path);
            print_json(&ConvertOutput::failure(vec![error], warnings, Some(source_hash)))?;
            return Ok(ExitCode::from(1));
        }
    }

    let output = ConvertOutput::success(
        source_hash,
        summary,
        notes_hash(&beatmap.notes),
        output_path.map(str::to_string),
        warnings,
    );
    print_json(&output)?;
    Ok(ExitCode::SUCCESS)
}
