//! Inspect command implementation
//!
//! Prints what a conversion would do without converting: object statistics,
//! the derived seed, lane count and conversion difficulty, and validation
//! messages.

use anyhow::{Context, Result};
use colored::Colorize;
use lanecast_chart::validate_beatmap;
use lanecast_convert::{ConversionParams, LaneTarget};
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{
    input_error_to_json, validation_error_to_json, validation_warning_to_json, InspectOutput,
};
use super::{print_json, print_validation};
use crate::input::{load_beatmap, LoadResult};

/// Run the inspect command
///
/// # Returns
/// Exit code: 0 if the beatmap is convertible, 1 otherwise
pub fn run(input_path: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(input_path)
    } else {
        run_human(input_path)
    }
}

fn run_human(input_path: &str) -> Result<ExitCode> {
    println!("{} {}", "Inspecting:".cyan().bold(), input_path);

    let LoadResult {
        beatmap,
        source_hash,
    } = load_beatmap(Path::new(input_path))
        .with_context(|| format!("Failed to load beatmap: {}", input_path))?;

    println!("{} {}", "Source:".dimmed(), &source_hash[..16]);
    println!("{} {}", "Mode:".dimmed(), beatmap.mode);

    if beatmap.is_multi_lane() {
        println!(
            "{} {} notes in {} lanes",
            "Chart:".dimmed(),
            beatmap.notes.len(),
            beatmap.lane_count.map_or_else(|| "?".to_string(), |l| l.to_string())
        );
    } else {
        let stats = beatmap.statistics();
        println!(
            "{} {} taps, {} holds, {} spins ({:.1}% with end time)",
            "Objects:".dimmed(),
            stats.tap_points,
            stats.hold_spans,
            stats.spin_objects,
            stats.percent_special() * 100.0
        );
        if let (Some(first), Some(last)) = (stats.first_time, stats.last_time) {
            println!("{} {}ms - {}ms", "Span:".dimmed(), first, last);
        }
    }

    let validation = validate_beatmap(&beatmap);
    print_validation(&validation);

    if !validation.is_ok() {
        println!(
            "\n{} Beatmap has {} error(s)",
            "FAILED".red().bold(),
            validation.errors.len()
        );
        return Ok(ExitCode::from(1));
    }

    if !beatmap.is_multi_lane() {
        let params = ConversionParams::derive(&beatmap, LaneTarget::Auto);
        println!("{} {}", "Seed:".dimmed(), params.seed);
        println!("{} {} (auto)", "Lanes:".dimmed(), params.lane_count);
        println!("{} {}s", "Drain:".dimmed(), params.drain_seconds);
        println!(
            "{} {:.3}",
            "Conversion difficulty:".dimmed(),
            params.conversion_difficulty
        );
    }

    println!("\n{} Beatmap is convertible", "SUCCESS".green().bold());
    Ok(ExitCode::SUCCESS)
}

fn run_json(input_path: &str) -> Result<ExitCode> {
    let LoadResult {
        beatmap,
        source_hash,
    } = match load_beatmap(Path::new(input_path)) {
        Ok(loaded) => loaded,
        Err(e) => {
            let output = InspectOutput {
                success: false,
                errors: vec![input_error_to_json(&e, Some(input_path))],
                warnings: vec![],
                source_hash: None,
                mode: None,
                statistics: None,
                params: None,
            };
            print_json(&output)?;
            return Ok(ExitCode::from(1));
        }
    };

    let validation = validate_beatmap(&beatmap);
    let success = validation.is_ok();
    let params = (success && !beatmap.is_multi_lane())
        .then(|| ConversionParams::derive(&beatmap, LaneTarget::Auto));

    let output = InspectOutput {
        success,
        errors: validation.errors.iter().map(validation_error_to_json).collect(),
        warnings: validation.warnings.iter().map(validation_warning_to_json).collect(),
        source_hash: Some(source_hash),
        mode: Some(beatmap.mode.as_str().to_string()),
        statistics: Some(beatmap.statistics()),
        params,
    };
    print_json(&output)?;

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
