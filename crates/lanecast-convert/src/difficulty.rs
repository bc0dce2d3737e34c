//! Seed, lane count and conversion difficulty derived from a beatmap.

use std::str::FromStr;

use lanecast_chart::{validate_lane_count, Beatmap, Difficulty, ValidationError};
use serde::{Deserialize, Serialize};

/// Drain time used when the object span rounds down to zero seconds.
pub const FALLBACK_DRAIN_SECONDS: i32 = 10;

/// Upper bound of the conversion difficulty score.
pub const MAX_CONVERSION_DIFFICULTY: f64 = 12.0;

/// How the output lane count is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneTarget {
    /// Derive the lane count from the beatmap.
    #[default]
    Auto,
    /// Use an explicit lane count.
    Fixed(usize),
}

impl LaneTarget {
    /// Validates an explicit lane count; `Auto` is always valid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            LaneTarget::Auto => Ok(()),
            LaneTarget::Fixed(lanes) => validate_lane_count(*lanes),
        }
    }
}

impl std::fmt::Display for LaneTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaneTarget::Auto => write!(f, "auto"),
            LaneTarget::Fixed(lanes) => write!(f, "{}", lanes),
        }
    }
}

impl FromStr for LaneTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(LaneTarget::Auto);
        }
        s.parse::<usize>()
            .map(LaneTarget::Fixed)
            .map_err(|_| format!("expected 'auto' or a lane count, got '{}'", s))
    }
}

/// Options accepted by [`crate::convert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Output lane count.
    #[serde(default)]
    pub lanes: LaneTarget,
}

impl ConvertOptions {
    /// Options with an automatically derived lane count.
    pub fn auto() -> Self {
        Self {
            lanes: LaneTarget::Auto,
        }
    }

    /// Options with an explicit lane count.
    pub fn with_lanes(lanes: usize) -> Self {
        Self {
            lanes: LaneTarget::Fixed(lanes),
        }
    }
}

/// Parameters fixed for the whole of one conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversionParams {
    /// Generator seed.
    pub seed: i32,
    /// Resolved output lane count.
    pub lane_count: usize,
    /// Whether `lane_count` was derived rather than requested.
    pub auto_lanes: bool,
    /// Score biasing how many simultaneous notes patterns produce.
    pub conversion_difficulty: f64,
    /// Drain time in whole seconds used by the difficulty score.
    pub drain_seconds: i32,
    /// First lane available to random placement (1 in 8-lane mode).
    pub random_start: usize,
}

impl ConversionParams {
    /// Derives all run parameters from a beatmap and a lane target.
    pub fn derive(beatmap: &Beatmap, target: LaneTarget) -> Self {
        let (lane_count, auto_lanes) = match target {
            LaneTarget::Auto => (target_lane_count(beatmap), true),
            LaneTarget::Fixed(lanes) => (lanes, false),
        };
        let drain_seconds = drain_seconds(beatmap);
        Self {
            seed: derive_seed(&beatmap.difficulty),
            lane_count,
            auto_lanes,
            conversion_difficulty: conversion_difficulty(beatmap, drain_seconds),
            drain_seconds,
            random_start: random_start(lane_count),
        }
    }
}

/// Derives the generator seed from the difficulty settings.
///
/// ```text
/// seed = round(hp + cs) * 20 + trunc(od * 41.2) + round(ar)
/// ```
///
/// Rounding is half-to-even on the 32-bit values.
pub fn derive_seed(difficulty: &Difficulty) -> i32 {
    let hp_cs = (difficulty.hp + difficulty.cs).round_ties_even() as i32;
    let od = (difficulty.od as f64 * 41.2) as i32;
    let ar = difficulty.ar.round_ties_even() as i32;
    hp_cs
        .wrapping_mul(20)
        .wrapping_add(od)
        .wrapping_add(ar)
}

/// Derives the lane count for an automatic conversion.
///
/// # Example
/// ```
/// use lanecast_chart::{Beatmap, Difficulty, SourceObject};
/// use lanecast_convert::difficulty::target_lane_count;
///
/// let beatmap = Beatmap::builder(Difficulty { hp: 5.0, cs: 4.0, od: 5.0, ar: 8.0 })
///     .object(SourceObject::tap(0, 100.0))
///     .build();
/// assert_eq!(target_lane_count(&beatmap), 7);
/// ```
pub fn target_lane_count(beatmap: &Beatmap) -> usize {
    let rounded_cs = (beatmap.difficulty.cs as f64).round_ties_even();

    if beatmap.is_multi_lane() {
        return rounded_cs.max(1.0) as usize;
    }

    let rounded_od = (beatmap.difficulty.od as f64).round_ties_even();
    let percent_special = beatmap.statistics().percent_special() as f64;

    if percent_special < 0.2 {
        7
    } else if percent_special < 0.3 || rounded_cs >= 5.0 {
        if rounded_od > 5.0 {
            7
        } else {
            6
        }
    } else if percent_special > 0.6 {
        if rounded_od > 4.0 {
            5
        } else {
            4
        }
    } else {
        (rounded_od + 1.0).clamp(4.0, 7.0) as usize
    }
}

/// Drain time in whole seconds between the first and last object, minus
/// breaks, falling back to [`FALLBACK_DRAIN_SECONDS`] when it truncates to
/// zero.
pub fn drain_seconds(beatmap: &Beatmap) -> i32 {
    let first = beatmap.objects.iter().map(|o| o.time).min().unwrap_or(0);
    let last = beatmap.objects.iter().map(|o| o.time).max().unwrap_or(0);
    let span = i64::from(last) - i64::from(first) - i64::from(beatmap.total_break_time);
    let seconds = (span / 1000).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    if seconds == 0 {
        FALLBACK_DRAIN_SECONDS
    } else {
        seconds
    }
}

/// Computes the conversion difficulty score.
pub fn conversion_difficulty(beatmap: &Beatmap, drain_seconds: i32) -> f64 {
    let d = &beatmap.difficulty;
    let ar = d.ar.clamp(4.0, 7.0);
    let base = (d.hp + ar) as f64 / 1.5;
    let note_rate = beatmap.objects.len() as f64 / drain_seconds as f64 * 9.0;
    let score = (base + note_rate) / 38.0 * 5.0 / 1.15;
    score.min(MAX_CONVERSION_DIFFICULTY)
}

/// Returns the first lane available to random placement.
pub fn random_start(lane_count: usize) -> usize {
    if lane_count == 8 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanecast_chart::{ConvertedNote, SourceObject};
    use pretty_assertions::assert_eq;

    fn difficulty(hp: f32, cs: f32, od: f32, ar: f32) -> Difficulty {
        Difficulty { hp, cs, od, ar }
    }

    /// Builds a 20-object beatmap with `special` hold spans.
    fn mixed(difficulty: Difficulty, special: usize) -> Beatmap {
        let objects = (0..20).map(|i| {
            let time = i as i32 * 500;
            if i < special {
                SourceObject::hold_span(time, time + 200, 256.0, 1)
            } else {
                SourceObject::tap(time, 256.0)
            }
        });
        Beatmap::builder(difficulty).objects(objects).build()
    }

    #[test]
    fn test_seed_formula() {
        // round(9) * 20 + trunc(206.0) + round(8) = 180 + 206 + 8
        assert_eq!(derive_seed(&difficulty(5.0, 4.0, 5.0, 8.0)), 394);
    }

    #[test]
    fn test_seed_rounds_half_to_even() {
        // 2.5 + 0 rounds to 2, ar 3.5 rounds to 4, 0 * 41.2 = 0
        assert_eq!(derive_seed(&difficulty(2.5, 0.0, 0.0, 3.5)), 44);
        // 1.5 rounds to 2
        assert_eq!(derive_seed(&difficulty(1.5, 0.0, 0.0, 0.5)), 40);
    }

    #[test]
    fn test_seed_truncates_od_product() {
        // 7.3 * 41.2 = 300.76
        assert_eq!(derive_seed(&difficulty(0.0, 0.0, 7.3, 0.0)), 300);
    }

    #[test]
    fn test_tap_heavy_resolves_to_seven() {
        // 3 of 20 objects are holds: 0.15
        let beatmap = mixed(difficulty(5.0, 4.0, 5.0, 8.0), 3);
        assert_eq!(target_lane_count(&beatmap), 7);
    }

    #[test]
    fn test_hold_heavy_low_od_resolves_to_four() {
        // 14 of 20: 0.7
        let beatmap = mixed(difficulty(5.0, 4.0, 3.0, 8.0), 14);
        assert_eq!(target_lane_count(&beatmap), 4);
    }

    #[test]
    fn test_hold_heavy_high_od_resolves_to_five() {
        let beatmap = mixed(difficulty(5.0, 4.0, 8.0, 8.0), 14);
        assert_eq!(target_lane_count(&beatmap), 5);
    }

    #[test]
    fn test_moderate_special_uses_od_and_cs() {
        // 5 of 20: 0.25
        assert_eq!(target_lane_count(&mixed(difficulty(5.0, 4.0, 6.0, 8.0), 5)), 7);
        assert_eq!(target_lane_count(&mixed(difficulty(5.0, 4.0, 5.0, 8.0), 5)), 6);

        // 8 of 20: 0.4, cs >= 5 takes the second branch
        assert_eq!(target_lane_count(&mixed(difficulty(5.0, 5.0, 3.0, 8.0), 8)), 6);
    }

    #[test]
    fn test_middle_band_clamps_od() {
        // 9 of 20: 0.45
        assert_eq!(target_lane_count(&mixed(difficulty(5.0, 3.0, 1.0, 8.0), 9)), 4);
        assert_eq!(target_lane_count(&mixed(difficulty(5.0, 3.0, 5.0, 8.0), 9)), 6);
        assert_eq!(target_lane_count(&mixed(difficulty(5.0, 3.0, 9.0, 8.0), 9)), 7);
    }

    #[test]
    fn test_multi_lane_uses_cs() {
        let beatmap = Beatmap::builder(difficulty(5.0, 6.0, 5.0, 5.0))
            .multi_lane(vec![ConvertedNote::tap(0, 0)], 6)
            .build();
        assert_eq!(target_lane_count(&beatmap), 6);

        let zero_cs = Beatmap::builder(difficulty(5.0, 0.0, 5.0, 5.0))
            .multi_lane(Vec::new(), 1)
            .build();
        assert_eq!(target_lane_count(&zero_cs), 1);
    }

    #[test]
    fn test_drain_fallback() {
        let beatmap = Beatmap::builder(Difficulty::default())
            .object(SourceObject::tap(0, 0.0))
            .object(SourceObject::tap(999, 0.0))
            .build();
        assert_eq!(drain_seconds(&beatmap), FALLBACK_DRAIN_SECONDS);

        let empty = Beatmap::builder(Difficulty::default()).build();
        assert_eq!(drain_seconds(&empty), FALLBACK_DRAIN_SECONDS);
    }

    #[test]
    fn test_drain_subtracts_breaks() {
        let beatmap = Beatmap::builder(Difficulty::default())
            .object(SourceObject::tap(0, 0.0))
            .object(SourceObject::tap(60_000, 0.0))
            .total_break_time(20_500)
            .build();
        assert_eq!(drain_seconds(&beatmap), 39);
    }

    #[test]
    fn test_conversion_difficulty_formula() {
        // 20 objects over 9.5 s truncates to 9 s
        let beatmap = mixed(difficulty(6.0, 4.0, 5.0, 9.0), 0);
        let drain = drain_seconds(&beatmap);
        assert_eq!(drain, 9);
        let expected = ((6.0 + 7.0) / 1.5 + 20.0 / 9.0 * 9.0) / 38.0 * 5.0 / 1.15;
        assert!((conversion_difficulty(&beatmap, drain) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_conversion_difficulty_is_capped() {
        let objects = (0..5000).map(|i| SourceObject::tap(i, 0.0));
        let beatmap = Beatmap::builder(difficulty(10.0, 4.0, 10.0, 10.0))
            .objects(objects)
            .build();
        let drain = drain_seconds(&beatmap);
        assert_eq!(
            conversion_difficulty(&beatmap, drain),
            MAX_CONVERSION_DIFFICULTY
        );
    }

    #[test]
    fn test_random_start() {
        assert_eq!(random_start(7), 0);
        assert_eq!(random_start(8), 1);
        assert_eq!(random_start(9), 0);
    }

    #[test]
    fn test_params_respect_fixed_target() {
        let beatmap = mixed(difficulty(5.0, 4.0, 5.0, 8.0), 3);
        let params = ConversionParams::derive(&beatmap, LaneTarget::Fixed(8));
        assert_eq!(params.lane_count, 8);
        assert!(!params.auto_lanes);
        assert_eq!(params.random_start, 1);
        assert_eq!(params.seed, 394);
    }

    #[test]
    fn test_lane_target_parsing() {
        assert_eq!("auto".parse::<LaneTarget>().unwrap(), LaneTarget::Auto);
        assert_eq!("AUTO".parse::<LaneTarget>().unwrap(), LaneTarget::Auto);
        assert_eq!("7".parse::<LaneTarget>().unwrap(), LaneTarget::Fixed(7));
        assert!("seven".parse::<LaneTarget>().is_err());
        assert!(LaneTarget::Fixed(11).validate().is_err());
        assert!(LaneTarget::Fixed(4).validate().is_ok());
    }

    #[test]
    fn test_options_json() {
        let options: ConvertOptions = serde_json::from_str(r#"{"lanes": {"fixed": 6}}"#).unwrap();
        assert_eq!(options, ConvertOptions::with_lanes(6));
        let options: ConvertOptions = serde_json::from_str(r#"{"lanes": "auto"}"#).unwrap();
        assert_eq!(options, ConvertOptions::auto());
        let options: ConvertOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.lanes, LaneTarget::Auto);
    }
}
