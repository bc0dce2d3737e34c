//! Beatmap validation.

use crate::beatmap::Beatmap;
use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::object::{ObjectKind, SourceObject, AXIS_WIDTH};

/// Smallest lane count accepted as an explicit conversion target.
pub const MIN_LANES: usize = 1;

/// Largest lane count accepted as an explicit conversion target.
pub const MAX_LANES: usize = 10;

/// Validates a beatmap before conversion.
///
/// Errors describe inputs the converter cannot process; warnings describe
/// inputs it repairs (unsorted objects are sorted, positions are clamped).
///
/// # Example
/// ```
/// use lanecast_chart::{Beatmap, Difficulty, SourceObject};
/// use lanecast_chart::validation::validate_beatmap;
///
/// let beatmap = Beatmap::builder(Difficulty::default())
///     .object(SourceObject::tap(0, 128.0))
///     .build();
/// assert!(validate_beatmap(&beatmap).is_ok());
/// ```
pub fn validate_beatmap(beatmap: &Beatmap) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_difficulty(beatmap, &mut result);
    validate_timing_points(beatmap, &mut result);
    validate_objects(beatmap, &mut result);

    if beatmap.objects.is_empty() && !beatmap.is_multi_lane() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::EmptyBeatmap,
            "beatmap has no objects; conversion yields an empty chart",
            "objects",
        ));
    }

    result
}

/// Validates an explicit lane count.
pub fn validate_lane_count(lanes: usize) -> Result<(), ValidationError> {
    if (MIN_LANES..=MAX_LANES).contains(&lanes) {
        Ok(())
    } else {
        Err(ValidationError::with_path(
            ErrorCode::LaneCountOutOfRange,
            format!(
                "lane count must be {}-{}, got {}",
                MIN_LANES, MAX_LANES, lanes
            ),
            "lanes",
        ))
    }
}

fn validate_difficulty(beatmap: &Beatmap, result: &mut ValidationResult) {
    let d = &beatmap.difficulty;
    for (name, value) in [("hp", d.hp), ("cs", d.cs), ("od", d.od), ("ar", d.ar)] {
        if !value.is_finite() {
            result.add_error(ValidationError::with_path(
                ErrorCode::NonFiniteValue,
                format!("difficulty value must be finite, got {}", value),
                format!("difficulty.{}", name),
            ));
        }
    }
}

fn validate_timing_points(beatmap: &Beatmap, result: &mut ValidationResult) {
    for (i, point) in beatmap.timing_points.iter().enumerate() {
        if point.tempo_defining && !(point.beat_length.is_finite() && point.beat_length > 0.0) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidBeatLength,
                format!(
                    "beat_length must be a positive number, got {}",
                    point.beat_length
                ),
                format!("timing_points[{}].beat_length", i),
            ));
        }
    }
}

fn validate_objects(beatmap: &Beatmap, result: &mut ValidationResult) {
    let mut unsorted_reported = false;

    for (i, obj) in beatmap.objects.iter().enumerate() {
        if !obj.position.is_finite() {
            result.add_error(ValidationError::with_path(
                ErrorCode::NonFiniteValue,
                format!("position must be finite, got {}", obj.position),
                format!("objects[{}].position", i),
            ));
        } else if !(0.0..=AXIS_WIDTH).contains(&obj.position) {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::PositionOutOfAxis,
                format!(
                    "position {} lies outside 0-{}; lane mapping clamps it",
                    obj.position, AXIS_WIDTH
                ),
                format!("objects[{}].position", i),
            ));
        }

        if obj.kind.has_end_time() && obj.end_time < obj.time {
            result.add_error(ValidationError::with_path(
                ErrorCode::EndBeforeStart,
                format!(
                    "{} ends at {} before it starts at {}",
                    obj.kind, obj.end_time, obj.time
                ),
                format!("objects[{}].end_time", i),
            ));
        }

        if obj.kind == ObjectKind::HoldSpan && obj.span_count == 0 {
            result.add_error(ValidationError::with_path(
                ErrorCode::ZeroSpanCount,
                "span_count must be at least 1",
                format!("objects[{}].span_count", i),
            ));
        }

        if obj.kind == ObjectKind::HoldSpan && obj.span_count > 0 && !segments_fit(obj) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidSegmentDuration,
                format!(
                    "{} segment(s) of {}ms do not fit between {} and {}",
                    obj.span_count, obj.segment_duration, obj.time, obj.end_time
                ),
                format!("objects[{}].segment_duration", i),
            ));
        }

        if !unsorted_reported && i > 0 && beatmap.objects[i - 1].time > obj.time {
            unsorted_reported = true;
            result.add_warning(ValidationWarning::with_path(
                WarningCode::UnsortedObjects,
                "objects are not in ascending time order; they will be sorted",
                format!("objects[{}].time", i),
            ));
        }
    }
}

/// True when every segment boundary lies within `[time, end_time]`.
fn segments_fit(obj: &SourceObject) -> bool {
    let last_node =
        i64::from(obj.time) + i64::from(obj.segment_duration) * i64::from(obj.span_count);
    obj.segment_duration >= 0 && last_node <= i64::from(obj.end_time)
}
