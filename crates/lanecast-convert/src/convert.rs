//! The conversion driver.
//!
//! Walks source objects in time order, threads [`ConversionState`] from one
//! object to the next, dispatches each object to its pattern module and
//! collects the emitted notes. The output is stably sorted by time.

use lanecast_chart::{
    beat_length_at, kiai_at, validate_beatmap, Beatmap, ConvertedNote, ObjectKind, SourceObject,
    TimingPoint,
};
use serde::Serialize;

use crate::difficulty::{derive_seed, target_lane_count, ConversionParams, ConvertOptions};
use crate::error::{ConvertError, ConvertResult};
use crate::observer::{ConversionObserver, NoopObserver};
use crate::pattern::tap::TapTiming;
use crate::pattern::{hold, spin, tap, LaneGroup, PatternContext};
use crate::rng::{create_rng, XorShiftRng};
use crate::state::ConversionState;

/// Outcome of a successful [`convert`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionSummary {
    /// Generator seed of the run.
    pub seed: i32,
    /// Lane count of the output chart.
    pub lane_count: usize,
    /// Whether the lane count was derived from the beatmap.
    pub auto_lanes: bool,
    /// Score biasing how many simultaneous notes were produced.
    pub conversion_difficulty: f64,
    /// First lane open to random placement.
    pub random_start: usize,
    /// Number of source objects consumed.
    pub source_objects: usize,
    /// Number of notes emitted.
    pub note_count: usize,
    /// Number of emitted notes that are holds.
    pub hold_count: usize,
    /// True when the beatmap was already multi-lane and left untouched.
    pub passthrough: bool,
}

impl ConversionSummary {
    fn converted(params: &ConversionParams, source_objects: usize, notes: &[ConvertedNote]) -> Self {
        Self {
            seed: params.seed,
            lane_count: params.lane_count,
            auto_lanes: params.auto_lanes,
            conversion_difficulty: params.conversion_difficulty,
            random_start: params.random_start,
            source_objects,
            note_count: notes.len(),
            hold_count: notes.iter().filter(|n| n.is_hold).count(),
            passthrough: false,
        }
    }

    fn passthrough(beatmap: &Beatmap) -> Self {
        let lane_count = beatmap
            .lane_count
            .unwrap_or_else(|| target_lane_count(beatmap));
        Self {
            seed: derive_seed(&beatmap.difficulty),
            lane_count,
            auto_lanes: false,
            conversion_difficulty: 0.0,
            random_start: 0,
            source_objects: 0,
            note_count: beatmap.notes.len(),
            hold_count: beatmap.notes.iter().filter(|n| n.is_hold).count(),
            passthrough: true,
        }
    }
}

/// Converts a single-column beatmap in place.
///
/// On success the beatmap's objects are replaced by lane-assigned notes and
/// it is switched to the multi-lane layout. A beatmap that is already
/// multi-lane is returned untouched.
///
/// # Errors
/// * [`ConvertError::InvalidLaneTarget`] for an explicit lane count outside 1-10
/// * [`ConvertError::InvalidBeatmap`] when validation reports errors
///
/// # Example
/// ```
/// use lanecast_chart::{Beatmap, Difficulty, SourceObject};
/// use lanecast_convert::{convert, ConvertOptions};
///
/// let mut beatmap = Beatmap::builder(Difficulty::default())
///     .object(SourceObject::tap(0, 64.0))
///     .object(SourceObject::tap(500, 320.0))
///     .build();
///
/// let summary = convert(&mut beatmap, &ConvertOptions::with_lanes(4)).unwrap();
/// assert_eq!(summary.lane_count, 4);
/// assert!(beatmap.is_multi_lane());
/// assert!(beatmap.notes.iter().all(|n| n.lane < 4));
/// ```
pub fn convert(beatmap: &mut Beatmap, options: &ConvertOptions) -> ConvertResult<ConversionSummary> {
    convert_with_observer(beatmap, options, &mut NoopObserver)
}

/// Like [`convert`], reporting decisions to `observer`.
pub fn convert_with_observer(
    beatmap: &mut Beatmap,
    options: &ConvertOptions,
    observer: &mut dyn ConversionObserver,
) -> ConvertResult<ConversionSummary> {
    if beatmap.is_multi_lane() {
        let summary = ConversionSummary::passthrough(beatmap);
        observer.on_finish(&summary);
        return Ok(summary);
    }

    options
        .lanes
        .validate()
        .map_err(ConvertError::InvalidLaneTarget)?;

    let validation = validate_beatmap(beatmap);
    if !validation.is_ok() {
        return Err(ConvertError::InvalidBeatmap {
            errors: validation.errors,
        });
    }

    let params = ConversionParams::derive(beatmap, options.lanes);
    observer.on_start(&params);

    let notes = generate_notes(beatmap, &params, observer);
    let summary = ConversionSummary::converted(&params, beatmap.objects.len(), &notes);
    beatmap.replace_with_notes(notes, params.lane_count);

    observer.on_finish(&summary);
    Ok(summary)
}

/// Runs the conversion loop with fixed parameters and returns the notes,
/// sorted by time. Does not validate or modify the beatmap.
pub fn generate_notes(
    beatmap: &Beatmap,
    params: &ConversionParams,
    observer: &mut dyn ConversionObserver,
) -> Vec<ConvertedNote> {
    let mut objects: Vec<&SourceObject> = beatmap.objects.iter().collect();
    objects.sort_by_key(|o| o.time);

    let mut driver = Driver {
        ctx: PatternContext::from(params),
        rng: create_rng(params.seed),
        timing_points: &beatmap.timing_points,
        observer,
        notes: Vec::with_capacity(beatmap.objects.len()),
    };

    let mut state = ConversionState::new();
    for obj in objects {
        state = match obj.kind {
            ObjectKind::TapPoint => driver.tap(obj, state),
            ObjectKind::HoldSpan => driver.hold(obj, state),
            ObjectKind::SpinObject => driver.spin(obj, state),
        };
    }

    let mut notes = driver.notes;
    notes.sort_by_key(|n| n.time);
    notes
}

struct Driver<'a> {
    ctx: PatternContext,
    rng: XorShiftRng,
    timing_points: &'a [TimingPoint],
    observer: &'a mut dyn ConversionObserver,
    notes: Vec<ConvertedNote>,
}

impl Driver<'_> {
    fn tap(&mut self, obj: &SourceObject, state: ConversionState) -> ConversionState {
        let time = obj.time as f64;
        let state = state.with_density_sample(time);
        let timing = TapTiming {
            beat_length: beat_length_at(self.timing_points, time),
            kiai: kiai_at(self.timing_points, time),
        };

        let outcome = tap::generate(obj, &state, timing, &mut self.rng, &self.ctx);
        self.observer.on_tap(obj, outcome.flags, &outcome.strategy);
        self.emit(ObjectKind::TapPoint, &outcome.group);

        state
            .with_note(time, obj.position)
            .with_stair(outcome.stair)
            .with_group(outcome.group)
    }

    fn hold(&mut self, obj: &SourceObject, state: ConversionState) -> ConversionState {
        let mut state = state;
        for time in hold::node_times(obj) {
            let time = time as f64;
            state = state.with_density_sample(time).with_note(time, obj.position);
        }

        let kiai = kiai_at(self.timing_points, obj.time as f64);
        let outcome = hold::generate(obj, kiai, &state.previous, &mut self.rng, &self.ctx);
        self.observer.on_hold(obj, outcome.flags, &outcome.strategy);

        for group in outcome.groups {
            self.emit(ObjectKind::HoldSpan, &group);
            state = state.with_group(group);
        }
        state
    }

    /// Spins leave the previous group untouched.
    fn spin(&mut self, obj: &SourceObject, state: ConversionState) -> ConversionState {
        let group = spin::generate(obj, &state.previous, &mut self.rng, &self.ctx);
        self.emit(ObjectKind::SpinObject, &group);
        state.with_spin(obj.end_time as f64)
    }

    fn emit(&mut self, kind: ObjectKind, group: &LaneGroup) {
        self.observer.on_group(kind, group);
        let ctx = self.ctx;
        self.notes.extend(group.notes().iter().map(|n| ConvertedNote {
            lane: ctx.clamp_lane(n.lane as i64),
            ..*n
        }));
    }
}
