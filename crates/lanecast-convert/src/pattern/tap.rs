//! Tap point patterns.
//!
//! A tap point is first classified by its distance in time and position
//! from the previous note, which yields a set of [`PatternFlags`]. The
//! flags pick one [`TapStrategy`]; the strategy produces the lane group.

use lanecast_chart::{ConvertedNote, SourceObject};
use serde::Serialize;

use crate::column::{get_column, SearchStep};
use crate::pattern::{LaneGroup, NoteOdds, PatternContext, PatternFlags, StairDirection};
use crate::rng::XorShiftRng;
use crate::state::ConversionState;

/// Position separation under which two taps count as "in place".
const STACK_DISTANCE: f32 = 20.0;

/// Timing context of a tap point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapTiming {
    /// Beat length in effect at the tap.
    pub beat_length: f64,
    /// Whether the tap falls in a kiai section.
    pub kiai: bool,
}

/// Strategy chosen for a tap point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum TapStrategy {
    /// Only one lane exists.
    SingleLane,
    /// Mirror every lane of the previous group.
    Reverse,
    /// Mirror the single previous lane.
    Cycle,
    /// Repeat the previous group's lanes.
    ForceStack,
    /// One lane above the previous lane.
    Stair,
    /// One lane below the previous lane.
    ReverseStair,
    /// One note anywhere not yet used by this group.
    KeepSingle,
    /// Symmetric pairs with an optional centre note.
    Mirrored { centre: f64, p2: f64, p3: f64 },
    /// Randomly placed notes.
    Random { p2: f64, p3: f64, p4: f64, p5: f64 },
}

impl TapStrategy {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            TapStrategy::SingleLane => "single_lane",
            TapStrategy::Reverse => "reverse",
            TapStrategy::Cycle => "cycle",
            TapStrategy::ForceStack => "force_stack",
            TapStrategy::Stair => "stair",
            TapStrategy::ReverseStair => "reverse_stair",
            TapStrategy::KeepSingle => "keep_single",
            TapStrategy::Mirrored { .. } => "mirrored",
            TapStrategy::Random { .. } => "random",
        }
    }

    fn random(odds: NoteOdds) -> Self {
        TapStrategy::Random {
            p2: odds.p2,
            p3: odds.p3,
            p4: odds.p4,
            p5: odds.p5,
        }
    }
}

/// Result of converting one tap point.
#[derive(Debug, Clone, PartialEq)]
pub struct TapOutcome {
    /// Classification of the tap point.
    pub flags: PatternFlags,
    /// Strategy that produced `group`.
    pub strategy: TapStrategy,
    /// Emitted notes.
    pub group: LaneGroup,
    /// Stair direction to carry forward.
    pub stair: StairDirection,
}

/// Classifies a tap point against the previous note.
pub fn classify(
    obj: &SourceObject,
    state: &ConversionState,
    timing: TapTiming,
    lane_count: usize,
) -> PatternFlags {
    let time_sep = obj.time as f64 - state.last_time;
    let pos_sep = (obj.position - state.last_position).abs();
    let density = state.current_density();
    let dense_threshold = timing.beat_length / 2.5;

    let mut flags = if time_sep <= 80.0 {
        PatternFlags::FORCE_NOT_STACK | PatternFlags::KEEP_SINGLE
    } else if time_sep <= 95.0 {
        PatternFlags::FORCE_NOT_STACK | PatternFlags::KEEP_SINGLE | state.stair.flag()
    } else if time_sep <= 105.0 {
        PatternFlags::FORCE_NOT_STACK | PatternFlags::LOW_PROBABILITY
    } else if time_sep <= 125.0 {
        PatternFlags::FORCE_NOT_STACK
    } else if time_sep <= 135.0 && pos_sep < STACK_DISTANCE {
        PatternFlags::CYCLE | PatternFlags::KEEP_SINGLE
    } else if time_sep <= 150.0 && pos_sep < STACK_DISTANCE {
        PatternFlags::FORCE_STACK | PatternFlags::LOW_PROBABILITY
    } else if pos_sep < STACK_DISTANCE && density >= dense_threshold {
        PatternFlags::REVERSE | PatternFlags::LOW_PROBABILITY
    } else if density < dense_threshold || timing.kiai {
        PatternFlags::empty()
    } else {
        PatternFlags::LOW_PROBABILITY
    };

    if !flags.contains(PatternFlags::KEEP_SINGLE) {
        if obj.sound_flags.has_finish() && lane_count != 8 {
            flags |= PatternFlags::MIRROR;
        } else if obj.sound_flags.has_clap() {
            flags |= PatternFlags::GATHERED;
        }
    }

    flags
}

/// Picks the strategy for a classified tap point. Consumes no randomness.
pub fn select(flags: PatternFlags, state: &ConversionState, ctx: &PatternContext) -> TapStrategy {
    let lane_count = ctx.lane_count;
    let previous = &state.previous;
    let last = state.last_lane;

    if lane_count == 1 {
        return TapStrategy::SingleLane;
    }

    if flags.contains(PatternFlags::REVERSE) && !previous.is_empty() {
        return TapStrategy::Reverse;
    }

    if flags.contains(PatternFlags::CYCLE)
        && previous.len() == 1
        && (lane_count != 8 || last != 0)
        && (lane_count % 2 == 0 || last != lane_count / 2)
    {
        return TapStrategy::Cycle;
    }

    if flags.contains(PatternFlags::FORCE_STACK) && !previous.is_empty() {
        return TapStrategy::ForceStack;
    }

    if previous.len() == 1 {
        if flags.contains(PatternFlags::STAIR) {
            return TapStrategy::Stair;
        }
        if flags.contains(PatternFlags::REVERSE_STAIR) {
            return TapStrategy::ReverseStair;
        }
    }

    if flags.contains(PatternFlags::KEEP_SINGLE) {
        return TapStrategy::KeepSingle;
    }

    let difficulty = ctx.conversion_difficulty;

    if flags.contains(PatternFlags::MIRROR) {
        let (centre, p2, p3) = if difficulty > 6.5 {
            (0.12, 0.38, 0.12)
        } else if difficulty > 4.0 {
            (0.12, 0.17, 0.0)
        } else {
            (0.12, 0.0, 0.0)
        };

        if flags.contains(PatternFlags::FORCE_NOT_STACK) {
            return TapStrategy::random(NoteOdds::new(
                0.5 + p2 / 2.0,
                p2,
                (p2 + p3) / 2.0,
                p3,
            ));
        }
        return TapStrategy::Mirrored { centre, p2, p3 };
    }

    let low = flags.contains(PatternFlags::LOW_PROBABILITY);
    let odds = if difficulty > 6.5 {
        if low {
            NoteOdds::new(0.78, 0.42, 0.0, 0.0)
        } else {
            NoteOdds::new(1.0, 0.62, 0.0, 0.0)
        }
    } else if difficulty > 4.0 {
        if low {
            NoteOdds::new(0.35, 0.08, 0.0, 0.0)
        } else {
            NoteOdds::new(0.52, 0.15, 0.0, 0.0)
        }
    } else if difficulty > 2.0 {
        if low {
            NoteOdds::new(0.18, 0.0, 0.0, 0.0)
        } else {
            NoteOdds::new(0.45, 0.0, 0.0, 0.0)
        }
    } else {
        NoteOdds::default()
    };
    TapStrategy::random(odds)
}

/// Converts one tap point.
pub fn generate(
    obj: &SourceObject,
    state: &ConversionState,
    timing: TapTiming,
    rng: &mut XorShiftRng,
    ctx: &PatternContext,
) -> TapOutcome {
    let flags = classify(obj, state, timing, ctx.lane_count);
    let strategy = select(flags, state, ctx);
    let mut stair = state.stair;
    let time = obj.time;
    let mut group = LaneGroup::new();

    match strategy {
        TapStrategy::SingleLane => group.push(ConvertedNote::tap(0, time)),
        TapStrategy::Reverse => {
            for lane in ctx.random_start..ctx.lane_count {
                if state.previous.has_lane(lane) {
                    group.push(ConvertedNote::tap(ctx.mirror(lane), time));
                }
            }
        }
        TapStrategy::Cycle => {
            group.push(ConvertedNote::tap(ctx.mirror(state.last_lane), time));
        }
        TapStrategy::ForceStack => {
            for lane in ctx.random_start..ctx.lane_count {
                if state.previous.has_lane(lane) {
                    group.push(ConvertedNote::tap(lane, time));
                }
            }
        }
        TapStrategy::Stair => {
            let mut lane = state.last_lane + 1;
            if lane >= ctx.lane_count {
                lane = ctx.random_start;
            }
            group.push(ConvertedNote::tap(lane, time));
        }
        TapStrategy::ReverseStair => {
            let lane = if state.last_lane <= ctx.random_start {
                ctx.lane_count - 1
            } else {
                state.last_lane - 1
            };
            group.push(ConvertedNote::tap(lane, time));
        }
        TapStrategy::KeepSingle => {
            group = random_notes(obj, flags, 1, true, state, rng, ctx);
        }
        TapStrategy::Mirrored { centre, p2, p3 } => {
            group = mirrored_notes(obj, centre, p2, p3, rng, ctx);
        }
        TapStrategy::Random { p2, p3, p4, p5 } => {
            let count = capped_odds(obj, NoteOdds::new(p2, p3, p4, p5), ctx.lane_count).draw(rng);
            group = random_notes(obj, flags, count, false, state, rng, ctx);
            if ctx.random_start > 0 && has_special_sound(obj) {
                group.push(ConvertedNote::tap(0, time));
            }
        }
    }

    // The walk turns around once it reaches either end of the random range.
    if flags.contains(PatternFlags::STAIR) && group.has_lane(ctx.lane_count - 1) {
        stair = StairDirection::Down;
    }
    if flags.contains(PatternFlags::REVERSE_STAIR) && group.has_lane(ctx.random_start) {
        stair = StairDirection::Up;
    }

    TapOutcome {
        flags,
        strategy,
        group,
        stair,
    }
}

/// Taps carrying both clap and finish earn the special lane in 8-lane mode.
fn has_special_sound(obj: &SourceObject) -> bool {
    obj.sound_flags.has_clap() && obj.sound_flags.has_finish()
}

/// Applies the per-lane-count caps and the clap override.
fn capped_odds(obj: &SourceObject, odds: NoteOdds, lane_count: usize) -> NoteOdds {
    let NoteOdds {
        mut p2,
        mut p3,
        mut p4,
        mut p5,
    } = odds;

    match lane_count {
        2 => {
            p2 = 0.0;
            p3 = 0.0;
            p4 = 0.0;
            p5 = 0.0;
        }
        3 => {
            p2 = p2.min(0.1);
            p3 = 0.0;
            p4 = 0.0;
            p5 = 0.0;
        }
        4 => {
            p2 = p2.min(0.23);
            p3 = p3.min(0.04);
            p4 = 0.0;
            p5 = 0.0;
        }
        5 => {
            p3 = p3.min(0.15);
            p4 = p4.min(0.03);
            p5 = 0.0;
        }
        _ => {}
    }

    if obj.sound_flags.has_clap() {
        p2 = 1.0;
    }

    NoteOdds::new(p2, p3, p4, p5)
}

/// Places `count` notes starting from the tap's position lane.
///
/// Under FORCE_NOT_STACK (and unless `single` is set) the previous group's
/// lanes are excluded and the count is limited to the lanes left over.
fn random_notes(
    obj: &SourceObject,
    flags: PatternFlags,
    count: usize,
    single: bool,
    state: &ConversionState,
    rng: &mut XorShiftRng,
    ctx: &PatternContext,
) -> LaneGroup {
    let avoid_previous = !single && flags.contains(PatternFlags::FORCE_NOT_STACK);
    let count = if avoid_previous {
        let free = ctx.usable_lanes() - state.previous.distinct_lanes() as i64;
        (count as i64).min(free).max(0) as usize
    } else {
        count
    };
    let step = if flags.contains(PatternFlags::GATHERED) {
        SearchStep::Sequential
    } else {
        SearchStep::Random
    };

    let mut group = LaneGroup::new();
    let mut lane = get_column(obj.position, ctx.lane_count, true);
    for _ in 0..count {
        lane = ctx
            .search()
            .avoid(&group)
            .avoid_if(avoid_previous, &state.previous)
            .step(step)
            .find(lane, rng);
        group.push(ConvertedNote::tap(lane, obj.time));
    }
    group
}

/// Places symmetric pairs on either side of the centre.
fn mirrored_notes(
    obj: &SourceObject,
    centre: f64,
    p2: f64,
    p3: f64,
    rng: &mut XorShiftRng,
    ctx: &PatternContext,
) -> LaneGroup {
    let lane_count = ctx.lane_count;
    let (mut centre, mut p2, mut p3) = (centre, p2, p3);
    match lane_count {
        2 => {
            centre = 0.0;
            p2 = 0.0;
            p3 = 0.0;
        }
        3 => {
            centre = centre.min(0.03);
            p2 = 0.0;
            p3 = 0.0;
        }
        4 => {
            centre = 0.0;
            p2 = 1.0 - ((1.0 - p2) * 2.0).max(0.8);
            p3 = 0.0;
        }
        5 => {
            centre = centre.min(0.03);
            p3 = 0.0;
        }
        6 => {
            centre = 0.0;
            p2 = 1.0 - ((1.0 - p2) * 2.0).max(0.5);
            p3 = 1.0 - ((1.0 - p3) * 2.0).max(0.85);
        }
        _ => {}
    }

    let centre_value = rng.next_double();
    let count = NoteOdds::new(p2, p3, 0.0, 0.0).draw(rng);
    let add_centre = lane_count % 2 != 0 && count != 3 && centre_value > 1.0 - centre;

    let limit = (if lane_count % 2 == 0 {
        lane_count
    } else {
        lane_count - 1
    }) / 2;

    let mut group = LaneGroup::new();
    let mut lane = rng.next_range(ctx.random_start as i32, limit as i32).max(0) as usize;
    for _ in 0..count {
        lane = ctx.search().upper_bound(limit).avoid(&group).find(lane, rng);
        group.push(ConvertedNote::tap(lane, obj.time));
        group.push(ConvertedNote::tap(ctx.mirror(lane), obj.time));
    }

    if add_centre {
        group.push(ConvertedNote::tap(lane_count / 2, obj.time));
    }

    if ctx.random_start > 0 && has_special_sound(obj) {
        group.push(ConvertedNote::tap(0, obj.time));
    }

    group
}

#[cfg(test)]
mod tests;
