//! Hold span patterns.
//!
//! Hold spans branch on their repeat count and segment length. Short
//! segments become runs of taps (alternating, stair or interleaved), long
//! ones become one or more holds, optionally decorated with taps on every
//! segment boundary.

use lanecast_chart::{ConvertedNote, SoundFlags, SourceObject};
use serde::Serialize;

use crate::column::get_column;
use crate::pattern::{LaneGroup, NoteOdds, PatternContext, PatternFlags};
use crate::rng::XorShiftRng;

/// Total duration from which multi-segment spans become sparse holds.
const LONG_SPAN_DURATION: i32 = 4000;

/// Strategy chosen for a hold span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum HoldStrategy {
    /// Only one lane exists.
    SingleLane,
    /// `count` holds on random lanes, avoiding the previous group first.
    RandomHolds { count: usize },
    /// `count` taps, one per segment boundary, never repeating a lane.
    AlternatingTaps { count: usize },
    /// Taps walking across the lanes, bouncing at the edges.
    StairTaps,
    /// Pairs of taps a fixed interval apart on every boundary.
    InterleavedTaps,
    /// A random number of holds drawn from the given odds.
    ProbabilisticHolds { p2: f64, p3: f64, p4: f64 },
    /// Staggered holds sharing one end time.
    TiledHolds,
    /// One hold plus random taps on the segment boundaries.
    HoldWithTaps,
}

impl HoldStrategy {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            HoldStrategy::SingleLane => "single_lane",
            HoldStrategy::RandomHolds { .. } => "random_holds",
            HoldStrategy::AlternatingTaps { .. } => "alternating_taps",
            HoldStrategy::StairTaps => "stair_taps",
            HoldStrategy::InterleavedTaps => "interleaved_taps",
            HoldStrategy::ProbabilisticHolds { .. } => "probabilistic_holds",
            HoldStrategy::TiledHolds => "tiled_holds",
            HoldStrategy::HoldWithTaps => "hold_with_taps",
        }
    }
}

/// Result of converting one hold span.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldOutcome {
    /// Flags the strategy ran with.
    pub flags: PatternFlags,
    /// Strategy that produced `groups`.
    pub strategy: HoldStrategy,
    /// One group, or an intermediate group followed by the group of notes
    /// ending with the span. The last group is remembered by the driver.
    pub groups: Vec<LaneGroup>,
}

/// Times of every segment boundary of a hold span, start and end included.
pub fn node_times(obj: &SourceObject) -> impl Iterator<Item = i32> + '_ {
    (0..=obj.span_count).map(move |i| node_time(obj, i))
}

/// Time of boundary `index`, computed wide and saturated into `i32`.
fn node_time(obj: &SourceObject, index: u32) -> i32 {
    let time = i64::from(obj.time) + i64::from(obj.segment_duration) * i64::from(index);
    time.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Picks the strategy for a hold span. Consumes no randomness.
pub fn select(
    obj: &SourceObject,
    kiai: bool,
    previous: &LaneGroup,
    ctx: &PatternContext,
) -> (HoldStrategy, PatternFlags) {
    let mut flags = if kiai {
        PatternFlags::empty()
    } else {
        PatternFlags::LOW_PROBABILITY
    };

    if ctx.lane_count == 1 {
        return (HoldStrategy::SingleLane, flags);
    }

    let spans = obj.span_count as usize;
    let segment = obj.segment_duration;
    let difficulty = ctx.conversion_difficulty;

    if spans > 1 {
        let strategy = if segment <= 90 {
            HoldStrategy::RandomHolds { count: 1 }
        } else if segment <= 120 {
            flags |= PatternFlags::FORCE_NOT_STACK;
            HoldStrategy::AlternatingTaps { count: spans + 1 }
        } else if segment <= 160 {
            HoldStrategy::StairTaps
        } else if segment <= 200 && difficulty > 3.0 {
            HoldStrategy::InterleavedTaps
        } else if obj.duration() >= LONG_SPAN_DURATION {
            HoldStrategy::ProbabilisticHolds {
                p2: 0.23,
                p3: 0.0,
                p4: 0.0,
            }
        } else if segment > 400 && (spans as i64) < ctx.usable_lanes() - 1 {
            HoldStrategy::TiledHolds
        } else {
            HoldStrategy::HoldWithTaps
        };
        return (strategy, flags);
    }

    if segment <= 110 {
        if previous.distinct_lanes() < ctx.lane_count {
            flags |= PatternFlags::FORCE_NOT_STACK;
        } else {
            flags.remove(PatternFlags::FORCE_NOT_STACK);
        }
        let count = if segment < 80 { 1 } else { 2 };
        return (HoldStrategy::AlternatingTaps { count }, flags);
    }

    let low = flags.contains(PatternFlags::LOW_PROBABILITY);
    let (p2, p3, p4) = if difficulty > 6.5 {
        if low {
            (0.78, 0.3, 0.0)
        } else {
            (0.85, 0.36, 0.03)
        }
    } else if difficulty > 4.0 {
        if low {
            (0.43, 0.08, 0.0)
        } else {
            (0.56, 0.18, 0.0)
        }
    } else if difficulty > 2.5 {
        if low {
            (0.3, 0.0, 0.0)
        } else {
            (0.37, 0.08, 0.0)
        }
    } else if low {
        (0.17, 0.0, 0.0)
    } else {
        (0.27, 0.0, 0.0)
    };
    (HoldStrategy::ProbabilisticHolds { p2, p3, p4 }, flags)
}

/// Converts one hold span.
pub fn generate(
    obj: &SourceObject,
    kiai: bool,
    previous: &LaneGroup,
    rng: &mut XorShiftRng,
    ctx: &PatternContext,
) -> HoldOutcome {
    let (strategy, flags) = select(obj, kiai, previous, ctx);
    let span = Span {
        obj,
        flags,
        previous,
        ctx,
    };

    let group = match strategy {
        HoldStrategy::SingleLane => {
            let mut group = LaneGroup::new();
            group.push(ConvertedNote::spanning(0, obj.time, obj.end_time));
            group
        }
        HoldStrategy::RandomHolds { count } => span.random_holds(count, rng),
        HoldStrategy::AlternatingTaps { count } => span.alternating_taps(count, rng),
        HoldStrategy::StairTaps => span.stair_taps(rng),
        HoldStrategy::InterleavedTaps => span.interleaved_taps(rng),
        HoldStrategy::ProbabilisticHolds { p2, p3, p4 } => {
            span.probabilistic_holds(NoteOdds::new(p2, p3, p4, 0.0), rng)
        }
        HoldStrategy::TiledHolds => span.tiled_holds(rng),
        HoldStrategy::HoldWithTaps => span.hold_with_taps(rng),
    };

    let groups = if group.len() == 1 {
        vec![group]
    } else {
        let (intermediate, ending) = group.split_at_end(obj.end_time);
        vec![intermediate, ending]
    };

    HoldOutcome {
        flags,
        strategy,
        groups,
    }
}

/// Everything the sub-strategies share.
struct Span<'a> {
    obj: &'a SourceObject,
    flags: PatternFlags,
    previous: &'a LaneGroup,
    ctx: &'a PatternContext,
}

impl Span<'_> {
    fn lane_count(&self) -> usize {
        self.ctx.lane_count
    }

    fn position_lane(&self) -> usize {
        get_column(self.obj.position, self.lane_count(), true)
    }

    /// Moves `lane` off the previous group when stacking is forbidden and
    /// the previous group leaves room.
    fn unstacked(&self, lane: usize, rng: &mut XorShiftRng) -> usize {
        if self.flags.contains(PatternFlags::FORCE_NOT_STACK)
            && self.previous.distinct_lanes() < self.lane_count()
        {
            self.ctx.search().avoid(self.previous).find(lane, rng)
        } else {
            lane
        }
    }

    fn random_holds(&self, count: usize, rng: &mut XorShiftRng) -> LaneGroup {
        let obj = self.obj;
        let usable = self.ctx.usable_lanes() - self.previous.distinct_lanes() as i64;
        let count = count as i64;

        let mut group = LaneGroup::new();
        let mut lane = self.ctx.random_lane(rng);
        for _ in 0..usable.min(count).max(0) {
            lane = self
                .ctx
                .search()
                .avoid(&group)
                .avoid(self.previous)
                .find(lane, rng);
            group.push(ConvertedNote::spanning(lane, obj.time, obj.end_time));
        }
        for _ in 0..(count - usable).max(0) {
            lane = self.ctx.search().avoid(&group).find(lane, rng);
            group.push(ConvertedNote::spanning(lane, obj.time, obj.end_time));
        }
        group
    }

    fn alternating_taps(&self, count: usize, rng: &mut XorShiftRng) -> LaneGroup {
        let mut group = LaneGroup::new();
        let mut lane = self.unstacked(self.position_lane(), rng);
        let mut last = lane;
        let mut time = self.obj.time;
        for _ in 0..count {
            group.push(ConvertedNote::tap(lane, time));
            lane = self.ctx.search().forbid(last).find(lane, rng);
            last = lane;
            time = time.saturating_add(self.obj.segment_duration);
        }
        group
    }

    fn stair_taps(&self, rng: &mut XorShiftRng) -> LaneGroup {
        let lane_count = self.lane_count();
        let random_start = self.ctx.random_start;

        let mut group = LaneGroup::new();
        let mut lane = self.position_lane();
        let mut increasing = rng.next_double() > 0.5;
        let mut time = self.obj.time;
        for _ in 0..=self.obj.span_count {
            group.push(ConvertedNote::tap(lane, time));
            time = time.saturating_add(self.obj.segment_duration);

            if increasing {
                if lane + 1 >= lane_count {
                    increasing = false;
                    lane = lane.saturating_sub(1);
                } else {
                    lane += 1;
                }
            } else if lane <= random_start {
                increasing = true;
                lane += 1;
            } else {
                lane -= 1;
            }
        }
        group
    }

    fn interleaved_taps(&self, rng: &mut XorShiftRng) -> LaneGroup {
        let lane_count = self.lane_count() as i64;
        let random_start = self.ctx.random_start as i64;
        let legacy = i64::from((4..=8).contains(&lane_count));
        let interval = rng.next_range(1, (lane_count - legacy) as i32) as i64;

        let mut group = LaneGroup::new();
        let mut lane = self.position_lane() as i64;
        let mut time = self.obj.time;
        for _ in 0..=self.obj.span_count {
            group.push(ConvertedNote::tap(self.ctx.clamp_lane(lane), time));

            lane += interval;
            if lane >= lane_count - random_start {
                lane = lane - lane_count - random_start + legacy;
            }
            lane += random_start;

            // Two lanes would turn every boundary into a double.
            if lane_count > 2 {
                group.push(ConvertedNote::tap(self.ctx.clamp_lane(lane), time));
            }

            lane = self.ctx.random_lane(rng) as i64;
            time = time.saturating_add(self.obj.segment_duration);
        }
        group
    }

    fn probabilistic_holds(&self, odds: NoteOdds, rng: &mut XorShiftRng) -> LaneGroup {
        let NoteOdds {
            mut p2,
            mut p3,
            mut p4,
            ..
        } = odds;

        match self.lane_count() {
            2 => {
                p2 = 0.0;
                p3 = 0.0;
                p4 = 0.0;
            }
            3 => {
                p2 = p2.min(0.1);
                p3 = 0.0;
                p4 = 0.0;
            }
            4 => {
                p2 = p2.min(0.3);
                p3 = p3.min(0.04);
                p4 = 0.0;
            }
            5 => {
                p2 = p2.min(0.34);
                p3 = p3.min(0.1);
                p4 = p4.min(0.03);
            }
            _ => {}
        }

        let doubles = SoundFlags::CLAP | SoundFlags::FINISH;
        let accented = self.obj.sound_flags.intersects(doubles)
            || self.obj.sounds_at(self.obj.time).intersects(doubles);
        if !self.flags.contains(PatternFlags::LOW_PROBABILITY) && accented {
            p2 = 1.0;
        }

        let count = NoteOdds::new(p2, p3, p4, 0.0).draw(rng);
        self.random_holds(count, rng)
    }

    fn tiled_holds(&self, rng: &mut XorShiftRng) -> LaneGroup {
        let obj = self.obj;
        let repeat = (obj.span_count as usize).min(self.lane_count());
        let end_time = node_time(obj, obj.span_count);

        let mut group = LaneGroup::new();
        let mut lane = self.unstacked(self.position_lane(), rng);
        let mut time = obj.time;
        for _ in 0..repeat {
            lane = self.ctx.search().avoid(&group).find(lane, rng);
            group.push(ConvertedNote::spanning(lane, time, end_time));
            time = time.saturating_add(obj.segment_duration);
        }
        group
    }

    fn hold_with_taps(&self, rng: &mut XorShiftRng) -> LaneGroup {
        let obj = self.obj;
        let lane_count = self.lane_count();
        let difficulty = self.ctx.conversion_difficulty;

        let mut group = LaneGroup::new();
        let hold_lane = self.unstacked(self.position_lane(), rng);
        group.push(ConvertedNote::spanning(hold_lane, obj.time, obj.end_time));

        let mut lane = self.ctx.random_lane(rng);
        let tap_odds = |p2: f64| NoteOdds::new(p2, 0.0, 0.0, 0.0);
        let count = if difficulty > 6.5 {
            tap_odds(0.63).draw(rng)
        } else if difficulty > 4.0 {
            tap_odds(if lane_count < 6 { 0.12 } else { 0.45 }).draw(rng)
        } else if difficulty > 2.5 {
            tap_odds(if lane_count < 6 { 0.0 } else { 0.24 }).draw(rng)
        } else {
            0
        };
        let count = count.min(lane_count - 1);

        let accents = SoundFlags::WHISTLE | SoundFlags::FINISH | SoundFlags::CLAP;
        let ignore_head = !obj.sounds_at(obj.time).intersects(accents);

        let mut time = obj.time;
        for _ in 0..=obj.span_count {
            if !(ignore_head && time == obj.time) {
                let mut row = LaneGroup::new();
                for _ in 0..count {
                    lane = self
                        .ctx
                        .search()
                        .forbid(hold_lane)
                        .avoid(&row)
                        .find(lane, rng);
                    row.push(ConvertedNote::tap(lane, time));
                }
                group.extend(row);
            }
            time = time.saturating_add(obj.segment_duration);
        }
        group
    }
}

#[cfg(test)]
mod tests;
