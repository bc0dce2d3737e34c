//! Pattern generation.
//!
//! One module per source object kind. Each exposes a pure `select` step
//! that classifies the object into a strategy and a `generate` step that
//! runs the strategy against the rolling [`ConversionState`], returning the
//! lane groups to emit. The driver owns state updates.
//!
//! [`ConversionState`]: crate::state::ConversionState

pub mod hold;
pub mod spin;
pub mod tap;

use bitflags::bitflags;
use lanecast_chart::ConvertedNote;
use serde::Serialize;

use crate::column::ColumnSearch;
use crate::difficulty::ConversionParams;
use crate::rng::XorShiftRng;

bitflags! {
    /// Classification flags steering pattern selection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PatternFlags: u16 {
        /// Copy the previous group's lanes.
        const FORCE_STACK = 1 << 0;
        /// Keep new notes off the previous group's lanes.
        const FORCE_NOT_STACK = 1 << 1;
        /// Emit exactly one note.
        const KEEP_SINGLE = 1 << 2;
        /// Use the reduced multi-note probability table.
        const LOW_PROBABILITY = 1 << 3;
        /// Place notes sequentially instead of randomly.
        const GATHERED = 1 << 4;
        /// Emit a symmetric pattern.
        const MIRROR = 1 << 5;
        /// Mirror the previous group's lanes.
        const REVERSE = 1 << 6;
        /// Mirror a single previous lane.
        const CYCLE = 1 << 7;
        /// Walk one lane up from the previous lane.
        const STAIR = 1 << 8;
        /// Walk one lane down from the previous lane.
        const REVERSE_STAIR = 1 << 9;
    }
}

impl PatternFlags {
    /// Names of the set flags, for logs and reports.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

/// Direction of the stair walk, carried between tap points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StairDirection {
    /// Lanes increase.
    #[default]
    Up,
    /// Lanes decrease.
    Down,
}

impl StairDirection {
    /// The classification flag for this direction.
    pub fn flag(self) -> PatternFlags {
        match self {
            StairDirection::Up => PatternFlags::STAIR,
            StairDirection::Down => PatternFlags::REVERSE_STAIR,
        }
    }
}

/// Notes emitted together for one source object (or one part of it).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaneGroup {
    notes: Vec<ConvertedNote>,
}

impl LaneGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a group from notes.
    pub fn from_notes(notes: Vec<ConvertedNote>) -> Self {
        Self { notes }
    }

    /// Appends a note.
    pub fn push(&mut self, note: ConvertedNote) {
        self.notes.push(note);
    }

    /// Appends every note of `other`.
    pub fn extend(&mut self, other: LaneGroup) {
        self.notes.extend(other.notes);
    }

    /// Number of notes, counting repeats in the same lane.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// True when the group holds no notes.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes in emission order.
    pub fn notes(&self) -> &[ConvertedNote] {
        &self.notes
    }

    /// Returns true if any note sits in `lane`.
    pub fn has_lane(&self, lane: usize) -> bool {
        self.notes.iter().any(|n| n.lane == lane)
    }

    /// Number of distinct lanes used.
    pub fn distinct_lanes(&self) -> usize {
        let mut lanes: Vec<usize> = self.notes.iter().map(|n| n.lane).collect();
        lanes.sort_unstable();
        lanes.dedup();
        lanes.len()
    }

    /// Highest lane used.
    pub fn max_lane(&self) -> Option<usize> {
        self.notes.iter().map(|n| n.lane).max()
    }

    /// Splits the group into notes that end before `end_time` and notes
    /// that end at it.
    pub fn split_at_end(self, end_time: i32) -> (LaneGroup, LaneGroup) {
        let (ending, intermediate): (Vec<_>, Vec<_>) =
            self.notes.into_iter().partition(|n| n.end_time == end_time);
        (Self::from_notes(intermediate), Self::from_notes(ending))
    }
}

/// Parameters every strategy needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternContext {
    /// Output lane count.
    pub lane_count: usize,
    /// First lane open to random placement.
    pub random_start: usize,
    /// Score selecting the probability tier.
    pub conversion_difficulty: f64,
}

impl PatternContext {
    /// Creates a context from its parts.
    pub fn new(lane_count: usize, random_start: usize, conversion_difficulty: f64) -> Self {
        Self {
            lane_count,
            random_start,
            conversion_difficulty,
        }
    }

    /// Clamps a computed lane index into range.
    pub fn clamp_lane(&self, lane: i64) -> usize {
        lane.clamp(0, self.lane_count.saturating_sub(1) as i64) as usize
    }

    /// Draws a lane from `[random_start, lane_count)`.
    pub fn random_lane(&self, rng: &mut XorShiftRng) -> usize {
        rng.next_range(self.random_start as i32, self.lane_count as i32) as usize
    }

    /// Mirrors a lane across the random range.
    pub fn mirror(&self, lane: usize) -> usize {
        self.clamp_lane(self.random_start as i64 + self.lane_count as i64 - lane as i64 - 1)
    }

    /// A random search over the full range.
    pub fn search<'a>(&self) -> ColumnSearch<'a> {
        ColumnSearch::new(self.lane_count, self.random_start)
    }

    /// Number of lanes available to random placement.
    pub fn usable_lanes(&self) -> i64 {
        self.lane_count as i64 - self.random_start as i64
    }
}

impl From<&ConversionParams> for PatternContext {
    fn from(params: &ConversionParams) -> Self {
        Self::new(
            params.lane_count,
            params.random_start,
            params.conversion_difficulty,
        )
    }
}

/// Probabilities of producing at least 2, 3, 4 and 5 notes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NoteOdds {
    /// At least two notes.
    pub p2: f64,
    /// At least three notes.
    pub p3: f64,
    /// At least four notes.
    pub p4: f64,
    /// Five notes.
    pub p5: f64,
}

impl NoteOdds {
    /// Creates odds from the four thresholds.
    pub fn new(p2: f64, p3: f64, p4: f64, p5: f64) -> Self {
        Self { p2, p3, p4, p5 }
    }

    /// Clamps every probability to `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            p2: self.p2.clamp(0.0, 1.0),
            p3: self.p3.clamp(0.0, 1.0),
            p4: self.p4.clamp(0.0, 1.0),
            p5: self.p5.clamp(0.0, 1.0),
        }
    }

    /// Draws a note count with a single generator call.
    pub fn draw(self, rng: &mut XorShiftRng) -> usize {
        let odds = self.clamped();
        let value = rng.next_double();
        if value >= 1.0 - odds.p5 {
            5
        } else if value >= 1.0 - odds.p4 {
            4
        } else if value >= 1.0 - odds.p3 {
            3
        } else if value >= 1.0 - odds.p2 {
            2
        } else {
            1
        }
    }
}
