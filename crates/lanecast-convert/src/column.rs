//! Lane selection.
//!
//! Maps source positions onto lanes and resolves collisions: a candidate
//! lane that is already taken is replaced by a random (or, for gathered
//! patterns, sequential) search over the allowed range. When every lane in
//! the range is taken the candidate is returned unchanged and the note
//! stacks.

use lanecast_chart::AXIS_WIDTH;

use crate::pattern::LaneGroup;
use crate::rng::XorShiftRng;

/// Anything that can report whether a lane is occupied.
pub trait Occupancy {
    /// Returns true if `lane` is taken.
    fn is_occupied(&self, lane: usize) -> bool;
}

impl Occupancy for &[usize] {
    fn is_occupied(&self, lane: usize) -> bool {
        self.contains(&lane)
    }
}

impl<const N: usize> Occupancy for [usize; N] {
    fn is_occupied(&self, lane: usize) -> bool {
        self.contains(&lane)
    }
}

impl Occupancy for Vec<usize> {
    fn is_occupied(&self, lane: usize) -> bool {
        self.contains(&lane)
    }
}

impl Occupancy for LaneGroup {
    fn is_occupied(&self, lane: usize) -> bool {
        self.has_lane(lane)
    }
}

/// Maps a position on the playfield axis to a lane.
///
/// With `allow_special` in 8-lane mode the axis is split into 7 cells
/// mapped onto lanes 1-7, leaving lane 0 free for special notes.
pub fn get_column(position: f32, lane_count: usize, allow_special: bool) -> usize {
    if allow_special && lane_count == 8 {
        let divisor = AXIS_WIDTH / 7.0;
        return ((position / divisor).floor() as i32).clamp(0, 6) as usize + 1;
    }

    let divisor = AXIS_WIDTH / lane_count as f32;
    let max_lane = lane_count.saturating_sub(1) as i32;
    ((position / divisor).floor() as i32).clamp(0, max_lane) as usize
}

/// Finds a free lane near `candidate`.
///
/// Returns `candidate` if it is free (no draw consumed) or if every lane in
/// `[random_start, lane_count)` is taken. Otherwise draws lanes from that
/// range until one is free.
pub fn find_available_column(
    candidate: usize,
    lane_count: usize,
    used_lanes: &[usize],
    rng: &mut XorShiftRng,
    random_start: usize,
) -> usize {
    ColumnSearch::new(lane_count, random_start)
        .avoid(&used_lanes)
        .find(candidate, rng)
}

/// How a search proposes the next lane after a collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStep {
    /// Draw uniformly from `[lower, upper)`.
    Random,
    /// Move one lane right, wrapping to the first random lane.
    Sequential,
}

/// A configurable lane search.
///
/// Built per placement: the bounds default to `[random_start, lane_count)`,
/// occupied sets and a single forbidden lane can be layered on.
pub struct ColumnSearch<'a> {
    lane_count: usize,
    random_start: usize,
    lower: usize,
    upper: usize,
    avoided: Vec<&'a dyn Occupancy>,
    forbidden: Option<usize>,
    step: SearchStep,
}

impl<'a> ColumnSearch<'a> {
    /// Creates a random search over `[random_start, lane_count)`.
    pub fn new(lane_count: usize, random_start: usize) -> Self {
        Self {
            lane_count,
            random_start,
            lower: random_start,
            upper: lane_count,
            avoided: Vec::new(),
            forbidden: None,
            step: SearchStep::Random,
        }
    }

    /// Narrows the exclusive upper bound of the search.
    pub fn upper_bound(mut self, upper: usize) -> Self {
        self.upper = upper;
        self
    }

    /// Treats every lane in `lanes` as taken.
    pub fn avoid(mut self, lanes: &'a impl Occupancy) -> Self {
        self.avoided.push(lanes);
        self
    }

    /// Like [`avoid`](Self::avoid), but only when `condition` holds.
    pub fn avoid_if(self, condition: bool, lanes: &'a impl Occupancy) -> Self {
        if condition {
            self.avoid(lanes)
        } else {
            self
        }
    }

    /// Treats one specific lane as taken.
    pub fn forbid(mut self, lane: usize) -> Self {
        self.forbidden = Some(lane);
        self
    }

    /// Selects how the search advances after a collision.
    pub fn step(mut self, step: SearchStep) -> Self {
        self.step = step;
        self
    }

    fn is_free(&self, lane: usize) -> bool {
        self.forbidden != Some(lane) && !self.avoided.iter().any(|set| set.is_occupied(lane))
    }

    fn next(&self, lane: usize, rng: &mut XorShiftRng) -> usize {
        match self.step {
            SearchStep::Random => rng.next_range(self.lower as i32, self.upper as i32) as usize,
            SearchStep::Sequential => {
                let next = lane + 1;
                if next >= self.lane_count {
                    self.random_start
                } else {
                    next
                }
            }
        }
    }

    /// Resolves `candidate` to a free lane, or returns it unchanged when
    /// the search range is exhausted.
    pub fn find(&self, candidate: usize, rng: &mut XorShiftRng) -> usize {
        if self.is_free(candidate) {
            return candidate;
        }

        if !(self.lower..self.upper).any(|lane| self.is_free(lane)) {
            return candidate;
        }

        let mut lane = candidate;
        loop {
            lane = self.next(lane, rng);
            if self.is_free(lane) {
                return lane;
            }
        }
    }
}
