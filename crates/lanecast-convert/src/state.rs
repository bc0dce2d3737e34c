//! Rolling state threaded through the conversion loop.

use std::collections::VecDeque;

use lanecast_chart::AXIS_CENTRE;

use crate::pattern::{LaneGroup, StairDirection};

/// Number of recent note times averaged into the density.
pub const DENSITY_WINDOW: usize = 7;

/// Bounded window of recent note times.
///
/// The density is the mean spacing across the window, `+inf` until two
/// times have been recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityWindow {
    times: VecDeque<f64>,
    density: f64,
}

impl Default for DensityWindow {
    fn default() -> Self {
        Self {
            times: VecDeque::with_capacity(DENSITY_WINDOW + 1),
            density: f64::INFINITY,
        }
    }
}

impl DensityWindow {
    /// Records a note time and recomputes the density.
    pub fn record(&mut self, time: f64) {
        self.times.push_back(time);
        if self.times.len() > DENSITY_WINDOW {
            self.times.pop_front();
        }

        if let (Some(front), Some(back)) = (self.times.front(), self.times.back()) {
            if self.times.len() >= 2 {
                self.density = (back - front) / self.times.len() as f64;
            }
        }
    }

    /// Current density.
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Number of recorded times, at most [`DENSITY_WINDOW`].
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True before any time has been recorded.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// State carried from one source object to the next.
///
/// Updated only through the consuming `with_*` methods so each step of the
/// driver produces a new value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversionState {
    /// Lanes of the most recent remembered group.
    pub previous: LaneGroup,
    /// Highest lane of `previous`.
    pub last_lane: usize,
    /// Current stair walk direction.
    pub stair: StairDirection,
    /// Recent note times.
    pub density: DensityWindow,
    /// Time of the most recently recorded note.
    pub last_time: f64,
    /// Axis position of the most recently recorded note.
    pub last_position: f32,
}

impl ConversionState {
    /// Fresh state for a conversion run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current density.
    pub fn current_density(&self) -> f64 {
        self.density.density()
    }

    /// Records a density sample.
    pub fn with_density_sample(mut self, time: f64) -> Self {
        self.density.record(time);
        self
    }

    /// Records the time and position of the latest note.
    pub fn with_note(mut self, time: f64, position: f32) -> Self {
        self.last_time = time;
        self.last_position = position;
        self
    }

    /// Records a spin object: its end time at the axis centre, plus a
    /// density sample.
    pub fn with_spin(self, end_time: f64) -> Self {
        self.with_note(end_time, AXIS_CENTRE)
            .with_density_sample(end_time)
    }

    /// Remembers `group` as the previous group.
    pub fn with_group(mut self, group: LaneGroup) -> Self {
        self.last_lane = group.max_lane().unwrap_or(0);
        self.previous = group;
        self
    }

    /// Sets the stair direction.
    pub fn with_stair(mut self, stair: StairDirection) -> Self {
        self.stair = stair;
        self
    }
}
