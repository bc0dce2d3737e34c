//! The beatmap aggregate handed to and returned from conversion.

use serde::{Deserialize, Serialize};

use crate::object::{ConvertedNote, ObjectKind, SourceObject};
use crate::timing::TimingPoint;

/// Difficulty settings of the source beatmap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Drain rate.
    pub hp: f32,
    /// Circle size; the lane count for beatmaps that are already multi-lane.
    pub cs: f32,
    /// Overall difficulty.
    pub od: f32,
    /// Approach rate.
    pub ar: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            hp: 5.0,
            cs: 5.0,
            od: 5.0,
            ar: 5.0,
        }
    }
}

/// Lane layout of a beatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneMode {
    /// Single-column source layout (objects positioned on an axis).
    #[default]
    SingleColumn,
    /// Multi-lane layout; the beatmap holds converted notes.
    MultiLane,
}

impl LaneMode {
    /// Returns the mode as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            LaneMode::SingleColumn => "single_column",
            LaneMode::MultiLane => "multi_lane",
        }
    }
}

impl std::fmt::Display for LaneMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A beatmap, either a single-column source or a converted multi-lane chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beatmap {
    /// Current lane layout.
    #[serde(default)]
    pub mode: LaneMode,

    /// Difficulty settings.
    pub difficulty: Difficulty,

    /// Timing points, ordered by time.
    #[serde(default)]
    pub timing_points: Vec<TimingPoint>,

    /// Total duration of break sections in milliseconds.
    #[serde(default)]
    pub total_break_time: i32,

    /// Source objects (single-column layout).
    #[serde(default)]
    pub objects: Vec<SourceObject>,

    /// Converted notes (multi-lane layout).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<ConvertedNote>,

    /// Lane count of a multi-lane beatmap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lane_count: Option<usize>,
}

/// Aggregate object statistics of a source beatmap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeatmapStatistics {
    /// Number of tap points.
    pub tap_points: usize,
    /// Number of hold spans.
    pub hold_spans: usize,
    /// Number of spin objects.
    pub spin_objects: usize,
    /// Start time of the earliest object.
    pub first_time: Option<i32>,
    /// End time of the latest object.
    pub last_time: Option<i32>,
}

impl BeatmapStatistics {
    /// Total number of source objects.
    pub fn total(&self) -> usize {
        self.tap_points + self.hold_spans + self.spin_objects
    }

    /// Number of objects with an end time (hold spans and spin objects).
    pub fn end_time_objects(&self) -> usize {
        self.hold_spans + self.spin_objects
    }

    /// Fraction of objects that have an end time; zero for an empty map.
    pub fn percent_special(&self) -> f32 {
        if self.total() == 0 {
            0.0
        } else {
            self.end_time_objects() as f32 / self.total() as f32
        }
    }
}

impl Beatmap {
    /// Creates a new beatmap builder.
    pub fn builder(difficulty: Difficulty) -> BeatmapBuilder {
        BeatmapBuilder::new(difficulty)
    }

    /// Parses a beatmap from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the beatmap to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the beatmap to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Returns true if the beatmap is already laid out in lanes.
    pub fn is_multi_lane(&self) -> bool {
        self.mode == LaneMode::MultiLane
    }

    /// Number of hold spans and spin objects.
    pub fn end_time_object_count(&self) -> usize {
        self.objects.iter().filter(|o| o.kind.has_end_time()).count()
    }

    /// Computes object statistics. First and last times follow list order.
    pub fn statistics(&self) -> BeatmapStatistics {
        let count = |kind: ObjectKind| self.objects.iter().filter(|o| o.kind == kind).count();
        BeatmapStatistics {
            tap_points: count(ObjectKind::TapPoint),
            hold_spans: count(ObjectKind::HoldSpan),
            spin_objects: count(ObjectKind::SpinObject),
            first_time: self.objects.first().map(|o| o.time),
            last_time: self.objects.last().map(|o| o.time),
        }
    }

    /// Replaces the working object list with converted notes and switches
    /// the beatmap to the multi-lane layout.
    pub fn replace_with_notes(&mut self, notes: Vec<ConvertedNote>, lane_count: usize) {
        self.objects.clear();
        self.notes = notes;
        self.mode = LaneMode::MultiLane;
        self.lane_count = Some(lane_count);
    }
}

/// Builder for constructing beatmaps in code.
#[derive(Debug, Clone)]
pub struct BeatmapBuilder {
    beatmap: Beatmap,
}

impl BeatmapBuilder {
    /// Creates a new builder for a single-column beatmap.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            beatmap: Beatmap {
                mode: LaneMode::SingleColumn,
                difficulty,
                timing_points: Vec::new(),
                total_break_time: 0,
                objects: Vec::new(),
                notes: Vec::new(),
                lane_count: None,
            },
        }
    }

    /// Adds a timing point.
    pub fn timing_point(mut self, point: TimingPoint) -> Self {
        self.beatmap.timing_points.push(point);
        self
    }

    /// Adds a source object.
    pub fn object(mut self, object: SourceObject) -> Self {
        self.beatmap.objects.push(object);
        self
    }

    /// Adds several source objects.
    pub fn objects(mut self, objects: impl IntoIterator<Item = SourceObject>) -> Self {
        self.beatmap.objects.extend(objects);
        self
    }

    /// Sets the total break time.
    pub fn total_break_time(mut self, millis: i32) -> Self {
        self.beatmap.total_break_time = millis;
        self
    }

    /// Marks the beatmap as already multi-lane.
    pub fn multi_lane(mut self, notes: Vec<ConvertedNote>, lane_count: usize) -> Self {
        self.beatmap.mode = LaneMode::MultiLane;
        self.beatmap.notes = notes;
        self.beatmap.lane_count = Some(lane_count);
        self
    }

    /// Builds the beatmap.
    pub fn build(self) -> Beatmap {
        self.beatmap
    }
}
