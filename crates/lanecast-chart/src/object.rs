//! Source objects and converted notes.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Width of the horizontal playfield axis that source positions live on.
pub const AXIS_WIDTH: f32 = 512.0;

/// Centre of the playfield axis, used as the position of spin objects.
pub const AXIS_CENTRE: f32 = 256.0;

/// Hit sounds attached to a source object.
///
/// Stored as the raw bit set so beatmaps round-trip through JSON as plain
/// integers (whistle = 2, finish = 4, clap = 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundFlags(u8);

bitflags! {
    impl SoundFlags: u8 {
        const WHISTLE = 1 << 1;
        const FINISH = 1 << 2;
        const CLAP = 1 << 3;
    }
}

impl SoundFlags {
    /// Returns true if the clap sound is present.
    pub fn has_clap(&self) -> bool {
        self.contains(SoundFlags::CLAP)
    }

    /// Returns true if the finish sound is present.
    pub fn has_finish(&self) -> bool {
        self.contains(SoundFlags::FINISH)
    }

    /// Returns true if the whistle sound is present.
    pub fn has_whistle(&self) -> bool {
        self.contains(SoundFlags::WHISTLE)
    }
}

/// The kind of a source object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Struck at a single instant.
    TapPoint,
    /// Sustained between `time` and `end_time`, possibly over repeated segments.
    HoldSpan,
    /// Continuous input that does not participate in lane stacking.
    SpinObject,
}

impl ObjectKind {
    /// Returns the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::TapPoint => "tap_point",
            ObjectKind::HoldSpan => "hold_span",
            ObjectKind::SpinObject => "spin_object",
        }
    }

    /// Returns true for kinds that carry a meaningful end time.
    pub fn has_end_time(&self) -> bool {
        matches!(self, ObjectKind::HoldSpan | ObjectKind::SpinObject)
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_span_count() -> u32 {
    1
}

/// An object of a single-column source beatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceObject {
    /// Start time in milliseconds.
    pub time: i32,

    /// End time in milliseconds (hold spans and spin objects only).
    #[serde(default)]
    pub end_time: i32,

    /// Position on the horizontal axis, nominally `0..=512`.
    pub position: f32,

    /// Object kind.
    pub kind: ObjectKind,

    /// Number of repeated segments (hold spans only).
    #[serde(default = "default_span_count")]
    pub span_count: u32,

    /// Duration of one segment in milliseconds (hold spans only).
    #[serde(default)]
    pub segment_duration: i32,

    /// Hit sounds of the object.
    #[serde(default)]
    pub sound_flags: SoundFlags,

    /// Hit sounds per segment boundary (hold spans only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_sounds: Vec<SoundFlags>,
}

impl SourceObject {
    /// Creates a tap point.
    pub fn tap(time: i32, position: f32) -> Self {
        Self {
            time,
            end_time: time,
            position,
            kind: ObjectKind::TapPoint,
            span_count: 1,
            segment_duration: 0,
            sound_flags: SoundFlags::empty(),
            node_sounds: Vec::new(),
        }
    }

    /// Creates a hold span; the segment duration is the integer share of
    /// the total duration per span.
    pub fn hold_span(time: i32, end_time: i32, position: f32, span_count: u32) -> Self {
        let segment_duration = if span_count == 0 {
            0
        } else {
            ((i64::from(end_time) - i64::from(time)) / i64::from(span_count)) as i32
        };
        Self {
            time,
            end_time,
            position,
            kind: ObjectKind::HoldSpan,
            span_count,
            segment_duration,
            sound_flags: SoundFlags::empty(),
            node_sounds: Vec::new(),
        }
    }

    /// Creates a spin object centred on the axis.
    pub fn spin(time: i32, end_time: i32) -> Self {
        Self {
            time,
            end_time,
            position: AXIS_CENTRE,
            kind: ObjectKind::SpinObject,
            span_count: 1,
            segment_duration: 0,
            sound_flags: SoundFlags::empty(),
            node_sounds: Vec::new(),
        }
    }

    /// Sets the object's hit sounds.
    pub fn with_sounds(mut self, sounds: SoundFlags) -> Self {
        self.sound_flags = sounds;
        self
    }

    /// Sets the per-node hit sounds of a hold span.
    pub fn with_node_sounds(mut self, sounds: Vec<SoundFlags>) -> Self {
        self.node_sounds = sounds;
        self
    }

    /// Returns the time the object ends, which is `time` for tap points.
    pub fn end_time(&self) -> i32 {
        if self.kind.has_end_time() {
            self.end_time
        } else {
            self.time
        }
    }

    /// Returns the duration in milliseconds (zero for tap points).
    pub fn duration(&self) -> i32 {
        self.end_time().saturating_sub(self.time)
    }

    /// Hit sounds in effect at `time` within a hold span.
    ///
    /// Resolves to the node whose index is the number of whole segments
    /// elapsed since the start, falling back to the object's own sounds.
    pub fn sounds_at(&self, time: i32) -> SoundFlags {
        let index = if self.segment_duration == 0 {
            0
        } else {
            time.saturating_sub(self.time) / self.segment_duration
        };
        usize::try_from(index)
            .ok()
            .and_then(|i| self.node_sounds.get(i))
            .copied()
            .unwrap_or(self.sound_flags)
    }
}

/// A lane-assigned note of a converted chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConvertedNote {
    /// Lane index, `0 <= lane < lane_count`.
    pub lane: usize,
    /// Start time in milliseconds.
    pub time: i32,
    /// Whether this note must be held.
    pub is_hold: bool,
    /// End time in milliseconds; equal to `time` for taps.
    pub end_time: i32,
}

impl ConvertedNote {
    /// Creates a tap note.
    pub fn tap(lane: usize, time: i32) -> Self {
        Self {
            lane,
            time,
            is_hold: false,
            end_time: time,
        }
    }

    /// Creates a hold note.
    pub fn hold(lane: usize, time: i32, end_time: i32) -> Self {
        Self {
            lane,
            time,
            is_hold: true,
            end_time,
        }
    }

    /// Creates a tap when `end_time == time`, a hold otherwise.
    pub fn spanning(lane: usize, time: i32, end_time: i32) -> Self {
        if end_time == time {
            Self::tap(lane, time)
        } else {
            Self::hold(lane, time, end_time)
        }
    }
}
