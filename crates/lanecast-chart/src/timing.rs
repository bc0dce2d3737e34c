//! Timing points and "most recent point" lookups.

use serde::{Deserialize, Serialize};

/// Beat length used when no tempo-defining point precedes a query time
/// (120 BPM).
pub const DEFAULT_BEAT_LENGTH: f64 = 500.0;

fn default_tempo_defining() -> bool {
    true
}

/// A timing point of the source beatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingPoint {
    /// Time in milliseconds from which this point applies.
    pub time: f64,

    /// Milliseconds per beat (tempo-defining points only).
    pub beat_length: f64,

    /// Only tempo-defining points take part in beat-length lookups.
    #[serde(default = "default_tempo_defining")]
    pub tempo_defining: bool,

    /// Whether a kiai (highlight) section is active from this point.
    #[serde(default)]
    pub kiai: bool,
}

impl TimingPoint {
    /// Creates a tempo-defining point.
    pub fn tempo(time: f64, beat_length: f64) -> Self {
        Self {
            time,
            beat_length,
            tempo_defining: true,
            kiai: false,
        }
    }

    /// Creates an inherited (non tempo-defining) point.
    pub fn inherited(time: f64) -> Self {
        Self {
            time,
            beat_length: DEFAULT_BEAT_LENGTH,
            tempo_defining: false,
            kiai: false,
        }
    }

    /// Marks the point as starting (or ending) a kiai section.
    pub fn with_kiai(mut self, kiai: bool) -> Self {
        self.kiai = kiai;
        self
    }
}

/// Returns the most recent point with `time <= query`; later entries win ties.
fn latest_at<'a>(
    points: impl Iterator<Item = &'a TimingPoint>,
    query: f64,
) -> Option<&'a TimingPoint> {
    points
        .filter(|p| p.time <= query)
        .fold(None, |best: Option<&TimingPoint>, p| match best {
            Some(b) if b.time > p.time => Some(b),
            _ => Some(p),
        })
}

/// Beat length in effect at `time`.
///
/// # Arguments
/// * `points` - Timing points of the beatmap, in any order
/// * `time` - Query time in milliseconds
///
/// # Returns
/// The beat length of the latest tempo-defining point at or before `time`,
/// or [`DEFAULT_BEAT_LENGTH`] when there is none.
pub fn beat_length_at(points: &[TimingPoint], time: f64) -> f64 {
    latest_at(points.iter().filter(|p| p.tempo_defining), time)
        .map(|p| p.beat_length)
        .unwrap_or(DEFAULT_BEAT_LENGTH)
}

/// Whether a kiai section is active at `time`.
pub fn kiai_at(points: &[TimingPoint], time: f64) -> bool {
    latest_at(points.iter(), time).is_some_and(|p| p.kiai)
}
