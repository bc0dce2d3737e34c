//! lanecast chart model
//!
//! Types shared by the conversion engine and its callers: the single-column
//! source beatmap, its timing points, the lane-assigned notes produced by
//! conversion, input validation, and canonical hashing of converted charts.
//!
//! # Example
//!
//! ```
//! use lanecast_chart::{Beatmap, Difficulty, SourceObject, TimingPoint};
//! use lanecast_chart::validation::validate_beatmap;
//!
//! let beatmap = Beatmap::builder(Difficulty { hp: 5.0, cs: 4.0, od: 8.0, ar: 9.0 })
//!     .timing_point(TimingPoint::tempo(0.0, 375.0))
//!     .object(SourceObject::tap(0, 64.0))
//!     .object(SourceObject::hold_span(375, 1125, 192.0, 2))
//!     .object(SourceObject::spin(1500, 3000))
//!     .build();
//!
//! assert!(validate_beatmap(&beatmap).is_ok());
//! assert_eq!(beatmap.end_time_object_count(), 2);
//! ```
//!
//! # Modules
//!
//! - [`beatmap`]: The beatmap aggregate and its builder
//! - [`object`]: Source objects, hit sounds, converted notes
//! - [`timing`]: Timing points and lookups
//! - [`validation`]: Input validation
//! - [`hash`]: Canonical hashing of converted notes
//! - [`error`]: Error and warning types

pub mod beatmap;
pub mod error;
pub mod hash;
pub mod object;
pub mod timing;
pub mod validation;

pub use beatmap::{Beatmap, BeatmapBuilder, BeatmapStatistics, Difficulty, LaneMode};
pub use error::{
    CodedError, ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
pub use hash::{notes_hash, source_hash};
pub use object::{ConvertedNote, ObjectKind, SoundFlags, SourceObject, AXIS_CENTRE, AXIS_WIDTH};
pub use timing::{beat_length_at, kiai_at, TimingPoint, DEFAULT_BEAT_LENGTH};
pub use validation::{validate_beatmap, validate_lane_count, MAX_LANES, MIN_LANES};
