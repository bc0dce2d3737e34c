//! lanecast conversion engine
//!
//! Deterministically converts a single-column beatmap into a multi-lane
//! chart. The same beatmap and lane target always produce the same notes:
//! every random decision is drawn from one xorshift generator seeded from
//! the beatmap's difficulty settings.
//!
//! # Example
//!
//! ```
//! use lanecast_chart::{Beatmap, Difficulty, SourceObject, TimingPoint};
//! use lanecast_convert::{convert, ConvertOptions};
//!
//! let mut beatmap = Beatmap::builder(Difficulty { hp: 5.0, cs: 4.0, od: 8.0, ar: 9.0 })
//!     .timing_point(TimingPoint::tempo(0.0, 375.0))
//!     .object(SourceObject::tap(0, 64.0))
//!     .object(SourceObject::hold_span(375, 1125, 192.0, 2))
//!     .object(SourceObject::spin(1500, 3000))
//!     .build();
//!
//! let summary = convert(&mut beatmap, &ConvertOptions::auto()).unwrap();
//! assert!(beatmap.is_multi_lane());
//! assert_eq!(beatmap.lane_count, Some(summary.lane_count));
//! ```
//!
//! # Modules
//!
//! - [`convert`]: The conversion driver
//! - [`difficulty`]: Seed, lane count and difficulty derivation
//! - [`pattern`]: Tap, hold and spin pattern generators
//! - [`column`]: Position to lane mapping and free lane search
//! - [`state`]: State carried between consecutive objects
//! - [`rng`]: The xorshift generator
//! - [`observer`]: Conversion event reporting
//! - [`error`]: Error types

pub mod column;
pub mod convert;
pub mod difficulty;
pub mod error;
pub mod observer;
pub mod pattern;
pub mod rng;
pub mod state;

pub use column::{find_available_column, get_column, ColumnSearch, Occupancy, SearchStep};
pub use convert::{convert, convert_with_observer, generate_notes, ConversionSummary};
pub use difficulty::{ConversionParams, ConvertOptions, LaneTarget};
pub use error::{ConvertError, ConvertResult};
pub use observer::{ConversionObserver, NoopObserver, TracingObserver};
pub use pattern::{LaneGroup, PatternContext, PatternFlags};
pub use rng::{create_rng, XorShiftRng};
pub use state::ConversionState;
