//! lanecast End-to-End Test Infrastructure
//!
//! Integration tests for the conversion engine:
//!
//! - Conversion: beatmap -> multi-lane chart, lane bounds and ordering
//! - **Determinism**: identical notes across independent runs
//! - Key count: automatic lane count resolution
//! - Properties: proptest-driven invariants over generated beatmaps
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lanecast-tests
//! ```

pub mod determinism;
pub mod fixtures;
