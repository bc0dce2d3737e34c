//! Determinism checks for converted charts.
//!
//! Conversion must produce identical notes for identical input. These helpers
//! run a conversion several times and report the first note that differs.
//!
//! # Example
//!
//! ```
//! use lanecast_convert::ConvertOptions;
//! use lanecast_tests::determinism::{convert_notes, verify_determinism};
//! use lanecast_tests::fixtures;
//!
//! let beatmap = fixtures::mixed_beatmap(fixtures::difficulty(5.0, 4.0, 7.0, 9.0));
//! let result = verify_determinism(|| convert_notes(&beatmap, ConvertOptions::auto()), 3);
//! result.assert_deterministic();
//! ```

use std::fmt;

use lanecast_chart::{notes_hash, Beatmap, ConvertedNote};
use lanecast_convert::{convert, ConvertOptions};

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical notes.
    pub is_deterministic: bool,
    /// Number of conversions compared.
    pub runs: usize,
    /// Note count of the first run.
    pub note_count: usize,
    /// Canonical hash of the first run.
    pub hash: String,
    /// First difference found, if any.
    pub diff_info: Option<NoteDiff>,
}

/// The first note that differs between two runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDiff {
    /// Index into the note list.
    pub index: usize,
    /// Note from the first run (`None` past its end).
    pub expected: Option<ConvertedNote>,
    /// Note from the differing run (`None` past its end).
    pub actual: Option<ConvertedNote>,
    /// Which run (0-indexed) differed.
    pub run_index: usize,
}

impl fmt::Display for NoteDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Difference at note {}: expected {:?}, got {:?} (run {})",
            self.index, self.expected, self.actual, self.run_index
        )
    }
}

impl DeterminismResult {
    /// Panics with a detailed message if the runs disagreed.
    pub fn assert_deterministic(&self) {
        if let Some(diff) = &self.diff_info {
            panic!(
                "Non-deterministic conversion detected!\n\
                 Runs: {}\n\
                 Notes: {}\n\
                 Hash: {}\n\
                 {}",
                self.runs, self.note_count, self.hash, diff
            );
        }
    }
}

/// Converts a clone of `beatmap` and returns its notes.
///
/// # Panics
/// If the conversion fails.
pub fn convert_notes(beatmap: &Beatmap, options: ConvertOptions) -> Vec<ConvertedNote> {
    let mut working = beatmap.clone();
    if let Err(e) = convert(&mut working, &options) {
        panic!("conversion failed: {}", e);
    }
    working.notes
}

/// Runs `convert_fn` `runs` times and compares every output with the first.
pub fn verify_determinism<F>(convert_fn: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> Vec<ConvertedNote>,
{
    assert!(runs >= 2, "Must run at least 2 times to verify determinism");

    let reference = convert_fn();
    let hash = notes_hash(&reference);

    for run_index in 1..runs {
        let output = convert_fn();
        if let Some(index) = first_difference(&reference, &output) {
            return DeterminismResult {
                is_deterministic: false,
                runs,
                note_count: reference.len(),
                hash,
                diff_info: Some(NoteDiff {
                    index,
                    expected: reference.get(index).copied(),
                    actual: output.get(index).copied(),
                    run_index,
                }),
            };
        }
    }

    DeterminismResult {
        is_deterministic: true,
        runs,
        note_count: reference.len(),
        hash,
        diff_info: None,
    }
}

fn first_difference(a: &[ConvertedNote], b: &[ConvertedNote]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_identical_runs() {
        let result = verify_determinism(|| vec![ConvertedNote::tap(1, 0)], 3);
        assert!(result.is_deterministic);
        assert_eq!(result.note_count, 1);
        assert_eq!(result.hash.len(), 64);
    }

    #[test]
    fn test_detects_changed_note() {
        let calls = Cell::new(0);
        let result = verify_determinism(
            || {
                calls.set(calls.get() + 1);
                vec![ConvertedNote::tap(0, 0), ConvertedNote::tap(calls.get(), 10)]
            },
            3,
        );
        assert!(!result.is_deterministic);
        let diff = result.diff_info.unwrap();
        assert_eq!(diff.index, 1);
        assert_eq!(diff.run_index, 1);
    }

    #[test]
    fn test_detects_length_change() {
        let calls = Cell::new(0usize);
        let result = verify_determinism(
            || {
                calls.set(calls.get() + 1);
                vec![ConvertedNote::tap(0, 0); calls.get()]
            },
            2,
        );
        let diff = result.diff_info.unwrap();
        assert_eq!(diff.index, 1);
        assert_eq!(diff.expected, None);
    }

    #[test]
    #[should_panic(expected = "Non-deterministic")]
    fn test_assert_panics_on_difference() {
        let calls = Cell::new(0usize);
        verify_determinism(
            || {
                calls.set(calls.get() + 1);
                vec![ConvertedNote::tap(calls.get(), 0)]
            },
            2,
        )
        .assert_deterministic();
    }
}
