//! Tests for hold span patterns.

use lanecast_chart::{ConvertedNote, SoundFlags, SourceObject};
use pretty_assertions::assert_eq;

use super::*;
use crate::rng::create_rng;

fn ctx(lanes: usize, difficulty: f64) -> PatternContext {
    PatternContext::new(lanes, if lanes == 8 { 1 } else { 0 }, difficulty)
}

fn group_of(lanes: &[usize]) -> LaneGroup {
    LaneGroup::from_notes(lanes.iter().map(|&l| ConvertedNote::tap(l, 0)).collect())
}

fn all_notes(outcome: &HoldOutcome) -> Vec<ConvertedNote> {
    outcome
        .groups
        .iter()
        .flat_map(|g| g.notes().iter().copied())
        .collect()
}

// =========================================================================
// Selection
// =========================================================================

#[test]
fn test_node_times() {
    let obj = SourceObject::hold_span(1000, 1600, 256.0, 3);
    assert_eq!(node_times(&obj).collect::<Vec<_>>(), vec![1000, 1200, 1400, 1600]);
}

#[test]
fn test_node_times_saturate() {
    let mut obj = SourceObject::hold_span(0, 10, 256.0, 3);
    obj.segment_duration = 1_000_000_000;
    assert_eq!(
        node_times(&obj).collect::<Vec<_>>(),
        vec![0, 1_000_000_000, 2_000_000_000, i32::MAX]
    );
}

#[test]
fn test_spans_ending_at_time_limit() {
    let mut rng = create_rng(4);
    let end = i32::MAX;
    // One duration per multi-segment strategy.
    for duration in [240, 300, 450, 600, 900, 1800, 4500] {
        let obj = SourceObject::hold_span(end - duration, end, 256.0, 3);
        let outcome = generate(&obj, true, &LaneGroup::new(), &mut rng, &ctx(7, 5.0));
        for note in all_notes(&outcome) {
            assert!(note.time >= obj.time && note.end_time <= end);
        }
    }
}

#[test]
fn test_low_probability_outside_kiai() {
    let obj = SourceObject::hold_span(0, 600, 256.0, 1);
    let (_, flags) = select(&obj, false, &LaneGroup::new(), &ctx(7, 5.0));
    assert_eq!(flags, PatternFlags::LOW_PROBABILITY);
    let (_, flags) = select(&obj, true, &LaneGroup::new(), &ctx(7, 5.0));
    assert_eq!(flags, PatternFlags::empty());
}

#[test]
fn test_multi_segment_thresholds() {
    let none = LaneGroup::new();
    let pick = |end: i32, spans: u32, difficulty: f64| {
        select(&SourceObject::hold_span(0, end, 256.0, spans), true, &none, &ctx(7, difficulty)).0
    };

    assert_eq!(pick(240, 3, 5.0), HoldStrategy::RandomHolds { count: 1 });
    assert_eq!(pick(300, 3, 5.0), HoldStrategy::AlternatingTaps { count: 4 });
    assert_eq!(pick(450, 3, 5.0), HoldStrategy::StairTaps);
    assert_eq!(pick(540, 3, 5.0), HoldStrategy::InterleavedTaps);
    assert_eq!(pick(540, 3, 2.0), HoldStrategy::HoldWithTaps);
    assert_eq!(
        pick(4500, 3, 5.0),
        HoldStrategy::ProbabilisticHolds {
            p2: 0.23,
            p3: 0.0,
            p4: 0.0
        }
    );
    assert_eq!(pick(1500, 3, 5.0), HoldStrategy::TiledHolds);
    // Too many segments to tile across seven lanes.
    assert_eq!(pick(3000, 6, 5.0), HoldStrategy::HoldWithTaps);
}

#[test]
fn test_alternating_taps_force_not_stack() {
    let obj = SourceObject::hold_span(0, 300, 256.0, 3);
    let (_, flags) = select(&obj, true, &LaneGroup::new(), &ctx(7, 5.0));
    assert!(flags.contains(PatternFlags::FORCE_NOT_STACK));
}

#[test]
fn test_single_segment_short() {
    let none = LaneGroup::new();
    let short = SourceObject::hold_span(0, 70, 256.0, 1);
    let medium = SourceObject::hold_span(0, 100, 256.0, 1);
    assert_eq!(
        select(&short, false, &none, &ctx(4, 5.0)),
        (
            HoldStrategy::AlternatingTaps { count: 1 },
            PatternFlags::LOW_PROBABILITY | PatternFlags::FORCE_NOT_STACK
        )
    );

    // A previous group covering every lane lifts the stacking restriction.
    let full = group_of(&[0, 1, 2, 3]);
    assert_eq!(
        select(&medium, false, &full, &ctx(4, 5.0)),
        (
            HoldStrategy::AlternatingTaps { count: 2 },
            PatternFlags::LOW_PROBABILITY
        )
    );
}

#[test]
fn test_single_segment_tiers() {
    let none = LaneGroup::new();
    let obj = SourceObject::hold_span(0, 500, 256.0, 1);
    let odds = |kiai: bool, difficulty: f64| match select(&obj, kiai, &none, &ctx(7, difficulty)).0 {
        HoldStrategy::ProbabilisticHolds { p2, p3, p4 } => (p2, p3, p4),
        other => panic!("unexpected strategy {:?}", other),
    };
    assert_eq!(odds(false, 7.0), (0.78, 0.3, 0.0));
    assert_eq!(odds(true, 7.0), (0.85, 0.36, 0.03));
    assert_eq!(odds(false, 5.0), (0.43, 0.08, 0.0));
    assert_eq!(odds(true, 5.0), (0.56, 0.18, 0.0));
    assert_eq!(odds(false, 3.0), (0.3, 0.0, 0.0));
    assert_eq!(odds(true, 3.0), (0.37, 0.08, 0.0));
    assert_eq!(odds(false, 1.0), (0.17, 0.0, 0.0));
    assert_eq!(odds(true, 1.0), (0.27, 0.0, 0.0));
}

// =========================================================================
// Generation
// =========================================================================

#[test]
fn test_single_lane_spans_whole_object() {
    let obj = SourceObject::hold_span(100, 900, 300.0, 4);
    let mut rng = create_rng(1);
    let before = rng.clone();
    let outcome = generate(&obj, false, &LaneGroup::new(), &mut rng, &ctx(1, 5.0));
    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(outcome.groups[0].notes(), &[ConvertedNote::hold(0, 100, 900)]);
    assert_eq!(rng, before);
}

#[test]
fn test_random_hold_avoids_previous() {
    let previous = group_of(&[0, 1, 2]);
    let obj = SourceObject::hold_span(1000, 1240, 100.0, 3);
    for seed in 0..100 {
        let mut rng = create_rng(seed);
        let outcome = generate(&obj, false, &previous, &mut rng, &ctx(7, 5.0));
        assert_eq!(outcome.groups.len(), 1);
        let note = outcome.groups[0].notes()[0];
        assert!(note.is_hold);
        assert_eq!((note.time, note.end_time), (1000, 1240));
        assert!(note.lane >= 3);
    }
}

#[test]
fn test_alternating_taps_split_at_end() {
    let obj = SourceObject::hold_span(1000, 1300, 100.0, 3);
    let mut rng = create_rng(5);
    let outcome = generate(&obj, false, &LaneGroup::new(), &mut rng, &ctx(7, 5.0));
    assert_eq!(outcome.groups.len(), 2);
    assert_eq!(outcome.groups[0].len(), 3);
    assert_eq!(outcome.groups[1].len(), 1);

    let notes = all_notes(&outcome);
    let times: Vec<i32> = notes.iter().map(|n| n.time).collect();
    assert_eq!(times, vec![1000, 1100, 1200, 1300]);
    assert_eq!(notes[0].lane, 1);
    for pair in notes.windows(2) {
        assert_ne!(pair[0].lane, pair[1].lane);
        assert!(!pair[1].is_hold);
    }
}

#[test]
fn test_stair_taps_step_one_lane() {
    let obj = SourceObject::hold_span(0, 1050, 256.0, 7);
    for seed in 0..50 {
        let mut rng = create_rng(seed);
        let outcome = generate(&obj, false, &LaneGroup::new(), &mut rng, &ctx(4, 5.0));
        assert_eq!(outcome.strategy, HoldStrategy::StairTaps);
        let notes = all_notes(&outcome);
        assert_eq!(notes.len(), 8);
        for pair in notes.windows(2) {
            assert_eq!(pair[0].lane.abs_diff(pair[1].lane), 1);
        }
    }
}

#[test]
fn test_interleaved_taps_emit_pairs() {
    let obj = SourceObject::hold_span(0, 540, 256.0, 3);
    let mut rng = create_rng(9);
    let outcome = generate(&obj, false, &LaneGroup::new(), &mut rng, &ctx(7, 5.0));
    assert_eq!(outcome.strategy, HoldStrategy::InterleavedTaps);
    assert_eq!(all_notes(&outcome).len(), 8);

    let mut rng = create_rng(9);
    let outcome = generate(&obj, false, &LaneGroup::new(), &mut rng, &ctx(2, 5.0));
    assert_eq!(all_notes(&outcome).len(), 4);
}

#[test]
fn test_tiled_holds_share_end() {
    let obj = SourceObject::hold_span(0, 1000, 256.0, 2);
    let mut rng = create_rng(2);
    let outcome = generate(&obj, false, &LaneGroup::new(), &mut rng, &ctx(7, 5.0));
    assert_eq!(outcome.strategy, HoldStrategy::TiledHolds);
    assert_eq!(outcome.groups.len(), 2);
    assert!(outcome.groups[0].is_empty());

    let notes = outcome.groups[1].notes();
    assert_eq!(notes.len(), 2);
    assert_eq!((notes[0].time, notes[1].time), (0, 500));
    assert!(notes.iter().all(|n| n.is_hold && n.end_time == 1000));
    assert_ne!(notes[0].lane, notes[1].lane);
}

#[test]
fn test_hold_with_taps_skips_silent_head() {
    let obj = SourceObject::hold_span(0, 900, 256.0, 3);
    for seed in 0..50 {
        let mut rng = create_rng(seed);
        let outcome = generate(&obj, false, &LaneGroup::new(), &mut rng, &ctx(7, 7.0));
        assert_eq!(outcome.strategy, HoldStrategy::HoldWithTaps);

        let notes = all_notes(&outcome);
        let holds: Vec<_> = notes.iter().filter(|n| n.is_hold).collect();
        assert_eq!(holds.len(), 1);
        let hold_lane = holds[0].lane;
        assert_eq!((holds[0].time, holds[0].end_time), (0, 900));

        let taps: Vec<_> = notes.iter().filter(|n| !n.is_hold).collect();
        assert!(taps.len() >= 3 && taps.len() <= 6);
        assert!(taps.iter().all(|n| n.time != 0 && n.lane != hold_lane));
    }
}

#[test]
fn test_hold_with_taps_accented_head() {
    let obj = SourceObject::hold_span(0, 900, 256.0, 3).with_node_sounds(vec![SoundFlags::WHISTLE]);
    let mut rng = create_rng(4);
    let outcome = generate(&obj, false, &LaneGroup::new(), &mut rng, &ctx(7, 7.0));
    let notes = all_notes(&outcome);
    assert!(notes.iter().any(|n| !n.is_hold && n.time == 0));
}

#[test]
fn test_accented_hold_doubles_in_kiai() {
    let obj = SourceObject::hold_span(0, 500, 256.0, 1).with_sounds(SoundFlags::CLAP);
    for seed in 0..50 {
        let mut rng = create_rng(seed);
        let outcome = generate(&obj, true, &LaneGroup::new(), &mut rng, &ctx(7, 1.0));
        let notes = all_notes(&outcome);
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| n.is_hold));
        assert_ne!(notes[0].lane, notes[1].lane);
    }
}

#[test]
fn test_hold_integrity_across_configurations() {
    for lanes in [2, 4, 5, 7, 8, 10] {
        for (end, spans) in [(80, 1), (300, 1), (240, 3), (330, 3), (450, 3), (600, 3), (1800, 3), (6000, 2)] {
            let obj = SourceObject::hold_span(1000, 1000 + end, 256.0, spans);
            let mut rng = create_rng(lanes as i32 * 31 + end);
            let outcome = generate(&obj, false, &LaneGroup::new(), &mut rng, &ctx(lanes, 5.0));
            let notes = all_notes(&outcome);
            assert!(!notes.is_empty(), "{} lanes, {:?} produced nothing", lanes, outcome.strategy);
            for note in notes {
                assert!(note.lane < lanes);
                assert!(note.end_time >= note.time);
                assert!(note.time >= 1000 && note.end_time <= 1000 + end);
            }
        }
    }
}
