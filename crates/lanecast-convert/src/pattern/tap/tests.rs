//! Tests for tap point patterns.

use lanecast_chart::{ConvertedNote, SoundFlags, SourceObject};
use pretty_assertions::assert_eq;

use super::*;
use crate::rng::create_rng;

const TIMING: TapTiming = TapTiming {
    beat_length: 500.0,
    kiai: false,
};

fn ctx(lanes: usize, difficulty: f64) -> PatternContext {
    PatternContext::new(lanes, if lanes == 8 { 1 } else { 0 }, difficulty)
}

fn state_after(time: f64, position: f32, lanes: &[usize]) -> ConversionState {
    let group = LaneGroup::from_notes(lanes.iter().map(|&l| ConvertedNote::tap(l, 0)).collect());
    ConversionState::new()
        .with_note(time, position)
        .with_group(group)
}

fn lanes_of(group: &LaneGroup) -> Vec<usize> {
    let mut lanes: Vec<usize> = group.notes().iter().map(|n| n.lane).collect();
    lanes.sort_unstable();
    lanes
}

// =========================================================================
// Classification
// =========================================================================

#[test]
fn test_classify_by_time_separation() {
    let state = state_after(1000.0, 100.0, &[]);
    let at = |dt: i32| classify(&SourceObject::tap(1000 + dt, 400.0), &state, TIMING, 7);

    assert_eq!(at(80), PatternFlags::FORCE_NOT_STACK | PatternFlags::KEEP_SINGLE);
    assert_eq!(
        at(95),
        PatternFlags::FORCE_NOT_STACK | PatternFlags::KEEP_SINGLE | PatternFlags::STAIR
    );
    assert_eq!(at(105), PatternFlags::FORCE_NOT_STACK | PatternFlags::LOW_PROBABILITY);
    assert_eq!(at(125), PatternFlags::FORCE_NOT_STACK);
    // Far apart in position with no density history.
    assert_eq!(at(130), PatternFlags::LOW_PROBABILITY);
}

#[test]
fn test_classify_carries_stair_direction() {
    let state = state_after(0.0, 0.0, &[]).with_stair(StairDirection::Down);
    let flags = classify(&SourceObject::tap(90, 300.0), &state, TIMING, 7);
    assert!(flags.contains(PatternFlags::REVERSE_STAIR));
    assert!(!flags.contains(PatternFlags::STAIR));
}

#[test]
fn test_classify_close_positions() {
    let state = state_after(1000.0, 100.0, &[]);
    let at = |dt: i32| classify(&SourceObject::tap(1000 + dt, 110.0), &state, TIMING, 7);

    assert_eq!(at(130), PatternFlags::CYCLE | PatternFlags::KEEP_SINGLE);
    assert_eq!(at(150), PatternFlags::FORCE_STACK | PatternFlags::LOW_PROBABILITY);
    // Infinite density counts as sparse.
    assert_eq!(at(400), PatternFlags::REVERSE | PatternFlags::LOW_PROBABILITY);
}

#[test]
fn test_classify_dense_passages() {
    let mut state = state_after(1000.0, 100.0, &[]);
    for t in [0.0, 100.0, 200.0] {
        state = state.with_density_sample(t);
    }
    // density 200 / 3 < 500 / 2.5
    let flags = classify(&SourceObject::tap(1400, 400.0), &state, TIMING, 7);
    assert_eq!(flags, PatternFlags::empty());

    let sparse = state_after(1000.0, 100.0, &[]);
    let kiai = TapTiming {
        beat_length: 500.0,
        kiai: true,
    };
    assert_eq!(
        classify(&SourceObject::tap(1400, 400.0), &sparse, kiai, 7),
        PatternFlags::empty()
    );
}

#[test]
fn test_classify_sound_flags() {
    let state = state_after(0.0, 0.0, &[]);
    let finish = SourceObject::tap(1000, 300.0).with_sounds(SoundFlags::FINISH);
    let clap = SourceObject::tap(1000, 300.0).with_sounds(SoundFlags::CLAP);
    let both = SourceObject::tap(1000, 300.0).with_sounds(SoundFlags::CLAP | SoundFlags::FINISH);

    assert!(classify(&finish, &state, TIMING, 7).contains(PatternFlags::MIRROR));
    assert!(classify(&clap, &state, TIMING, 7).contains(PatternFlags::GATHERED));
    // Mirror is unavailable in 8-lane mode; clap still gathers.
    let eight = classify(&both, &state, TIMING, 8);
    assert!(!eight.contains(PatternFlags::MIRROR));
    assert!(eight.contains(PatternFlags::GATHERED));

    // Keep-single taps take no sound flags.
    let fast = classify(&SourceObject::tap(50, 300.0).with_sounds(SoundFlags::FINISH), &state, TIMING, 7);
    assert!(!fast.contains(PatternFlags::MIRROR));
}

// =========================================================================
// Strategy selection
// =========================================================================

#[test]
fn test_select_single_lane() {
    let state = state_after(0.0, 0.0, &[0]);
    assert_eq!(
        select(PatternFlags::REVERSE, &state, &ctx(1, 5.0)),
        TapStrategy::SingleLane
    );
}

#[test]
fn test_select_requires_previous_group() {
    let empty = state_after(0.0, 0.0, &[]);
    let flags = PatternFlags::REVERSE | PatternFlags::LOW_PROBABILITY;
    assert_eq!(select(flags, &empty, &ctx(4, 1.0)).name(), "random");

    let with_previous = state_after(0.0, 0.0, &[1]);
    assert_eq!(select(flags, &with_previous, &ctx(4, 1.0)), TapStrategy::Reverse);
}

#[test]
fn test_select_cycle_guards() {
    let flags = PatternFlags::CYCLE | PatternFlags::KEEP_SINGLE;
    assert_eq!(select(flags, &state_after(0.0, 0.0, &[1]), &ctx(4, 5.0)), TapStrategy::Cycle);
    // Centre lane of an odd layout.
    assert_eq!(select(flags, &state_after(0.0, 0.0, &[3]), &ctx(7, 5.0)), TapStrategy::KeepSingle);
    // Special lane in 8-lane mode.
    assert_eq!(select(flags, &state_after(0.0, 0.0, &[0]), &ctx(8, 5.0)), TapStrategy::KeepSingle);
    // More than one previous note.
    assert_eq!(
        select(flags, &state_after(0.0, 0.0, &[0, 2]), &ctx(4, 5.0)),
        TapStrategy::KeepSingle
    );
}

#[test]
fn test_select_stair_needs_single_previous_note() {
    let flags = PatternFlags::FORCE_NOT_STACK | PatternFlags::KEEP_SINGLE | PatternFlags::STAIR;
    assert_eq!(select(flags, &state_after(0.0, 0.0, &[2]), &ctx(7, 5.0)), TapStrategy::Stair);
    assert_eq!(
        select(flags, &state_after(0.0, 0.0, &[2, 4]), &ctx(7, 5.0)),
        TapStrategy::KeepSingle
    );
}

#[test]
fn test_select_mirror_tiers() {
    let state = state_after(0.0, 0.0, &[]);
    assert_eq!(
        select(PatternFlags::MIRROR, &state, &ctx(7, 7.0)),
        TapStrategy::Mirrored {
            centre: 0.12,
            p2: 0.38,
            p3: 0.12
        }
    );
    assert_eq!(
        select(PatternFlags::MIRROR | PatternFlags::FORCE_NOT_STACK, &state, &ctx(7, 3.0)),
        TapStrategy::Random {
            p2: 0.5,
            p3: 0.0,
            p4: 0.0,
            p5: 0.0
        }
    );
}

#[test]
fn test_select_random_tiers() {
    let state = state_after(0.0, 0.0, &[]);
    let low = PatternFlags::LOW_PROBABILITY;
    let expect = |flags, difficulty, p2, p3| {
        assert_eq!(
            select(flags, &state, &ctx(7, difficulty)),
            TapStrategy::Random { p2, p3, p4: 0.0, p5: 0.0 }
        );
    };
    expect(low, 7.0, 0.78, 0.42);
    expect(PatternFlags::empty(), 7.0, 1.0, 0.62);
    expect(low, 5.0, 0.35, 0.08);
    expect(PatternFlags::empty(), 5.0, 0.52, 0.15);
    expect(low, 3.0, 0.18, 0.0);
    expect(PatternFlags::empty(), 3.0, 0.45, 0.0);
    expect(PatternFlags::empty(), 1.5, 0.0, 0.0);
}

// =========================================================================
// Generation
// =========================================================================

#[test]
fn test_reverse_mirrors_previous_lanes() {
    let state = state_after(0.0, 100.0, &[0, 1]);
    let mut rng = create_rng(1);
    let outcome = generate(&SourceObject::tap(400, 105.0), &state, TIMING, &mut rng, &ctx(4, 1.0));
    assert_eq!(outcome.strategy, TapStrategy::Reverse);
    assert_eq!(lanes_of(&outcome.group), vec![2, 3]);
}

#[test]
fn test_force_stack_copies_previous_lanes() {
    let state = state_after(1000.0, 100.0, &[1, 3]);
    let mut rng = create_rng(1);
    let before = rng.clone();
    let outcome = generate(&SourceObject::tap(1140, 105.0), &state, TIMING, &mut rng, &ctx(5, 1.0));
    assert_eq!(outcome.strategy, TapStrategy::ForceStack);
    assert_eq!(lanes_of(&outcome.group), vec![1, 3]);
    assert_eq!(rng, before);
}

#[test]
fn test_cycle_mirrors_single_lane() {
    let state = state_after(1000.0, 100.0, &[1]);
    let mut rng = create_rng(1);
    let outcome = generate(&SourceObject::tap(1130, 105.0), &state, TIMING, &mut rng, &ctx(4, 1.0));
    assert_eq!(outcome.strategy, TapStrategy::Cycle);
    assert_eq!(lanes_of(&outcome.group), vec![2]);
}

#[test]
fn test_stair_turns_at_last_lane() {
    let mut rng = create_rng(1);
    let state = state_after(1000.0, 100.0, &[5]);
    let outcome = generate(&SourceObject::tap(1090, 300.0), &state, TIMING, &mut rng, &ctx(7, 5.0));
    assert_eq!(outcome.strategy, TapStrategy::Stair);
    assert_eq!(lanes_of(&outcome.group), vec![6]);
    assert_eq!(outcome.stair, StairDirection::Down);

    let state = state_after(1000.0, 100.0, &[2]);
    let outcome = generate(&SourceObject::tap(1090, 300.0), &state, TIMING, &mut rng, &ctx(7, 5.0));
    assert_eq!(lanes_of(&outcome.group), vec![3]);
    assert_eq!(outcome.stair, StairDirection::Up);
}

#[test]
fn test_stair_past_last_lane_wraps_without_turning() {
    let mut rng = create_rng(1);
    let state = state_after(1000.0, 100.0, &[6]);
    let outcome = generate(&SourceObject::tap(1090, 300.0), &state, TIMING, &mut rng, &ctx(7, 5.0));
    assert_eq!(lanes_of(&outcome.group), vec![0]);
    assert_eq!(outcome.stair, StairDirection::Up);
}

#[test]
fn test_stair_wraps_to_random_start_in_eight_lanes() {
    let mut rng = create_rng(1);
    let state = state_after(1000.0, 100.0, &[7]);
    let outcome = generate(&SourceObject::tap(1090, 300.0), &state, TIMING, &mut rng, &ctx(8, 5.0));
    assert_eq!(lanes_of(&outcome.group), vec![1]);
    assert_eq!(outcome.stair, StairDirection::Up);
}

#[test]
fn test_reverse_stair_turns_at_random_start() {
    let mut rng = create_rng(1);
    let state = state_after(1000.0, 100.0, &[1]).with_stair(StairDirection::Down);
    let outcome = generate(&SourceObject::tap(1090, 300.0), &state, TIMING, &mut rng, &ctx(6, 5.0));
    assert_eq!(outcome.strategy, TapStrategy::ReverseStair);
    assert_eq!(lanes_of(&outcome.group), vec![0]);
    assert_eq!(outcome.stair, StairDirection::Up);

    let state = state_after(1000.0, 100.0, &[4]).with_stair(StairDirection::Down);
    let outcome = generate(&SourceObject::tap(1090, 300.0), &state, TIMING, &mut rng, &ctx(6, 5.0));
    assert_eq!(lanes_of(&outcome.group), vec![3]);
    assert_eq!(outcome.stair, StairDirection::Down);
}

#[test]
fn test_reverse_stair_below_random_start_wraps_without_turning() {
    let mut rng = create_rng(1);
    let state = state_after(1000.0, 100.0, &[0]).with_stair(StairDirection::Down);
    let outcome = generate(&SourceObject::tap(1090, 300.0), &state, TIMING, &mut rng, &ctx(6, 5.0));
    assert_eq!(lanes_of(&outcome.group), vec![5]);
    assert_eq!(outcome.stair, StairDirection::Down);
}

#[test]
fn test_single_note_on_last_lane_turns_stair() {
    // Two previous notes rule out the stair strategy, but the flag still
    // reacts to where the note lands.
    let mut rng = create_rng(1);
    let state = state_after(1000.0, 100.0, &[2, 4]);
    let outcome = generate(&SourceObject::tap(1090, 511.0), &state, TIMING, &mut rng, &ctx(7, 5.0));
    assert_eq!(outcome.strategy, TapStrategy::KeepSingle);
    assert_eq!(lanes_of(&outcome.group), vec![6]);
    assert_eq!(outcome.stair, StairDirection::Down);
}

#[test]
fn test_stair_walk_bounces_between_ends() {
    let mut rng = create_rng(1);
    let ctx = ctx(4, 5.0);
    let mut state = state_after(0.0, 200.0, &[0]);
    let mut lanes = Vec::new();
    for i in 1..=12 {
        let time = i * 90;
        let outcome = generate(&SourceObject::tap(time, 200.0), &state, TIMING, &mut rng, &ctx);
        lanes.extend(lanes_of(&outcome.group));
        state = state
            .with_note(time as f64, 200.0)
            .with_group(outcome.group)
            .with_stair(outcome.stair);
    }
    assert_eq!(lanes, vec![1, 2, 3, 2, 1, 0, 1, 2, 3, 2, 1, 0]);
}

#[test]
fn test_keep_single_emits_one_note() {
    let state = state_after(1000.0, 100.0, &[0, 1, 2]);
    for seed in 0..50 {
        let mut rng = create_rng(seed);
        let outcome = generate(&SourceObject::tap(1050, 300.0), &state, TIMING, &mut rng, &ctx(7, 9.0));
        assert_eq!(outcome.strategy, TapStrategy::KeepSingle);
        assert_eq!(outcome.group.len(), 1);
        // Position 300 of 7 lanes maps to lane 4; nothing collides.
        assert_eq!(outcome.group.notes()[0].lane, 4);
    }
}

#[test]
fn test_force_not_stack_avoids_previous_lanes() {
    let state = state_after(1000.0, 100.0, &[0, 1]);
    for seed in 0..200 {
        let mut rng = create_rng(seed);
        let obj = SourceObject::tap(1120, 10.0);
        let outcome = generate(&obj, &state, TIMING, &mut rng, &ctx(4, 9.0));
        assert!(outcome.flags.contains(PatternFlags::FORCE_NOT_STACK));
        assert!(!outcome.group.is_empty());
        assert!(outcome.group.len() <= 2);
        for note in outcome.group.notes() {
            assert!(note.lane >= 2, "seed {} placed lane {}", seed, note.lane);
        }
        assert_eq!(outcome.group.distinct_lanes(), outcome.group.len());
    }
}

#[test]
fn test_force_not_stack_with_full_previous_yields_nothing() {
    let state = state_after(1000.0, 100.0, &[0, 1, 2, 3]);
    let mut rng = create_rng(3);
    let outcome = generate(&SourceObject::tap(1120, 10.0), &state, TIMING, &mut rng, &ctx(4, 9.0));
    assert!(outcome.group.is_empty());
}

#[test]
fn test_mirrored_pattern_is_symmetric() {
    let state = state_after(0.0, 0.0, &[]);
    let obj = SourceObject::tap(1000, 300.0).with_sounds(SoundFlags::FINISH);
    for seed in 0..200 {
        let mut rng = create_rng(seed);
        let outcome = generate(&obj, &state, TIMING, &mut rng, &ctx(7, 8.0));
        assert_eq!(outcome.strategy.name(), "mirrored");
        assert!(!outcome.group.is_empty());
        for note in outcome.group.notes() {
            assert!(note.lane == 3 || outcome.group.has_lane(6 - note.lane));
        }
    }
}

#[test]
fn test_clap_forces_multiple_gathered_notes() {
    let state = state_after(0.0, 0.0, &[]);
    let obj = SourceObject::tap(1000, 0.0).with_sounds(SoundFlags::CLAP);
    for seed in 0..100 {
        let mut rng = create_rng(seed);
        let outcome = generate(&obj, &state, TIMING, &mut rng, &ctx(7, 1.0));
        // p2 = 1 always yields two notes; gathering walks right from lane 0.
        assert_eq!(lanes_of(&outcome.group), vec![0, 1]);
    }
}

#[test]
fn test_special_lane_in_eight_lanes() {
    let state = state_after(0.0, 0.0, &[]);
    let obj = SourceObject::tap(1000, 300.0).with_sounds(SoundFlags::CLAP | SoundFlags::FINISH);
    let mut rng = create_rng(17);
    let outcome = generate(&obj, &state, TIMING, &mut rng, &ctx(8, 5.0));
    assert!(outcome.group.has_lane(0));
    assert!(outcome.group.len() >= 3);
}

#[test]
fn test_two_lanes_never_double() {
    let state = state_after(0.0, 0.0, &[]);
    for seed in 0..100 {
        let mut rng = create_rng(seed);
        let outcome = generate(&SourceObject::tap(1000, 300.0), &state, TIMING, &mut rng, &ctx(2, 12.0));
        assert_eq!(outcome.group.len(), 1);
    }
}
