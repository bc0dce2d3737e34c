//! Automatic lane count resolution.

use lanecast_convert::difficulty::target_lane_count;
use lanecast_convert::{convert, ConvertOptions};
use lanecast_tests::fixtures::{difficulty, with_special_share};

#[test]
fn test_tap_heavy_resolves_to_seven() {
    // 3 of 20 objects are holds: 15% special.
    let mut beatmap = with_special_share(difficulty(5.0, 4.0, 5.0, 8.0), 20, 3);
    assert_eq!(target_lane_count(&beatmap), 7);

    let summary = convert(&mut beatmap, &ConvertOptions::auto()).unwrap();
    assert!(summary.auto_lanes);
    assert_eq!(summary.lane_count, 7);
    assert_eq!(beatmap.lane_count, Some(7));
}

#[test]
fn test_hold_heavy_low_od_resolves_to_four() {
    // 7 of 10 objects are holds: 70% special.
    let mut beatmap = with_special_share(difficulty(5.0, 4.0, 3.0, 8.0), 10, 7);
    assert_eq!(target_lane_count(&beatmap), 4);

    let summary = convert(&mut beatmap, &ConvertOptions::auto()).unwrap();
    assert_eq!(summary.lane_count, 4);
    assert!(beatmap.notes.iter().all(|n| n.lane < 4));
}

#[test]
fn test_hold_heavy_high_od_resolves_to_five() {
    let beatmap = with_special_share(difficulty(5.0, 4.0, 7.0, 8.0), 10, 7);
    assert_eq!(target_lane_count(&beatmap), 5);
}

#[test]
fn test_middle_band_follows_od() {
    // 40% special with a small circle size: od + 1, clamped to 4-7.
    for (od, expected) in [(1.0, 4), (4.0, 5), (5.0, 6), (9.0, 7)] {
        let beatmap = with_special_share(difficulty(5.0, 3.0, od, 8.0), 10, 4);
        assert_eq!(target_lane_count(&beatmap), expected, "od {}", od);
    }
}

#[test]
fn test_explicit_lanes_override_auto() {
    let mut beatmap = with_special_share(difficulty(5.0, 4.0, 5.0, 8.0), 20, 3);
    let summary = convert(&mut beatmap, &ConvertOptions::with_lanes(9)).unwrap();
    assert!(!summary.auto_lanes);
    assert_eq!(summary.lane_count, 9);
}
