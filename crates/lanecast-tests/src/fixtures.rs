//! Beatmap fixtures shared by the integration tests.

use lanecast_chart::{Beatmap, Difficulty, SoundFlags, SourceObject, TimingPoint};

/// Beat length of the fixtures' base tempo (120 BPM).
pub const BEAT_LENGTH: f64 = 500.0;

/// Difficulty settings with the given HP, CS, OD and AR.
pub fn difficulty(hp: f32, cs: f32, od: f32, ar: f32) -> Difficulty {
    Difficulty { hp, cs, od, ar }
}

/// `count` tap points `interval` ms apart, positions walking the axis by
/// `position_step` and wrapping at its width.
pub fn tap_stream(start: i32, count: usize, interval: i32, position_step: f32) -> Vec<SourceObject> {
    (0..count)
        .map(|i| {
            let position = (i as f32 * position_step).rem_euclid(512.0);
            SourceObject::tap(start + i as i32 * interval, position)
        })
        .collect()
}

/// 50 tap points 100 ms apart, alternating between the axis ends so every
/// consecutive pair is far apart.
pub fn alternating_taps() -> Beatmap {
    Beatmap::builder(difficulty(5.0, 4.0, 5.0, 8.0))
        .timing_point(TimingPoint::tempo(0.0, BEAT_LENGTH))
        .objects((0..50).map(|i| {
            let position = if i % 2 == 0 { 40.0 } else { 470.0 };
            SourceObject::tap(i * 100, position)
        }))
        .build()
}

/// A beatmap of `total` objects, `special` of which are hold spans.
pub fn with_special_share(difficulty: Difficulty, total: usize, special: usize) -> Beatmap {
    let objects = (0..total).map(|i| {
        let time = i as i32 * 400;
        let position = ((i * 53) % 512) as f32;
        if i < special {
            SourceObject::hold_span(time, time + 300, position, 1)
        } else {
            SourceObject::tap(time, position)
        }
    });
    Beatmap::builder(difficulty)
        .timing_point(TimingPoint::tempo(0.0, BEAT_LENGTH))
        .objects(objects)
        .build()
}

/// A song-like beatmap exercising every object kind, kiai sections, hit
/// sounds, tempo changes and a break.
pub fn mixed_beatmap(difficulty: Difficulty) -> Beatmap {
    let mut builder = Beatmap::builder(difficulty)
        .timing_point(TimingPoint::tempo(0.0, BEAT_LENGTH))
        .timing_point(TimingPoint::inherited(8000.0).with_kiai(true))
        .timing_point(TimingPoint::inherited(16000.0).with_kiai(false))
        .timing_point(TimingPoint::tempo(24000.0, 300.0))
        .total_break_time(4000)
        .objects(tap_stream(0, 32, 250, 37.0))
        .object(SourceObject::hold_span(8000, 8600, 100.0, 1))
        .object(SourceObject::hold_span(8750, 9500, 300.0, 3))
        .object(SourceObject::hold_span(9600, 9900, 420.0, 3).with_sounds(SoundFlags::CLAP))
        .object(
            SourceObject::hold_span(10000, 11800, 256.0, 3).with_node_sounds(vec![
                SoundFlags::FINISH,
                SoundFlags::empty(),
                SoundFlags::WHISTLE,
                SoundFlags::CLAP,
            ]),
        )
        .objects(tap_stream(12000, 16, 125, 91.0))
        .object(SourceObject::spin(14200, 15800).with_sounds(SoundFlags::FINISH))
        .object(SourceObject::hold_span(16000, 16240, 64.0, 3))
        .object(SourceObject::hold_span(16400, 17000, 448.0, 4))
        .object(SourceObject::hold_span(17200, 21200, 192.0, 2));

    for (i, obj) in tap_stream(26000, 24, 150, 23.0).into_iter().enumerate() {
        let sounds = match i % 4 {
            0 => SoundFlags::CLAP | SoundFlags::FINISH,
            1 => SoundFlags::WHISTLE,
            2 => SoundFlags::CLAP,
            _ => SoundFlags::empty(),
        };
        builder = builder.object(obj.with_sounds(sounds));
    }

    builder
        .object(SourceObject::spin(30000, 30050))
        .object(SourceObject::tap(30400, 256.0))
        .build()
}
