//! Spin object patterns.

use lanecast_chart::{ConvertedNote, SourceObject};

use crate::pattern::{LaneGroup, PatternContext};
use crate::rng::XorShiftRng;

/// Shortest spin emitted as a hold.
pub const MIN_HOLD_DURATION: i32 = 100;

/// Spins shorter than this with a finish sound go to the special lane.
const SPECIAL_LANE_DURATION: i32 = 1000;

/// Converts one spin object into a single note.
///
/// The note avoids the previous group unless that group already covers
/// every lane. In 8-lane mode short finished spins take the special lane
/// and every other spin avoids the previous group.
pub fn generate(
    obj: &SourceObject,
    previous: &LaneGroup,
    rng: &mut XorShiftRng,
    ctx: &PatternContext,
) -> LaneGroup {
    let duration = obj.duration();
    let lane = if ctx.lane_count == 8
        && obj.sound_flags.has_finish()
        && duration < SPECIAL_LANE_DURATION
    {
        0
    } else {
        let avoid_previous = ctx.lane_count == 8 || previous.distinct_lanes() != ctx.lane_count;
        let candidate = ctx.random_lane(rng);
        ctx.search()
            .avoid_if(avoid_previous, previous)
            .find(candidate, rng)
    };

    let note = if duration >= MIN_HOLD_DURATION {
        ConvertedNote::hold(lane, obj.time, obj.end_time)
    } else {
        ConvertedNote::tap(lane, obj.time)
    };
    LaneGroup::from_notes(vec![note])
}
