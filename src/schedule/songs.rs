// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Built-in schedules.
//!
//! Two tables ship with the binary: a slow overlap demo that exercises
//! polyphony across all four lanes, and Crab Rave at 120 BPM with the first
//! two measures at double speed. Both are validated in tests, so the
//! constructors can assume the tables are well formed.

use crate::game::lane::LaneId;

use super::{Schedule, TimedEvent};

const RED: LaneId = LaneId::ALL[0];
const GREEN: LaneId = LaneId::ALL[1];
const BLUE: LaneId = LaneId::ALL[2];
const YELLOW: LaneId = LaneId::ALL[3];

/// Names accepted by `builtin`, in menu order
pub const BUILTIN_NAMES: [&str; 2] = ["overlap-demo", "crab-rave"];

/// Look up a built-in schedule by name
pub fn builtin(name: &str) -> Option<Schedule> {
    match name {
        "overlap-demo" => Some(overlap_demo()),
        "crab-rave" => Some(crab_rave()),
        _ => None,
    }
}

fn note(lane: LaneId, start_ms: u64, duration_ms: u64) -> TimedEvent {
    TimedEvent::note(lane, start_ms, duration_ms)
}

/// Long sustained notes with heavy lane overlap; good for watching several
/// sweeps run at once.
pub fn overlap_demo() -> Schedule {
    let events = vec![
        note(RED, 0, 10_000),
        note(GREEN, 5_000, 8_000),
        note(BLUE, 12_000, 6_000),
        note(YELLOW, 15_000, 7_000),
        note(RED, 25_000, 5_000),
        note(GREEN, 28_000, 6_000),
        note(BLUE, 32_000, 6_000),
        note(YELLOW, 34_000, 5_000),
        note(GREEN, 36_000, 7_000),
        note(RED, 39_000, 8_000),
        note(BLUE, 42_000, 5_000),
        note(YELLOW, 44_000, 6_000),
        note(GREEN, 47_000, 4_000),
        note(RED, 49_000, 7_000),
        TimedEvent::rest(50_000, 5_000),
    ];
    match Schedule::new("Overlap Demo", events) {
        Ok(schedule) => schedule,
        Err(_) => unreachable!("built-in table is valid"),
    }
}

/// Crab Rave, 120 BPM. Pitches collapse onto the four lanes: D/E on red,
/// F/C on green, G/A on blue, B on yellow. Measures 1-2 run at half the
/// note lengths of measures 3-4.
pub fn crab_rave() -> Schedule {
    let events = vec![
        // Measure 1: Bb G G D D A F F D
        note(YELLOW, 0, 125),
        note(BLUE, 500, 250),
        note(BLUE, 1_000, 125),
        note(RED, 1_250, 125),
        note(RED, 1_500, 125),
        note(BLUE, 1_750, 250),
        note(GREEN, 2_250, 250),
        note(GREEN, 2_750, 125),
        note(RED, 3_000, 250),
        // Measure 2: D A F F C C E E F
        note(RED, 4_000, 125),
        note(BLUE, 4_250, 250),
        note(GREEN, 4_750, 250),
        note(GREEN, 5_250, 125),
        note(GREEN, 5_500, 125),
        note(GREEN, 5_750, 125),
        note(RED, 6_000, 125),
        note(RED, 6_250, 125),
        note(GREEN, 6_500, 250),
        // Measure 3: D Bb G G D D A F F D
        note(RED, 8_000, 500),
        note(YELLOW, 8_500, 250),
        note(BLUE, 8_750, 500),
        note(BLUE, 9_250, 250),
        note(RED, 9_500, 250),
        note(RED, 9_750, 250),
        note(BLUE, 10_000, 500),
        note(GREEN, 10_500, 500),
        note(GREEN, 11_000, 250),
        note(RED, 11_250, 500),
        // Measure 4: D A F F C C E E F
        note(RED, 12_000, 250),
        note(BLUE, 12_250, 500),
        note(GREEN, 12_750, 500),
        note(GREEN, 13_250, 250),
        note(GREEN, 13_500, 250),
        note(GREEN, 13_750, 250),
        note(RED, 14_000, 250),
        note(RED, 14_250, 250),
        note(GREEN, 14_500, 500),
        // Measure 5: D Bb G G D D A F F D, stretched to half notes
        note(RED, 16_000, 1_000),
        note(YELLOW, 17_000, 250),
        note(BLUE, 17_500, 1_000),
        note(BLUE, 18_500, 250),
        note(RED, 18_750, 250),
        note(RED, 19_000, 250),
        note(BLUE, 19_250, 500),
        note(GREEN, 19_750, 1_000),
        note(GREEN, 20_750, 250),
        note(RED, 21_000, 500),
        // Measure 6: D A F F C C E E F
        note(RED, 22_000, 250),
        note(BLUE, 22_250, 500),
        note(GREEN, 22_750, 1_000),
        note(GREEN, 23_750, 250),
        note(GREEN, 24_000, 500),
        note(GREEN, 24_500, 250),
        note(RED, 24_750, 500),
        note(RED, 25_250, 250),
        note(GREEN, 25_500, 1_000),
        // Measure 7: D Bb G G D D A F F D
        note(RED, 27_000, 500),
        note(YELLOW, 27_500, 250),
        note(BLUE, 27_750, 500),
        note(BLUE, 28_250, 250),
        note(RED, 28_500, 250),
        note(RED, 28_750, 250),
        note(BLUE, 29_000, 500),
        note(GREEN, 29_500, 1_000),
        note(GREEN, 30_500, 250),
        note(RED, 30_750, 1_000),
        TimedEvent::rest(32_000, 1_000),
    ];
    match Schedule::new("Crab Rave", events) {
        Ok(schedule) => schedule,
        Err(_) => unreachable!("built-in table is valid"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_demo_shape() {
        let schedule = overlap_demo();
        assert_eq!(schedule.len(), 15);
        assert_eq!(schedule.note_count(), 14);
        assert_eq!(schedule.terminator_start(), 50_000);

        // The opening red note overlaps the green entrance at 5s
        let events = schedule.events();
        assert_eq!(events[0].lane, Some(RED));
        assert!(events[0].contains(5_000));
        assert_eq!(events[1].lane, Some(GREEN));
        assert_eq!(events[1].start_ms, 5_000);
    }

    #[test]
    fn test_crab_rave_shape() {
        let schedule = crab_rave();
        assert_eq!(schedule.len(), 67);
        assert_eq!(schedule.note_count(), 66);
        assert_eq!(schedule.terminator_start(), 32_000);
    }

    #[test]
    fn test_crab_rave_tempo_split() {
        let schedule = crab_rave();
        let events = schedule.events();

        // Measures 1-2 use halved note lengths
        assert_eq!(events[0].start_ms, 0);
        assert_eq!(events[0].duration_ms, 125);
        assert_eq!(events[1].duration_ms, 250);

        // Measure 3 onward runs full length: quarter notes are 500ms
        let measure3 = events.iter().find(|e| e.start_ms == 8_000).unwrap();
        assert_eq!(measure3.duration_ms, 500);
        assert_eq!(measure3.lane, Some(RED));
    }

    #[test]
    fn test_crab_rave_lane_mapping() {
        let schedule = crab_rave();
        let events = schedule.events();

        // Bb pickups land on yellow at the start of measures 1, 3, 5, 7
        for start in [0, 8_500, 17_000, 27_500] {
            let event = events.iter().find(|e| e.start_ms == start).unwrap();
            assert_eq!(event.lane, Some(YELLOW), "start {start}");
        }
    }

    #[test]
    fn test_builtin_lookup() {
        for name in BUILTIN_NAMES {
            assert!(builtin(name).is_some(), "{name}");
        }
        assert!(builtin("unknown").is_none());
        assert_eq!(builtin("crab-rave").unwrap().name(), "Crab Rave");
    }
}
