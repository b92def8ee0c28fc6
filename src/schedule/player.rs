// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Time-indexed schedule playback.
//!
//! The player holds no per-note countdowns: every tick derives the full set
//! of active notes from elapsed time alone, so overlapping notes on
//! different lanes fall out naturally. Reaching any rest sentinel restarts
//! the schedule from the top.

use tracing::debug;

use crate::board::LightFrame;
use crate::game::lane::{Lane, LaneId, LEDS_PER_LANE};

use super::Schedule;

/// One active note as observed by a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveNote {
    /// Index of the entry in the schedule table
    pub event: usize,
    /// Lane the note sounds on
    pub lane: LaneId,
    /// LED currently lit for this note; sweeps toward 0 as the note ages
    pub lit_index: usize,
    /// Fraction of the note already elapsed, in [0, 1)
    pub progress: f32,
}

impl ActiveNote {
    /// Tone frequency of the note's lane
    pub fn tone_hz(&self) -> u32 {
        Lane::get(self.lane).tone_hz
    }
}

/// Everything one player tick observed
#[derive(Debug, Clone, Default)]
pub struct PlayerFrame {
    /// Elapsed milliseconds since the current loop started
    pub elapsed_ms: u64,
    /// Notes active this tick, in table order
    pub active: Vec<ActiveNote>,
    /// Table indices of notes that activated this tick, at most once per
    /// activation per loop
    pub started: Vec<usize>,
    /// Whether this tick reached a rest and restarted the schedule
    pub looped: bool,
}

impl PlayerFrame {
    /// Render the active notes onto a dark frame
    pub fn light_frame(&self) -> LightFrame {
        self.light_frame_where(|_| true)
    }

    /// Render only the active notes the predicate keeps
    pub fn light_frame_where<F>(&self, keep: F) -> LightFrame
    where
        F: Fn(&ActiveNote) -> bool,
    {
        let mut frame = LightFrame::dark();
        for note in self.active.iter().filter(|n| keep(n)) {
            frame.set(note.lane, note.lit_index, Lane::get(note.lane).color);
        }
        frame
    }
}

/// Walks a validated schedule against the clock
#[derive(Debug)]
pub struct SchedulePlayer {
    schedule: Schedule,
    started_at: Option<u64>,
    /// Per-entry activation latch, cleared each time the schedule loops
    activated: Vec<bool>,
    loops: u32,
}

impl SchedulePlayer {
    /// Create a player over a validated schedule, initially stopped
    pub fn new(schedule: Schedule) -> Self {
        let entries = schedule.len();
        Self {
            schedule,
            started_at: None,
            activated: vec![false; entries],
            loops: 0,
        }
    }

    /// Begin playback, with `now_ms` as the schedule's time zero
    pub fn start(&mut self, now_ms: u64) {
        self.started_at = Some(now_ms);
        self.activated.fill(false);
        self.loops = 0;
        debug!(schedule = self.schedule.name(), "playback started");
    }

    /// Halt playback; `tick` returns empty frames until restarted
    pub fn stop(&mut self) {
        self.started_at = None;
    }

    /// Whether playback is running
    pub fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    /// The schedule being played
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// How many times the schedule has looped since `start`
    pub fn loops(&self) -> u32 {
        self.loops
    }

    /// Swap in a new schedule. If playback is running it restarts from the
    /// top of the new table at `now_ms`.
    pub fn replace_schedule(&mut self, schedule: Schedule, now_ms: u64) {
        self.activated = vec![false; schedule.len()];
        self.schedule = schedule;
        self.loops = 0;
        if self.started_at.is_some() {
            self.started_at = Some(now_ms);
        }
    }

    /// Advance playback to `now_ms`.
    ///
    /// If elapsed time has reached any rest sentinel the schedule restarts
    /// and the frame reports `looped` with nothing active. Otherwise the
    /// frame lists every note whose window contains the elapsed time, plus
    /// first-tick activations for tone triggering.
    pub fn tick(&mut self, now_ms: u64) -> PlayerFrame {
        let Some(started_at) = self.started_at else {
            return PlayerFrame::default();
        };
        let elapsed = now_ms.saturating_sub(started_at);

        for event in self.schedule.events() {
            if event.is_rest() && elapsed >= event.start_ms {
                self.started_at = Some(now_ms);
                self.activated.fill(false);
                self.loops += 1;
                debug!(
                    schedule = self.schedule.name(),
                    loops = self.loops,
                    "schedule looped"
                );
                return PlayerFrame {
                    elapsed_ms: 0,
                    active: Vec::new(),
                    started: Vec::new(),
                    looped: true,
                };
            }
        }

        let mut active = Vec::new();
        let mut started = Vec::new();

        for (i, event) in self.schedule.events().iter().enumerate() {
            let Some(lane) = event.lane else {
                continue;
            };
            if !event.contains(elapsed) {
                continue;
            }

            let offset = elapsed - event.start_ms;
            if !self.activated[i] {
                self.activated[i] = true;
                started.push(i);
            }
            active.push(ActiveNote {
                event: i,
                lane,
                lit_index: lit_index(offset, event.duration_ms),
                progress: offset as f32 / event.duration_ms as f32,
            });
        }

        PlayerFrame {
            elapsed_ms: elapsed,
            active,
            started,
            looped: false,
        }
    }
}

/// LED index for a note `offset_ms` into its `duration_ms` window.
///
/// The sweep starts at the last LED and steps toward index 0 in equal time
/// slices. Integer arithmetic keeps the index exact at slice boundaries and
/// in range over the whole half-open window.
pub fn lit_index(offset_ms: u64, duration_ms: u64) -> usize {
    let step = (offset_ms * LEDS_PER_LANE as u64 / duration_ms) as usize;
    LEDS_PER_LANE - 1 - step.min(LEDS_PER_LANE - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::TimedEvent;

    fn lane(i: u8) -> LaneId {
        LaneId::new(i).unwrap()
    }

    fn demo_schedule() -> Schedule {
        Schedule::new(
            "demo",
            vec![
                TimedEvent::note(lane(0), 0, 500),
                TimedEvent::note(lane(1), 250, 500),
                TimedEvent::note(lane(2), 600, 200),
                TimedEvent::rest(1000, 100),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_stopped_player_is_dark() {
        let mut player = SchedulePlayer::new(demo_schedule());
        let frame = player.tick(1234);
        assert!(frame.active.is_empty());
        assert!(!frame.looped);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_lit_index_sweeps_high_to_low() {
        // 500ms note over 5 LEDs: 100ms per step
        assert_eq!(lit_index(0, 500), 4);
        assert_eq!(lit_index(99, 500), 4);
        assert_eq!(lit_index(100, 500), 3);
        assert_eq!(lit_index(250, 500), 2);
        assert_eq!(lit_index(499, 500), 0);
    }

    #[test]
    fn test_lit_index_never_leaves_range() {
        for duration in [1u64, 7, 123, 500, 10_000] {
            for offset in 0..duration.min(2000) {
                let lit = lit_index(offset, duration);
                assert!(lit < LEDS_PER_LANE, "offset {offset} duration {duration}");
            }
        }
    }

    #[test]
    fn test_overlapping_notes_are_all_reported() {
        let mut player = SchedulePlayer::new(demo_schedule());
        player.start(10_000);

        // At t=+300 both the lane 0 and lane 1 notes are inside their windows
        let frame = player.tick(10_300);
        assert_eq!(frame.active.len(), 2);
        assert_eq!(frame.active[0].lane, lane(0));
        assert_eq!(frame.active[1].lane, lane(1));

        // Lane 0 is 300/500 through: step 3, LED 1. Lane 1 is 50/500: LED 4.
        assert_eq!(frame.active[0].lit_index, 1);
        assert_eq!(frame.active[1].lit_index, 4);
    }

    #[test]
    fn test_note_windows_are_half_open() {
        let mut player = SchedulePlayer::new(demo_schedule());
        player.start(0);

        // Lane 0's note covers [0, 500): gone exactly at 500
        let frame = player.tick(499);
        assert!(frame.active.iter().any(|n| n.lane == lane(0)));
        let frame = player.tick(500);
        assert!(!frame.active.iter().any(|n| n.lane == lane(0)));
    }

    #[test]
    fn test_activation_reported_once_per_loop() {
        let mut player = SchedulePlayer::new(demo_schedule());
        player.start(0);

        let frame = player.tick(10);
        assert_eq!(frame.started, vec![0]);
        let frame = player.tick(20);
        assert!(frame.started.is_empty());

        let frame = player.tick(260);
        assert_eq!(frame.started, vec![1]);

        // After the loop the latches clear and lane 0 reactivates
        let frame = player.tick(1000);
        assert!(frame.looped);
        let frame = player.tick(1010);
        assert_eq!(frame.started, vec![0]);
    }

    #[test]
    fn test_reaching_the_terminator_restarts() {
        let mut player = SchedulePlayer::new(demo_schedule());
        player.start(0);

        let frame = player.tick(999);
        assert!(!frame.looped);

        let frame = player.tick(1005);
        assert!(frame.looped);
        assert_eq!(frame.elapsed_ms, 0);
        assert_eq!(player.loops(), 1);

        // Time zero moved to the restart tick
        let frame = player.tick(1255);
        assert_eq!(frame.elapsed_ms, 250);
        assert!(frame.active.iter().any(|n| n.lane == lane(1)));
    }

    #[test]
    fn test_mid_table_rest_restarts_early() {
        let schedule = Schedule::new(
            "pause",
            vec![
                TimedEvent::note(lane(0), 0, 200),
                TimedEvent::rest(300, 50),
                TimedEvent::note(lane(1), 400, 200),
                TimedEvent::rest(700, 100),
            ],
        )
        .unwrap();
        let mut player = SchedulePlayer::new(schedule);
        player.start(0);

        // The lane 1 note is unreachable: the rest at 300 restarts first
        let frame = player.tick(350);
        assert!(frame.looped);
        assert_eq!(player.loops(), 1);
    }

    #[test]
    fn test_light_frame_renders_active_notes() {
        let mut player = SchedulePlayer::new(demo_schedule());
        player.start(0);

        let frame = player.tick(300);
        let lights = frame.light_frame();
        assert_eq!(lights.lit_count(), 2);
        assert!(lights.get(lane(0), 1).is_some());
        assert!(lights.get(lane(1), 4).is_some());

        let masked = frame.light_frame_where(|n| n.lane != lane(0));
        assert_eq!(masked.lit_count(), 1);
        assert!(masked.get(lane(0), 1).is_none());
    }

    #[test]
    fn test_replace_schedule_restarts_playback() {
        let mut player = SchedulePlayer::new(demo_schedule());
        player.start(0);
        player.tick(1005); // loop once
        assert_eq!(player.loops(), 1);

        let swapped = Schedule::new(
            "swapped",
            vec![
                TimedEvent::note(lane(3), 0, 100),
                TimedEvent::rest(200, 50),
            ],
        )
        .unwrap();
        player.replace_schedule(swapped, 5000);

        assert_eq!(player.loops(), 0);
        let frame = player.tick(5050);
        assert_eq!(frame.active.len(), 1);
        assert_eq!(frame.active[0].lane, lane(3));
        assert_eq!(frame.started, vec![0]);
    }
}
