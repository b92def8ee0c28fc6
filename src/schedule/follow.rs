// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Play-along scoring over a running schedule player.
//!
//! Each lane carries a hit latch for its current note: the first button
//! edge while the note is active scores by lit LED and extinguishes the
//! note, later edges on the same note do nothing, and a note that ends
//! unhit costs points. Edges on lanes with no active note are left alone.

use tracing::debug;

use crate::game::lane::{LaneId, LANE_COUNT};
use crate::input::{Button, ButtonMatrix};

use super::player::PlayerFrame;

/// Penalty when a note ends without being hit
const MISS_DELTA: i32 = -5;

/// Score awarded for a hit at the given lit LED index
fn delta_for_lit_index(lit_index: usize) -> i32 {
    match lit_index {
        0 => 10,
        1 => 5,
        2 => 2,
        _ => -1,
    }
}

/// A scoring event produced by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowEvent {
    /// A note was hit while LED `lit_index` was showing
    Hit {
        lane: LaneId,
        lit_index: usize,
        delta: i32,
    },
    /// A note ended without being hit
    Missed { lane: LaneId, delta: i32 },
}

impl FollowEvent {
    /// Score change carried by the event
    pub fn delta(&self) -> i32 {
        match self {
            FollowEvent::Hit { delta, .. } => *delta,
            FollowEvent::Missed { delta, .. } => *delta,
        }
    }
}

/// Per-lane play-along state layered over `SchedulePlayer` frames
#[derive(Debug, Default)]
pub struct FollowScorer {
    score: i32,
    /// Lane had an active note on the previous tick
    was_active: [bool; LANE_COUNT],
    /// The lane's current note has already been hit
    hit: [bool; LANE_COUNT],
}

impl FollowScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Running score
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Whether the lane's current note has been hit and extinguished
    pub fn is_hit(&self, lane: LaneId) -> bool {
        self.hit[lane.index()]
    }

    /// Zero the score and drop all lane latches
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply one player tick: consume lane edges against active notes and
    /// charge misses for notes that ended unhit.
    pub fn tick(&mut self, frame: &PlayerFrame, buttons: &mut ButtonMatrix) -> Vec<FollowEvent> {
        let mut events = Vec::new();

        if frame.looped {
            // Notes cut short by the terminator still ended unhit.
            for id in LaneId::ALL {
                let i = id.index();
                if self.was_active[i] && !self.hit[i] {
                    self.score += MISS_DELTA;
                    events.push(FollowEvent::Missed {
                        lane: id,
                        delta: MISS_DELTA,
                    });
                }
                self.was_active[i] = false;
                self.hit[i] = false;
            }
            return events;
        }

        // Lanes with an active note this tick, and the LED each shows
        let mut active_lit: [Option<usize>; LANE_COUNT] = [None; LANE_COUNT];
        for note in &frame.active {
            active_lit[note.lane.index()] = Some(note.lit_index);
        }

        for id in LaneId::ALL {
            let i = id.index();
            match active_lit[i] {
                Some(lit_index) => {
                    if buttons.consume_edge(Button::Lane(id)) && !self.hit[i] {
                        self.hit[i] = true;
                        let delta = delta_for_lit_index(lit_index);
                        self.score += delta;
                        debug!(%id, lit_index, delta, score = self.score, "note hit");
                        events.push(FollowEvent::Hit {
                            lane: id,
                            lit_index,
                            delta,
                        });
                    }
                    self.was_active[i] = true;
                }
                None => {
                    if self.was_active[i] && !self.hit[i] {
                        self.score += MISS_DELTA;
                        debug!(%id, score = self.score, "note missed");
                        events.push(FollowEvent::Missed {
                            lane: id,
                            delta: MISS_DELTA,
                        });
                    }
                    self.was_active[i] = false;
                    self.hit[i] = false;
                }
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::player::SchedulePlayer;
    use crate::schedule::{Schedule, TimedEvent};

    fn lane(i: u8) -> LaneId {
        LaneId::new(i).unwrap()
    }

    fn press(buttons: &mut ButtonMatrix, id: LaneId) {
        buttons.set_level(Button::Lane(id), true);
    }

    fn release(buttons: &mut ButtonMatrix, id: LaneId) {
        buttons.set_level(Button::Lane(id), false);
    }

    fn one_note_schedule() -> Schedule {
        Schedule::new(
            "one",
            vec![
                TimedEvent::note(lane(0), 0, 500),
                TimedEvent::rest(1000, 100),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_hit_scores_by_lit_index() {
        // 500ms note, 100ms per LED step: 20ms shows LED 4, 150ms LED 3,
        // 250ms LED 2, 350ms LED 1, 450ms LED 0
        let cases = [
            (20u64, -1),
            (150u64, -1),
            (250u64, 2),
            (350u64, 5),
            (450u64, 10),
        ];

        for (offset, expected) in cases {
            let mut player = SchedulePlayer::new(one_note_schedule());
            let mut scorer = FollowScorer::new();
            let mut buttons = ButtonMatrix::new();
            player.start(0);

            press(&mut buttons, lane(0));
            let frame = player.tick(offset);
            let events = scorer.tick(&frame, &mut buttons);

            assert_eq!(events.len(), 1, "offset {offset}");
            assert_eq!(events[0].delta(), expected, "offset {offset}");
            assert_eq!(scorer.score(), expected, "offset {offset}");
        }
    }

    #[test]
    fn test_note_scores_once_per_activation() {
        let mut player = SchedulePlayer::new(one_note_schedule());
        let mut scorer = FollowScorer::new();
        let mut buttons = ButtonMatrix::new();
        player.start(0);

        press(&mut buttons, lane(0));
        let frame = player.tick(450);
        let events = scorer.tick(&frame, &mut buttons);
        assert_eq!(events.len(), 1);
        assert!(scorer.is_hit(lane(0)));

        // Release and press again while the same note is still active
        release(&mut buttons, lane(0));
        press(&mut buttons, lane(0));
        let frame = player.tick(460);
        let events = scorer.tick(&frame, &mut buttons);
        assert!(events.is_empty());
        assert_eq!(scorer.score(), 10);
    }

    #[test]
    fn test_unhit_note_end_costs_five() {
        let mut player = SchedulePlayer::new(one_note_schedule());
        let mut scorer = FollowScorer::new();
        let mut buttons = ButtonMatrix::new();
        player.start(0);

        let frame = player.tick(100);
        assert!(scorer.tick(&frame, &mut buttons).is_empty());

        // Note window [0, 500) has closed by 510
        let frame = player.tick(510);
        let events = scorer.tick(&frame, &mut buttons);
        assert_eq!(
            events,
            vec![FollowEvent::Missed {
                lane: lane(0),
                delta: -5
            }]
        );
        assert_eq!(scorer.score(), -5);
    }

    #[test]
    fn test_hit_note_end_costs_nothing() {
        let mut player = SchedulePlayer::new(one_note_schedule());
        let mut scorer = FollowScorer::new();
        let mut buttons = ButtonMatrix::new();
        player.start(0);

        press(&mut buttons, lane(0));
        let frame = player.tick(450);
        scorer.tick(&frame, &mut buttons);
        assert_eq!(scorer.score(), 10);

        let frame = player.tick(510);
        let events = scorer.tick(&frame, &mut buttons);
        assert!(events.is_empty());
        assert_eq!(scorer.score(), 10);
    }

    #[test]
    fn test_press_on_silent_lane_is_ignored() {
        let mut player = SchedulePlayer::new(one_note_schedule());
        let mut scorer = FollowScorer::new();
        let mut buttons = ButtonMatrix::new();
        player.start(0);

        // Lane 2 never plays in this schedule
        press(&mut buttons, lane(2));
        let frame = player.tick(100);
        let events = scorer.tick(&frame, &mut buttons);
        assert!(events.is_empty());
        assert_eq!(scorer.score(), 0);
    }

    #[test]
    fn test_hit_mask_extinguishes_the_lane() {
        let mut player = SchedulePlayer::new(one_note_schedule());
        let mut scorer = FollowScorer::new();
        let mut buttons = ButtonMatrix::new();
        player.start(0);

        press(&mut buttons, lane(0));
        let frame = player.tick(250);
        scorer.tick(&frame, &mut buttons);

        let frame = player.tick(260);
        let lights = frame.light_frame_where(|n| !scorer.is_hit(n.lane));
        assert_eq!(lights.lit_count(), 0);
    }

    #[test]
    fn test_terminator_charges_notes_it_cuts_short() {
        // The note is still open when the terminator at 400 fires
        let schedule = Schedule::new(
            "cut",
            vec![
                TimedEvent::note(lane(1), 0, 600),
                TimedEvent::rest(400, 100),
            ],
        )
        .unwrap();
        let mut player = SchedulePlayer::new(schedule);
        let mut scorer = FollowScorer::new();
        let mut buttons = ButtonMatrix::new();
        player.start(0);

        let frame = player.tick(200);
        scorer.tick(&frame, &mut buttons);

        let frame = player.tick(400);
        assert!(frame.looped);
        let events = scorer.tick(&frame, &mut buttons);
        assert_eq!(
            events,
            vec![FollowEvent::Missed {
                lane: lane(1),
                delta: -5
            }]
        );
    }

    #[test]
    fn test_independent_lanes_score_independently() {
        let schedule = Schedule::new(
            "pair",
            vec![
                TimedEvent::note(lane(0), 0, 500),
                TimedEvent::note(lane(3), 0, 500),
                TimedEvent::rest(1000, 100),
            ],
        )
        .unwrap();
        let mut player = SchedulePlayer::new(schedule);
        let mut scorer = FollowScorer::new();
        let mut buttons = ButtonMatrix::new();
        player.start(0);

        press(&mut buttons, lane(0));
        let frame = player.tick(450);
        let events = scorer.tick(&frame, &mut buttons);
        assert_eq!(events.len(), 1);
        assert_eq!(scorer.score(), 10);

        // Lane 3's note ends unhit
        let frame = player.tick(510);
        let events = scorer.tick(&frame, &mut buttons);
        assert_eq!(
            events,
            vec![FollowEvent::Missed {
                lane: lane(3),
                delta: -5
            }]
        );
        assert_eq!(scorer.score(), 5);
    }
}
