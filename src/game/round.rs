// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! A single reaction round: one random lane, one per-round timeout, one
//! scan from the last LED down to the first.
//!
//! The scan is a tick function, not a wait loop. Each position holds its
//! LED until the position deadline passes, then the scan steps down; a
//! button edge on the round's lane at any point ends the round with an
//! outcome scored by the LED that was lit. Exactly one outcome per round.

use rand::Rng;
use tracing::debug;

use crate::board::LightFrame;
use crate::game::lane::{Lane, LaneId, LEDS_PER_LANE};
use crate::game::GameRules;
use crate::input::{Button, ButtonMatrix};
use crate::timing::Deadline;

/// Penalty when the whole scan passes without a press
const MISS_DELTA: i32 = -2;

/// Score delta for a press while `position` is lit. Low positions pay:
/// the scan reaches them last, so holding out is worth more.
fn delta_for_position(position: usize) -> i32 {
    match position {
        0 => 2,
        1 => 1,
        _ => -2,
    }
}

/// Result of one finished scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    /// Lane the round ran on
    pub lane: LaneId,
    /// LED index lit when the press landed; `None` for a total miss
    pub hit: Option<usize>,
    /// Score change to apply
    pub delta: i32,
    /// The per-position timeout this round used
    pub timeout_ms: u64,
}

/// What one tick of the scan observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTick {
    /// Scan still running
    Continue,
    /// Scan over; apply the outcome
    Finished(RoundOutcome),
}

/// One in-flight reaction round
#[derive(Debug)]
pub struct RoundEngine {
    lane: LaneId,
    timeout_ms: u64,
    position: usize,
    deadline: Deadline,
}

impl RoundEngine {
    /// Start a round on a known lane with a known timeout
    pub fn new(lane: LaneId, timeout_ms: u64, now_ms: u64) -> Self {
        debug!(%lane, timeout_ms, "round started");
        Self {
            lane,
            timeout_ms,
            position: LEDS_PER_LANE - 1,
            deadline: Deadline::after(now_ms, timeout_ms),
        }
    }

    /// Roll a fresh round: lane chosen uniformly, timeout uniform over the
    /// configured bounds
    pub fn roll<R: Rng>(rng: &mut R, rules: &GameRules, now_ms: u64) -> Self {
        let lane = LaneId::ALL[rng.gen_range(0..LaneId::ALL.len())];
        let timeout_ms = rng.gen_range(rules.round_timeout_min_ms..=rules.round_timeout_max_ms);
        Self::new(lane, timeout_ms, now_ms)
    }

    /// Lane this round is hot on
    pub fn lane(&self) -> LaneId {
        self.lane
    }

    /// LED index currently lit
    pub fn position(&self) -> usize {
        self.position
    }

    /// The per-position timeout rolled for this round
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Advance the scan. A press on the round's lane wins over a deadline
    /// that expires the same tick: the press landed inside the window.
    pub fn tick(&mut self, now_ms: u64, buttons: &mut ButtonMatrix) -> RoundTick {
        if buttons.consume_edge(Button::Lane(self.lane)) {
            let delta = delta_for_position(self.position);
            debug!(lane = %self.lane, position = self.position, delta, "hit");
            return RoundTick::Finished(RoundOutcome {
                lane: self.lane,
                hit: Some(self.position),
                delta,
                timeout_ms: self.timeout_ms,
            });
        }

        if self.deadline.expired(now_ms) {
            if self.position == 0 {
                debug!(lane = %self.lane, "miss");
                return RoundTick::Finished(RoundOutcome {
                    lane: self.lane,
                    hit: None,
                    delta: MISS_DELTA,
                    timeout_ms: self.timeout_ms,
                });
            }
            self.position -= 1;
            self.deadline = Deadline::after(now_ms, self.timeout_ms);
        }

        RoundTick::Continue
    }

    /// Light only the scan's current position on its lane
    pub fn render(&self, frame: &mut LightFrame) {
        frame.clear_lane(self.lane);
        frame.set(self.lane, self.position, Lane::get(self.lane).color);
    }
}
