// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! The reaction game core.
//!
//! This module provides the timed game infrastructure:
//! - Lane table binding LED strips, buttons, colors, and tones
//! - Round engine scanning one lane against a per-round timeout
//! - Session state machine from first press to game over
//! - High-score name entry with wrapping character slots

pub mod lane;
pub mod name;
pub mod round;
pub mod session;

pub use lane::{Lane, LaneColor, LaneId, LANE_COUNT, LEDS_PER_LANE};
pub use name::{NameChar, NameEntry, SlotCursor, NAME_LEN};
pub use round::{RoundEngine, RoundOutcome, RoundTick};
pub use session::{NamedHighScore, Session, SessionEvent, SessionPhase};

/// Timing rules for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    /// Total session length in milliseconds
    pub session_ms: u64,
    /// Lower bound for the per-round position timeout
    pub round_timeout_min_ms: u64,
    /// Upper bound for the per-round position timeout, inclusive
    pub round_timeout_max_ms: u64,
    /// Dark gap between one round's outcome and the next roll
    pub inter_round_pause_ms: u64,
    /// Length of the feedback tone on a hit
    pub hit_tone_ms: u64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            session_ms: 10_000,
            round_timeout_min_ms: 150,
            round_timeout_max_ms: 500,
            inter_round_pause_ms: 1_000,
            hit_tone_ms: 200,
        }
    }
}
