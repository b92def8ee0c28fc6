// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Session state machine: idle, timed play, game over, name entry.
//!
//! A session owns the score, the volatile high score, and whichever round
//! is in flight. All timing flows through the `now_ms` passed to `tick`, so
//! a whole session can be driven in a test without real waits. Pending
//! button edges are absorbed at every phase change; each phase only ever
//! reacts to presses that began inside it.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::board::LightFrame;
use crate::game::lane::Lane;
use crate::game::name::{NameEntry, NAME_LEN};
use crate::game::round::{RoundEngine, RoundOutcome, RoundTick};
use crate::game::GameRules;
use crate::input::{Button, ButtonMatrix, NavDir};
use crate::timing::Deadline;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Idle; any button edge starts a game
    AwaitingStart,
    /// Rounds running against the session clock
    Active,
    /// Time ran out short of the record; a fresh press acknowledges
    Expired,
    /// Time ran out on a record score; slots stay editable until a lane
    /// edge commits
    NameEntry,
}

/// Best score since power-on, with the name typed for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedHighScore {
    pub score: i32,
    pub name: [char; NAME_LEN],
}

impl NamedHighScore {
    /// The stored name as a string
    pub fn name_string(&self) -> String {
        self.name.iter().collect()
    }
}

impl Default for NamedHighScore {
    fn default() -> Self {
        Self {
            score: 0,
            name: ['A'; NAME_LEN],
        }
    }
}

/// Observable happenings from one session tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A game began; the score was reset to zero
    Started,
    /// A round finished and its delta was applied
    RoundScored(RoundOutcome),
    /// The session clock ran out; `record` selects name entry over the
    /// game-over screen
    Expired { record: bool },
    /// Name entry committed a new high score
    HighScoreSaved(NamedHighScore),
    /// A feedback tone should sound
    Tone { freq_hz: u32, duration_ms: u64 },
}

/// One player-facing game from first press to game over
#[derive(Debug)]
pub struct Session {
    rules: GameRules,
    rng: StdRng,
    phase: SessionPhase,
    score: i32,
    high: NamedHighScore,
    name_entry: NameEntry,
    ends_at: Option<Deadline>,
    round: Option<RoundEngine>,
    pause_until: Option<Deadline>,
}

impl Session {
    /// Create an idle session with an entropy-seeded lane roller
    pub fn new(rules: GameRules) -> Self {
        Self::with_rng(rules, StdRng::from_entropy())
    }

    /// Create an idle session with a caller-supplied RNG
    pub fn with_rng(rules: GameRules, rng: StdRng) -> Self {
        Self {
            rules,
            rng,
            phase: SessionPhase::AwaitingStart,
            score: 0,
            high: NamedHighScore::default(),
            name_entry: NameEntry::new(),
            ends_at: None,
            round: None,
            pause_until: None,
        }
    }

    /// Current phase
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Score of the running (or just-finished) game
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Best score since power-on
    pub fn high_score(&self) -> &NamedHighScore {
        &self.high
    }

    /// Name slots; their letters persist across games
    pub fn name_entry(&self) -> &NameEntry {
        &self.name_entry
    }

    /// The in-flight round, if one is scanning
    pub fn round(&self) -> Option<&RoundEngine> {
        self.round.as_ref()
    }

    /// Session timing rules
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Milliseconds left on the session clock (zero outside `Active`)
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        match (self.phase, self.ends_at) {
            (SessionPhase::Active, Some(ends_at)) => ends_at.remaining(now_ms),
            _ => 0,
        }
    }

    /// Lane lights for the current tick
    pub fn light_frame(&self) -> LightFrame {
        let mut frame = LightFrame::dark();
        if self.phase == SessionPhase::Active {
            if let Some(round) = &self.round {
                round.render(&mut frame);
            }
        }
        frame
    }

    /// Advance the session. Button edges are consumed according to the
    /// current phase; everything observable comes back as events.
    pub fn tick(&mut self, now_ms: u64, buttons: &mut ButtonMatrix) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        match self.phase {
            SessionPhase::AwaitingStart => {
                if let Some(button) = buttons.consume_any() {
                    debug!(?button, "start press");
                    self.start_game(now_ms, buttons, &mut events);
                }
            }
            SessionPhase::Active => {
                // The session clock preempts whatever round is in flight:
                // a press landing on the expiry tick does not score.
                if self.ends_at.map_or(false, |d| d.expired(now_ms)) {
                    self.expire(buttons, &mut events);
                } else {
                    self.run_rounds(now_ms, buttons, &mut events);
                }
            }
            SessionPhase::Expired => {
                if buttons.consume_any().is_some() {
                    self.phase = SessionPhase::AwaitingStart;
                    buttons.absorb();
                }
            }
            SessionPhase::NameEntry => {
                self.edit_name(buttons, &mut events);
            }
        }

        events
    }

    fn start_game(
        &mut self,
        now_ms: u64,
        buttons: &mut ButtonMatrix,
        events: &mut Vec<SessionEvent>,
    ) {
        self.score = 0;
        self.ends_at = Some(Deadline::after(now_ms, self.rules.session_ms));
        self.round = None;
        self.pause_until = None;
        self.phase = SessionPhase::Active;
        buttons.absorb();
        info!(duration_ms = self.rules.session_ms, "session started");
        events.push(SessionEvent::Started);
    }

    fn run_rounds(
        &mut self,
        now_ms: u64,
        buttons: &mut ButtonMatrix,
        events: &mut Vec<SessionEvent>,
    ) {
        if let Some(pause) = self.pause_until {
            if !pause.expired(now_ms) {
                return;
            }
            self.pause_until = None;
        }

        match self.round.take() {
            None => {
                self.round = Some(RoundEngine::roll(&mut self.rng, &self.rules, now_ms));
            }
            Some(mut round) => match round.tick(now_ms, buttons) {
                RoundTick::Continue => {
                    self.round = Some(round);
                }
                RoundTick::Finished(outcome) => {
                    self.apply_outcome(outcome, now_ms, events);
                }
            },
        }
    }

    fn apply_outcome(&mut self, outcome: RoundOutcome, now_ms: u64, events: &mut Vec<SessionEvent>) {
        self.score += outcome.delta;
        info!(
            lane = %outcome.lane,
            hit = ?outcome.hit,
            delta = outcome.delta,
            score = self.score,
            "round scored"
        );
        if outcome.hit.is_some() {
            events.push(SessionEvent::Tone {
                freq_hz: Lane::get(outcome.lane).tone_hz,
                duration_ms: self.rules.hit_tone_ms,
            });
        }
        events.push(SessionEvent::RoundScored(outcome));
        self.pause_until = Some(Deadline::after(now_ms, self.rules.inter_round_pause_ms));
    }

    fn expire(&mut self, buttons: &mut ButtonMatrix, events: &mut Vec<SessionEvent>) {
        let record = self.score > self.high.score;
        self.round = None;
        self.pause_until = None;
        self.ends_at = None;
        self.phase = if record {
            SessionPhase::NameEntry
        } else {
            SessionPhase::Expired
        };
        buttons.absorb();
        info!(score = self.score, record, "session over");
        events.push(SessionEvent::Expired { record });
    }

    fn edit_name(&mut self, buttons: &mut ButtonMatrix, events: &mut Vec<SessionEvent>) {
        if buttons.consume_edge(Button::Nav(NavDir::Up)) {
            self.name_entry.increment();
        }
        if buttons.consume_edge(Button::Nav(NavDir::Down)) {
            self.name_entry.decrement();
        }
        if buttons.consume_edge(Button::Nav(NavDir::Right)) {
            self.name_entry.cursor_right();
        }
        if buttons.consume_edge(Button::Nav(NavDir::Left)) {
            self.name_entry.cursor_left();
        }

        if buttons.consume_any_lane().is_some() {
            self.high = NamedHighScore {
                score: self.score,
                name: self.name_entry.chars(),
            };
            self.phase = SessionPhase::AwaitingStart;
            buttons.absorb();
            info!(
                score = self.high.score,
                name = %self.high.name_string(),
                "high score saved"
            );
            events.push(SessionEvent::HighScoreSaved(self.high.clone()));
        }
    }
}
