// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timed event schedules: the static tables behind the music/light modes.
//!
//! A schedule is a fixed, ordered table of (lane, start, duration) notes
//! plus rest sentinels; the sentinel with the largest start time terminates
//! and loops playback. Tables are validated once at construction, so the
//! player never walks a malformed table.

pub mod follow;
pub mod player;
pub mod songs;

pub use follow::{FollowEvent, FollowScorer};
pub use player::{ActiveNote, PlayerFrame, SchedulePlayer};

use thiserror::Error;

use crate::game::lane::LaneId;

/// One scheduled entry: a note on a lane, or a rest sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    /// Lane the note plays on; `None` marks a rest sentinel
    pub lane: Option<LaneId>,
    /// Offset from schedule start, in milliseconds
    pub start_ms: u64,
    /// How long the entry lasts, in milliseconds
    pub duration_ms: u64,
}

impl TimedEvent {
    /// A note on a lane
    pub fn note(lane: LaneId, start_ms: u64, duration_ms: u64) -> Self {
        Self {
            lane: Some(lane),
            start_ms,
            duration_ms,
        }
    }

    /// A rest sentinel (pause or terminator)
    pub fn rest(start_ms: u64, duration_ms: u64) -> Self {
        Self {
            lane: None,
            start_ms,
            duration_ms,
        }
    }

    /// Whether this entry is a rest sentinel
    pub fn is_rest(&self) -> bool {
        self.lane.is_none()
    }

    /// Whether `elapsed_ms` falls inside this entry's half-open window
    pub fn contains(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.start_ms && elapsed_ms < self.start_ms + self.duration_ms
    }

    /// End of the half-open window
    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms
    }
}

/// Rejection reasons for malformed schedule tables
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// The table has no entries at all
    #[error("schedule has no entries")]
    Empty,
    /// An entry starts earlier than its predecessor
    #[error("entry {index} starts at {start_ms}ms, before its predecessor")]
    UnsortedStart { index: usize, start_ms: u64 },
    /// The last-starting entry is a note, so playback would never loop
    #[error("the last entry must be a rest terminator")]
    MissingTerminator,
    /// A note would be active for zero milliseconds
    #[error("entry {index} is a note with zero duration")]
    ZeroDuration { index: usize },
    /// A config row references a lane the board does not have
    #[error("entry {index} references lane {lane}, out of range 0-3")]
    LaneOutOfRange { index: usize, lane: u8 },
}

/// A validated, named event table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    name: String,
    events: Vec<TimedEvent>,
}

impl Schedule {
    /// Validate and construct a schedule.
    ///
    /// Rules: the table is non-empty, start times are non-decreasing in
    /// table order, notes have nonzero duration, and the final entry is a
    /// rest (the terminator). Mid-table rests are allowed and act as loop
    /// points the moment they are reached.
    pub fn new(name: impl Into<String>, events: Vec<TimedEvent>) -> Result<Self, ScheduleError> {
        if events.is_empty() {
            return Err(ScheduleError::Empty);
        }

        for i in 1..events.len() {
            if events[i].start_ms < events[i - 1].start_ms {
                return Err(ScheduleError::UnsortedStart {
                    index: i,
                    start_ms: events[i].start_ms,
                });
            }
        }

        for (i, event) in events.iter().enumerate() {
            if !event.is_rest() && event.duration_ms == 0 {
                return Err(ScheduleError::ZeroDuration { index: i });
            }
        }

        // Starts are sorted, so the final entry carries the largest start.
        if !events[events.len() - 1].is_rest() {
            return Err(ScheduleError::MissingTerminator);
        }

        Ok(Self {
            name: name.into(),
            events,
        })
    }

    /// Schedule name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All entries in table order
    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    /// Total number of entries, rests included
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Number of note entries
    pub fn note_count(&self) -> usize {
        self.events.iter().filter(|e| !e.is_rest()).count()
    }

    /// Start offset of the terminator: the loop length of the schedule
    pub fn terminator_start(&self) -> u64 {
        self.events[self.events.len() - 1].start_ms
    }
}
