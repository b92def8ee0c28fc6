// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Board output collaborators: lane lights and score displays.
//!
//! The physical board drove addressable LED strips and seven-segment
//! displays; here those become narrow traits so the simulator and tests
//! share one contract. Within a tick, lights are always applied and shown
//! before any display update.

use crate::game::lane::{LaneColor, LaneId, LANE_COUNT, LEDS_PER_LANE};

/// One full frame of lane lighting: each cell is dark or a palette color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightFrame {
    cells: [[Option<LaneColor>; LEDS_PER_LANE]; LANE_COUNT],
}

impl LightFrame {
    /// All cells dark
    pub fn dark() -> Self {
        Self {
            cells: [[None; LEDS_PER_LANE]; LANE_COUNT],
        }
    }

    /// Light a single cell; out-of-range indices are ignored
    pub fn set(&mut self, lane: LaneId, index: usize, color: LaneColor) {
        if index < LEDS_PER_LANE {
            self.cells[lane.index()][index] = Some(color);
        }
    }

    /// Color of a single cell, if lit
    pub fn get(&self, lane: LaneId, index: usize) -> Option<LaneColor> {
        self.cells[lane.index()].get(index).copied().flatten()
    }

    /// Darken an entire lane
    pub fn clear_lane(&mut self, lane: LaneId) {
        self.cells[lane.index()] = [None; LEDS_PER_LANE];
    }

    /// All cells of one lane, in strip order
    pub fn lane_cells(&self, lane: LaneId) -> &[Option<LaneColor>; LEDS_PER_LANE] {
        &self.cells[lane.index()]
    }

    /// Number of lit cells across the whole frame
    pub fn lit_count(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|lane| lane.iter())
            .filter(|cell| cell.is_some())
            .count()
    }
}

impl Default for LightFrame {
    fn default() -> Self {
        Self::dark()
    }
}

/// Renders full light frames. `apply` stages the buffer, `show` flushes it.
pub trait LightDriver {
    /// Stage a frame
    fn apply(&mut self, frame: &LightFrame);
    /// Flush the staged frame to the output
    fn show(&mut self);
}

/// Renders a score or a 4-character string.
///
/// Representability is the implementation's concern (the hardware blanked
/// characters its segment table could not encode); there is no error path.
pub trait DisplaySink {
    /// Show a decimal score
    fn show_number(&mut self, value: i32);
    /// Show a 4-character string
    fn show_text(&mut self, text: [char; 4]);
}

/// Discards all output
#[derive(Debug, Default)]
pub struct NullBoard;

impl LightDriver for NullBoard {
    fn apply(&mut self, _frame: &LightFrame) {}
    fn show(&mut self) {}
}

impl DisplaySink for NullBoard {
    fn show_number(&mut self, _value: i32) {}
    fn show_text(&mut self, _text: [char; 4]) {}
}

/// Records every call for assertions in tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingBoard {
    /// Call log entries in arrival order
    pub calls: Vec<BoardCall>,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum BoardCall {
    Apply(usize),
    Show,
    Number(i32),
    Text(String),
}

#[cfg(test)]
impl LightDriver for RecordingBoard {
    fn apply(&mut self, frame: &LightFrame) {
        self.calls.push(BoardCall::Apply(frame.lit_count()));
    }

    fn show(&mut self) {
        self.calls.push(BoardCall::Show);
    }
}

#[cfg(test)]
impl DisplaySink for RecordingBoard {
    fn show_number(&mut self, value: i32) {
        self.calls.push(BoardCall::Number(value));
    }

    fn show_text(&mut self, text: [char; 4]) {
        self.calls.push(BoardCall::Text(text.iter().collect()));
    }
}
