// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Edge-latched button sampling.
//!
//! Eight logical lines: four lane buttons and four navigation buttons.
//! The host feeds instantaneous levels; `consume_edge` reports a
//! released→pressed transition at most once per physical press, and the
//! latch clears only when the line returns to released. A held button can
//! never register twice.

pub mod keyboard;

pub use keyboard::KeyMap;

use crate::game::lane::{LaneId, LANE_COUNT};

/// Navigation button directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavDir {
    Up,
    Down,
    Left,
    Right,
}

impl NavDir {
    /// All directions in matrix order
    pub const ALL: [NavDir; 4] = [NavDir::Up, NavDir::Down, NavDir::Left, NavDir::Right];

    fn slot_offset(self) -> usize {
        match self {
            NavDir::Up => 0,
            NavDir::Down => 1,
            NavDir::Left => 2,
            NavDir::Right => 3,
        }
    }
}

/// A logical input line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// One of the four lane buttons
    Lane(LaneId),
    /// One of the four navigation buttons
    Nav(NavDir),
}

impl Button {
    /// Total number of lines in the matrix
    pub const COUNT: usize = LANE_COUNT + 4;

    /// All lines in matrix order: lanes first, then navigation
    pub const ALL: [Button; Button::COUNT] = [
        Button::Lane(LaneId::ALL[0]),
        Button::Lane(LaneId::ALL[1]),
        Button::Lane(LaneId::ALL[2]),
        Button::Lane(LaneId::ALL[3]),
        Button::Nav(NavDir::Up),
        Button::Nav(NavDir::Down),
        Button::Nav(NavDir::Left),
        Button::Nav(NavDir::Right),
    ];

    /// Index of this line within the matrix
    fn slot(self) -> usize {
        match self {
            Button::Lane(id) => id.index(),
            Button::Nav(dir) => LANE_COUNT + dir.slot_offset(),
        }
    }

    /// Whether this is a lane button
    pub fn is_lane(self) -> bool {
        matches!(self, Button::Lane(_))
    }
}

/// Per-line latch state
#[derive(Debug, Clone, Copy, Default)]
struct EdgeLatch {
    /// Last observed logical level (true = pressed)
    level: bool,
    /// Whether the current press has already been reported
    handled: bool,
}

/// Edge-latched view of all input lines.
///
/// Levels are fed by the host (hardware poll or simulator keystrokes);
/// consumers read either the instantaneous level or the once-per-press edge.
#[derive(Debug, Default)]
pub struct ButtonMatrix {
    latches: [EdgeLatch; Button::COUNT],
}

impl ButtonMatrix {
    /// All lines released, no pending edges
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the instantaneous level of a line (true = pressed).
    ///
    /// Releasing a line re-arms its edge latch.
    pub fn set_level(&mut self, button: Button, pressed: bool) {
        let latch = &mut self.latches[button.slot()];
        latch.level = pressed;
        if !pressed {
            latch.handled = false;
        }
    }

    /// Instantaneous logical level of a line
    pub fn is_pressed(&self, button: Button) -> bool {
        self.latches[button.slot()].level
    }

    /// Report a released→pressed transition, at most once per physical press.
    ///
    /// The latch stays set until the line returns to released, so a held
    /// button yields exactly one edge.
    pub fn consume_edge(&mut self, button: Button) -> bool {
        let latch = &mut self.latches[button.slot()];
        if latch.level && !latch.handled {
            latch.handled = true;
            true
        } else {
            false
        }
    }

    /// Consume the first pending edge on any line, in matrix order
    pub fn consume_any(&mut self) -> Option<Button> {
        for button in Button::ALL {
            if self.consume_edge(button) {
                return Some(button);
            }
        }
        None
    }

    /// Consume the first pending edge among the lane buttons
    pub fn consume_any_lane(&mut self) -> Option<LaneId> {
        for id in LaneId::ALL {
            if self.consume_edge(Button::Lane(id)) {
                return Some(id);
            }
        }
        None
    }

    /// Drop all pending edges by marking currently pressed lines handled.
    ///
    /// Called at phase boundaries so a press from the previous phase cannot
    /// act in the new one.
    pub fn absorb(&mut self) {
        for latch in self.latches.iter_mut() {
            latch.handled = latch.level;
        }
    }
}
