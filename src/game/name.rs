// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Name-entry model: bounded cyclic character slots and cursor.
//!
//! Characters cycle through 'A'..='Z' and the cursor cycles across the four
//! slots, so stepping never needs a bounds check at the call site.

use std::fmt;

/// Number of character slots in a high-score name
pub const NAME_LEN: usize = 4;

/// A single name character, cycling through 'A'..='Z'
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameChar(u8);

impl NameChar {
    /// The letter 'A'
    pub const A: NameChar = NameChar(0);

    /// Create from an ASCII uppercase letter
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_uppercase() {
            Some(Self(c as u8 - b'A'))
        } else {
            None
        }
    }

    /// The letter as a `char`
    pub fn as_char(self) -> char {
        (b'A' + self.0) as char
    }

    /// Next letter, wrapping 'Z' to 'A'
    pub fn next(self) -> Self {
        Self((self.0 + 1) % 26)
    }

    /// Previous letter, wrapping 'A' to 'Z'
    pub fn prev(self) -> Self {
        Self((self.0 as i16 - 1).rem_euclid(26) as u8)
    }
}

impl Default for NameChar {
    fn default() -> Self {
        Self::A
    }
}

impl fmt::Display for NameChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Cursor over the name slots, wrapping at both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotCursor(u8);

impl SlotCursor {
    /// Zero-based slot index
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Move one slot right, wrapping past the last slot to the first
    pub fn right(self) -> Self {
        Self((self.0 + 1) % NAME_LEN as u8)
    }

    /// Move one slot left, wrapping past the first slot to the last
    pub fn left(self) -> Self {
        Self((self.0 + NAME_LEN as u8 - 1) % NAME_LEN as u8)
    }
}

/// The name-entry surface: four character slots plus a cursor.
///
/// Slot contents persist across sessions; they are only replaced by
/// explicit edits, never reset when entry reopens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameEntry {
    slots: [NameChar; NAME_LEN],
    cursor: SlotCursor,
}

impl NameEntry {
    /// Fresh entry surface: slots read "ABCD", cursor on the first slot
    pub fn new() -> Self {
        Self {
            slots: [NameChar(0), NameChar(1), NameChar(2), NameChar(3)],
            cursor: SlotCursor::default(),
        }
    }

    /// Current slot characters in order
    pub fn chars(&self) -> [char; NAME_LEN] {
        [
            self.slots[0].as_char(),
            self.slots[1].as_char(),
            self.slots[2].as_char(),
            self.slots[3].as_char(),
        ]
    }

    /// Index of the slot under the cursor
    pub fn cursor(&self) -> usize {
        self.cursor.index()
    }

    /// Step the character under the cursor forward (Up)
    pub fn increment(&mut self) {
        let i = self.cursor.index();
        self.slots[i] = self.slots[i].next();
    }

    /// Step the character under the cursor backward (Down)
    pub fn decrement(&mut self) {
        let i = self.cursor.index();
        self.slots[i] = self.slots[i].prev();
    }

    /// Move the cursor one slot right (Right)
    pub fn cursor_right(&mut self) {
        self.cursor = self.cursor.right();
    }

    /// Move the cursor one slot left (Left)
    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.left();
    }

    /// The four slots as a `String`
    pub fn as_string(&self) -> String {
        self.chars().iter().collect()
    }
}

impl Default for NameEntry {
    fn default() -> Self {
        Self::new()
    }
}
