// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Keyboard bindings for the simulator.
//!
//! Maps terminal key codes onto the board's logical button lines. Lane
//! buttons sit on both the number row and the home row so either hand
//! position works; navigation uses the arrow keys.

use std::collections::HashMap;

use crossterm::event::KeyCode;

use super::{Button, NavDir};
use crate::game::lane::LaneId;

/// Key-to-button mapping used by the simulator loop
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<KeyCode, Button>,
}

impl KeyMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create a map with the default bindings
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        map.add_default_bindings();
        map
    }

    fn add_default_bindings(&mut self) {
        let home_row = ['a', 's', 'd', 'f'];
        for (i, id) in LaneId::ALL.into_iter().enumerate() {
            let digit = char::from_digit(i as u32 + 1, 10).unwrap();
            self.bind(KeyCode::Char(digit), Button::Lane(id));
            self.bind(KeyCode::Char(home_row[i]), Button::Lane(id));
        }

        self.bind(KeyCode::Up, Button::Nav(NavDir::Up));
        self.bind(KeyCode::Down, Button::Nav(NavDir::Down));
        self.bind(KeyCode::Left, Button::Nav(NavDir::Left));
        self.bind(KeyCode::Right, Button::Nav(NavDir::Right));
    }

    /// Bind a key to a button line, replacing any previous binding
    pub fn bind(&mut self, code: KeyCode, button: Button) {
        self.bindings.insert(code, button);
    }

    /// Remove a binding
    pub fn unbind(&mut self, code: KeyCode) -> Option<Button> {
        self.bindings.remove(&code)
    }

    /// Resolve a key code to its bound button line
    pub fn resolve(&self, code: KeyCode) -> Option<Button> {
        self.bindings.get(&code).copied()
    }

    /// Number of bound keys
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no keys are bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Format a button line for help display
pub fn button_label(button: Button) -> String {
    match button {
        Button::Lane(id) => format!("lane {}", id.index() + 1),
        Button::Nav(NavDir::Up) => "up".to_string(),
        Button::Nav(NavDir::Down) => "down".to_string(),
        Button::Nav(NavDir::Left) => "left".to_string(),
        Button::Nav(NavDir::Right) => "right".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lane_bindings() {
        let map = KeyMap::with_defaults();

        for (i, id) in LaneId::ALL.into_iter().enumerate() {
            let digit = char::from_digit(i as u32 + 1, 10).unwrap();
            assert_eq!(map.resolve(KeyCode::Char(digit)), Some(Button::Lane(id)));
        }

        assert_eq!(
            map.resolve(KeyCode::Char('a')),
            Some(Button::Lane(LaneId::ALL[0]))
        );
        assert_eq!(
            map.resolve(KeyCode::Char('f')),
            Some(Button::Lane(LaneId::ALL[3]))
        );
    }

    #[test]
    fn test_default_nav_bindings() {
        let map = KeyMap::with_defaults();
        assert_eq!(map.resolve(KeyCode::Up), Some(Button::Nav(NavDir::Up)));
        assert_eq!(map.resolve(KeyCode::Down), Some(Button::Nav(NavDir::Down)));
        assert_eq!(map.resolve(KeyCode::Left), Some(Button::Nav(NavDir::Left)));
        assert_eq!(
            map.resolve(KeyCode::Right),
            Some(Button::Nav(NavDir::Right))
        );
    }

    #[test]
    fn test_unbound_key_resolves_none() {
        let map = KeyMap::with_defaults();
        assert_eq!(map.resolve(KeyCode::Char('z')), None);
    }

    #[test]
    fn test_bind_and_unbind() {
        let mut map = KeyMap::new();
        assert!(map.is_empty());

        map.bind(KeyCode::Char('x'), Button::Nav(NavDir::Up));
        assert_eq!(map.resolve(KeyCode::Char('x')), Some(Button::Nav(NavDir::Up)));
        assert_eq!(map.len(), 1);

        map.unbind(KeyCode::Char('x'));
        assert_eq!(map.resolve(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_button_labels() {
        assert_eq!(button_label(Button::Lane(LaneId::ALL[0])), "lane 1");
        assert_eq!(button_label(Button::Nav(NavDir::Left)), "left");
    }
}
