// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Lane table: the fixed mapping from lane index to strip color and tone.
//!
//! Components index into `Lane::TABLE` instead of branching per lane, so
//! adding or recoloring a lane is a table edit, not a code change.

use std::fmt;

/// Number of lanes on the board
pub const LANE_COUNT: usize = 4;

/// Number of addressable LEDs in each lane's strip
pub const LEDS_PER_LANE: usize = 5;

/// Identifies one LED strip + button pairing
///
/// Only indices below `LANE_COUNT` are representable; construction from raw
/// numbers is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaneId(u8);

impl LaneId {
    /// All lanes in board order
    pub const ALL: [LaneId; LANE_COUNT] = [LaneId(0), LaneId(1), LaneId(2), LaneId(3)];

    /// Create from a raw index, if in range
    pub fn new(index: u8) -> Option<Self> {
        if (index as usize) < LANE_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Zero-based lane index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lane {}", self.0)
    }
}

/// Colors of the fixed lane palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneColor {
    Red,
    Green,
    Blue,
    Yellow,
}

impl LaneColor {
    /// RGB triple for rendering
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            LaneColor::Red => (255, 0, 0),
            LaneColor::Green => (0, 255, 0),
            LaneColor::Blue => (0, 0, 255),
            LaneColor::Yellow => (255, 255, 0),
        }
    }
}

impl fmt::Display for LaneColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneColor::Red => write!(f, "red"),
            LaneColor::Green => write!(f, "green"),
            LaneColor::Blue => write!(f, "blue"),
            LaneColor::Yellow => write!(f, "yellow"),
        }
    }
}

/// One lane's static attributes
#[derive(Debug, Clone, Copy)]
pub struct Lane {
    /// Lane identity
    pub id: LaneId,
    /// Strip color
    pub color: LaneColor,
    /// Tone frequency sounded for this lane's hits and notes
    pub tone_hz: u32,
}

impl Lane {
    /// The board's lane table: red/green/blue/yellow strips sounding
    /// C5/E5/G5/C6.
    pub const TABLE: [Lane; LANE_COUNT] = [
        Lane {
            id: LaneId(0),
            color: LaneColor::Red,
            tone_hz: 523,
        },
        Lane {
            id: LaneId(1),
            color: LaneColor::Green,
            tone_hz: 659,
        },
        Lane {
            id: LaneId(2),
            color: LaneColor::Blue,
            tone_hz: 784,
        },
        Lane {
            id: LaneId(3),
            color: LaneColor::Yellow,
            tone_hz: 1047,
        },
    ];

    /// Look up a lane's attributes by id
    pub fn get(id: LaneId) -> &'static Lane {
        &Self::TABLE[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_id_range() {
        assert!(LaneId::new(0).is_some());
        assert!(LaneId::new(3).is_some());
        assert!(LaneId::new(4).is_none());
        assert!(LaneId::new(255).is_none());
    }

    #[test]
    fn test_lane_table_order() {
        let colors: Vec<LaneColor> = Lane::TABLE.iter().map(|l| l.color).collect();
        assert_eq!(
            colors,
            vec![
                LaneColor::Red,
                LaneColor::Green,
                LaneColor::Blue,
                LaneColor::Yellow
            ]
        );

        for (i, lane) in Lane::TABLE.iter().enumerate() {
            assert_eq!(lane.id.index(), i);
        }
    }

    #[test]
    fn test_lane_tones_ascend() {
        let freqs: Vec<u32> = Lane::TABLE.iter().map(|l| l.tone_hz).collect();
        assert_eq!(freqs, vec![523, 659, 784, 1047]);
    }

    #[test]
    fn test_lane_lookup() {
        let lane = Lane::get(LaneId::ALL[2]);
        assert_eq!(lane.color, LaneColor::Blue);
        assert_eq!(lane.tone_hz, 784);
    }

    #[test]
    fn test_lane_display() {
        assert_eq!(LaneId::ALL[1].to_string(), "lane 1");
        assert_eq!(LaneColor::Yellow.to_string(), "yellow");
    }
}
