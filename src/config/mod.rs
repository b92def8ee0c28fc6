// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system.
//!
//! Song tables load from YAML and convert into validated schedules; game
//! and audio settings load from TOML. Parse errors surface with file
//! context, table errors with the offending entry's index.

pub mod watcher;

pub use watcher::{load_schedule, SongEvent, SongWatcher};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::game::lane::LaneId;
use crate::game::GameRules;
use crate::schedule::{Schedule, ScheduleError, TimedEvent};

/// Root configuration for a song file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongFile {
    /// Song metadata
    pub song: SongConfig,
    /// Event rows in playback order
    #[serde(default)]
    pub events: Vec<EventRow>,
}

impl SongFile {
    /// Load a song from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read song file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a song from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML song")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize song to YAML")
    }

    /// Save the song to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write song file: {:?}", path.as_ref()))
    }

    /// Convert the rows into a validated schedule
    pub fn into_schedule(self) -> Result<Schedule, ScheduleError> {
        let mut events = Vec::with_capacity(self.events.len());
        for (index, row) in self.events.into_iter().enumerate() {
            let lane = match row.lane {
                None => None,
                Some(raw) => Some(
                    LaneId::new(raw).ok_or(ScheduleError::LaneOutOfRange { index, lane: raw })?,
                ),
            };
            events.push(TimedEvent {
                lane,
                start_ms: row.start_ms,
                duration_ms: row.duration_ms,
            });
        }
        Schedule::new(self.song.name, events)
    }
}

/// Song-level metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongConfig {
    /// Song name
    pub name: String,
    /// Tempo in BPM; informational, timing lives in the rows
    #[serde(default = "default_tempo")]
    pub tempo: f64,
}

fn default_tempo() -> f64 {
    120.0
}

impl Default for SongConfig {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            tempo: default_tempo(),
        }
    }
}

/// One schedule row: a note on a lane, or a rest when `lane` is omitted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRow {
    /// Lane index 0-3; omit for a rest sentinel
    #[serde(default)]
    pub lane: Option<u8>,
    /// Offset from song start, in milliseconds
    pub start_ms: u64,
    /// Entry length in milliseconds
    pub duration_ms: u64,
}

/// Runtime settings, loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Game timing
    #[serde(default)]
    pub game: GameSettings,
    /// Audio output
    #[serde(default)]
    pub audio: AudioSettings,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read settings file: {:?}", path.as_ref()))?;
        Self::from_toml(&contents)
    }

    /// Parse settings from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text).context("Failed to parse TOML settings")?;
        if settings.game.round_timeout_min_ms > settings.game.round_timeout_max_ms {
            anyhow::bail!(
                "round_timeout_min_ms ({}) exceeds round_timeout_max_ms ({})",
                settings.game.round_timeout_min_ms,
                settings.game.round_timeout_max_ms
            );
        }
        Ok(settings)
    }
}

/// Game timing settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSettings {
    /// Session length in milliseconds
    #[serde(default = "default_session_ms")]
    pub session_ms: u64,
    /// Lower bound for the per-round position timeout
    #[serde(default = "default_timeout_min_ms")]
    pub round_timeout_min_ms: u64,
    /// Upper bound for the per-round position timeout, inclusive
    #[serde(default = "default_timeout_max_ms")]
    pub round_timeout_max_ms: u64,
    /// Dark gap between rounds
    #[serde(default = "default_pause_ms")]
    pub inter_round_pause_ms: u64,
    /// Feedback tone length on a hit
    #[serde(default = "default_hit_tone_ms")]
    pub hit_tone_ms: u64,
}

fn default_session_ms() -> u64 {
    10_000
}
fn default_timeout_min_ms() -> u64 {
    150
}
fn default_timeout_max_ms() -> u64 {
    500
}
fn default_pause_ms() -> u64 {
    1_000
}
fn default_hit_tone_ms() -> u64 {
    200
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            session_ms: default_session_ms(),
            round_timeout_min_ms: default_timeout_min_ms(),
            round_timeout_max_ms: default_timeout_max_ms(),
            inter_round_pause_ms: default_pause_ms(),
            hit_tone_ms: default_hit_tone_ms(),
        }
    }
}

impl GameSettings {
    /// Convert to the session controller's rules
    pub fn to_rules(&self) -> GameRules {
        GameRules {
            session_ms: self.session_ms,
            round_timeout_min_ms: self.round_timeout_min_ms,
            round_timeout_max_ms: self.round_timeout_max_ms,
            inter_round_pause_ms: self.inter_round_pause_ms,
            hit_tone_ms: self.hit_tone_ms,
        }
    }
}

/// Audio output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudioSettings {
    /// Master enable; off means the null sink
    #[serde(default = "default_audio_enabled")]
    pub enabled: bool,
    /// Sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Buffer size in frames
    #[serde(default = "default_buffer_size")]
    pub buffer_size: u32,
}

fn default_audio_enabled() -> bool {
    true
}
fn default_sample_rate() -> u32 {
    44_100
}
fn default_buffer_size() -> u32 {
    512
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: default_audio_enabled(),
            sample_rate: default_sample_rate(),
            buffer_size: default_buffer_size(),
        }
    }
}
