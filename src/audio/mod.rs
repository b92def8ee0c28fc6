// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Tone playback for hit feedback and scheduled notes.
//!
//! This module provides:
//! - Additive synth voices with attack/release envelopes
//! - Audio output via cpal
//! - A null sink so every mode keeps running without a device

pub mod output;
pub mod synth;

pub use output::{AudioConfig, AudioOutput};
pub use synth::{ToneBank, ToneVoice};

use std::sync::{Arc, Mutex};

use tracing::warn;

/// Anything that can sound a tone of a given frequency and length
pub trait ToneSink {
    /// Begin a tone; it overlaps tones already sounding
    fn play(&mut self, freq_hz: u32, duration_ms: u64);
    /// Cut everything currently sounding
    fn silence(&mut self);
}

/// Discards every tone; used when audio is disabled or unavailable
#[derive(Debug, Default)]
pub struct NullToneSink;

impl ToneSink for NullToneSink {
    fn play(&mut self, _freq_hz: u32, _duration_ms: u64) {}

    fn silence(&mut self) {}
}

/// Tone engine combining the synth bank and the output stream
pub struct ToneEngine {
    /// Voice mixer shared with the audio callback
    bank: Arc<Mutex<ToneBank>>,
    /// Audio output
    output: Option<AudioOutput>,
    /// Whether audio is running
    running: bool,
    /// Sample rate
    sample_rate: u32,
    /// Buffer size in frames
    buffer_size: u32,
}

impl ToneEngine {
    /// Create a new tone engine
    pub fn new() -> Self {
        Self::with_config(44_100, 512)
    }

    /// Create with custom sample rate and buffer size
    pub fn with_config(sample_rate: u32, buffer_size: u32) -> Self {
        Self {
            bank: Arc::new(Mutex::new(ToneBank::new(sample_rate))),
            output: None,
            running: false,
            sample_rate,
            buffer_size: buffer_size.clamp(64, 4096),
        }
    }

    /// Start audio output
    pub fn start(&mut self) -> Result<(), AudioError> {
        if self.running {
            return Ok(());
        }

        let config = AudioConfig {
            sample_rate: self.sample_rate,
            buffer_size: self.buffer_size,
            channels: 2,
        };

        let bank = Arc::clone(&self.bank);
        let output = AudioOutput::new(config, move |buffer, channels| {
            if let Ok(mut bank) = bank.lock() {
                bank.render(buffer, channels);
            }
        })?;

        self.output = Some(output);
        self.running = true;
        Ok(())
    }

    /// Stop audio output
    pub fn stop(&mut self) {
        self.output = None;
        self.running = false;
    }

    /// Check if running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Voices currently sounding
    pub fn active_voices(&self) -> usize {
        self.bank.lock().map(|bank| bank.active_voices()).unwrap_or(0)
    }
}

impl ToneSink for ToneEngine {
    fn play(&mut self, freq_hz: u32, duration_ms: u64) {
        if !self.running {
            return;
        }
        match self.bank.lock() {
            Ok(mut bank) => bank.start(freq_hz, duration_ms),
            Err(_) => warn!(freq_hz, "tone skipped, voice bank lock failed"),
        }
    }

    fn silence(&mut self) {
        if let Ok(mut bank) = self.bank.lock() {
            bank.silence();
        }
    }
}

impl Default for ToneEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the best available sink: a running tone engine, or the null sink
/// with a logged warning when no device can be opened. Tones degrade to
/// silence, they never take the program down.
pub fn open_sink(enabled: bool, sample_rate: u32, buffer_size: u32) -> Box<dyn ToneSink> {
    if !enabled {
        return Box::new(NullToneSink);
    }
    let mut engine = ToneEngine::with_config(sample_rate, buffer_size);
    match engine.start() {
        Ok(()) => Box::new(engine),
        Err(err) => {
            warn!(%err, "audio unavailable, tones disabled");
            Box::new(NullToneSink)
        }
    }
}

/// Audio error types
#[derive(Debug, Clone)]
pub enum AudioError {
    /// Failed to initialize audio
    InitFailed(String),
    /// Failed to start audio stream
    StreamFailed(String),
    /// No audio device available
    NoDevice,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::InitFailed(msg) => write!(f, "audio initialization failed: {}", msg),
            AudioError::StreamFailed(msg) => write!(f, "audio stream failed: {}", msg),
            AudioError::NoDevice => write!(f, "no audio device available"),
        }
    }
}

impl std::error::Error for AudioError {}
