// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Additive tone synthesis for hit feedback and scheduled notes.
//!
//! Each tone is four stacked harmonics under a linear attack/release
//! envelope. Voices are mixed by a `ToneBank` that lives behind a mutex
//! shared with the audio callback; everything here is pure sample math and
//! runs in tests without a device.

use std::f32::consts::TAU;

/// Master gain applied after harmonic summing
const GAIN: f32 = 0.35;
/// Linear attack length in seconds
const ATTACK_SECS: f32 = 0.02;
/// Release tail as a fraction of the tone's length
const RELEASE_FRACTION: f32 = 0.2;
/// Level of each harmonic, fundamental first
const HARMONICS: [f32; 4] = [0.4, 0.3, 0.2, 0.1];

/// One sounding tone
#[derive(Debug, Clone)]
pub struct ToneVoice {
    freq_hz: f32,
    duration_secs: f32,
    elapsed_secs: f32,
    sample_step: f32,
}

impl ToneVoice {
    /// Start a voice at the given frequency for `duration_ms`
    pub fn new(freq_hz: u32, duration_ms: u64, sample_rate: u32) -> Self {
        Self {
            freq_hz: freq_hz as f32,
            duration_secs: duration_ms as f32 / 1000.0,
            elapsed_secs: 0.0,
            sample_step: 1.0 / sample_rate as f32,
        }
    }

    /// Whether the voice has played out
    pub fn finished(&self) -> bool {
        self.elapsed_secs >= self.duration_secs
    }

    /// Envelope level at `t` seconds: linear attack, flat sustain, linear
    /// release over the final fifth of the tone
    fn envelope(&self, t: f32) -> f32 {
        let release_secs = self.duration_secs * RELEASE_FRACTION;
        if t < ATTACK_SECS {
            t / ATTACK_SECS
        } else if t > self.duration_secs - release_secs {
            ((self.duration_secs - t) / release_secs).max(0.0)
        } else {
            1.0
        }
    }

    fn amplitude(&self, t: f32) -> f32 {
        let mut sum = 0.0;
        for (i, level) in HARMONICS.iter().enumerate() {
            let harmonic = (i + 1) as f32;
            sum += level * (TAU * self.freq_hz * harmonic * t).sin();
        }
        sum * self.envelope(t) * GAIN
    }

    /// Produce the next sample and advance the voice
    pub fn next_sample(&mut self) -> f32 {
        if self.finished() {
            return 0.0;
        }
        let sample = self.amplitude(self.elapsed_secs);
        self.elapsed_secs += self.sample_step;
        sample
    }
}

/// Mixer over every currently sounding voice
#[derive(Debug)]
pub struct ToneBank {
    voices: Vec<ToneVoice>,
    sample_rate: u32,
}

impl ToneBank {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            voices: Vec::new(),
            sample_rate,
        }
    }

    /// Begin a tone; it overlaps anything already sounding
    pub fn start(&mut self, freq_hz: u32, duration_ms: u64) {
        self.voices
            .push(ToneVoice::new(freq_hz, duration_ms, self.sample_rate));
    }

    /// Number of voices still sounding
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Cut every voice immediately
    pub fn silence(&mut self) {
        self.voices.clear();
    }

    /// Mix all voices into an interleaved buffer, the same signal on every
    /// channel, then drop voices that finished
    pub fn render(&mut self, buffer: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        for frame in buffer.chunks_mut(channels) {
            let mut mixed = 0.0;
            for voice in self.voices.iter_mut() {
                mixed += voice.next_sample();
            }
            for sample in frame.iter_mut() {
                *sample = mixed;
            }
        }
        self.voices.retain(|voice| !voice.finished());
    }
}
