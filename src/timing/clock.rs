// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Monotonic millisecond clock and deadline types.
//!
//! The game core never reads wall-clock time directly: the driver samples a
//! `Clock` once per tick and passes the millisecond count down, so every
//! timing property can be tested with `ManualClock` instead of real waits.

use std::time::Instant;

/// Monotonic millisecond time source.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by `std::time::Instant`.
///
/// The origin is captured at construction, so `now_ms` starts near zero and
/// only moves forward.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock with its origin at the current instant
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-advanced clock for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: u64,
}

impl ManualClock {
    /// Create a manual clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manual clock at a specific millisecond count
    pub fn at(ms: u64) -> Self {
        Self { now: ms }
    }

    /// Advance the clock by the given number of milliseconds
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }

    /// Jump the clock to an absolute millisecond count
    pub fn set(&mut self, ms: u64) {
        self.now = ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now
    }
}

/// An absolute expiry time held as data.
///
/// Replaces nested blocking wait loops: the owner stores the deadline and
/// compares it against `now` on each tick. Expiry is inclusive — a deadline
/// is expired exactly when `now >= expires_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at_ms: u64,
}

impl Deadline {
    /// Create a deadline `duration_ms` after `now_ms`
    pub fn after(now_ms: u64, duration_ms: u64) -> Self {
        Self {
            expires_at_ms: now_ms + duration_ms,
        }
    }

    /// Create a deadline at an absolute millisecond count
    pub fn at(expires_at_ms: u64) -> Self {
        Self { expires_at_ms }
    }

    /// Whether the deadline has expired at `now_ms`
    pub fn expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }

    /// Milliseconds until expiry (zero once expired)
    pub fn remaining(&self, now_ms: u64) -> u64 {
        self.expires_at_ms.saturating_sub(now_ms)
    }

    /// Absolute expiry time
    pub fn expires_at(&self) -> u64 {
        self.expires_at_ms
    }
}
