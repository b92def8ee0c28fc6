// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing and clock module.
//!
//! This module provides the monotonic millisecond clock abstraction and
//! deadline values used by every tick-driven component.

pub mod clock;

pub use clock::{Clock, Deadline, ManualClock, SystemClock};
