// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for WHACK
//!
//! These tests verify that the timing, scoring, and scheduling rules hold
//! together over full simulated runs. The crate builds a binary, so the
//! tests model the core arithmetic directly: edge latching, round deltas,
//! session expiry, half-open schedule membership, and the sweep index.

const LANE_COUNT: usize = 4;
const LEDS_PER_LANE: usize = 5;

/// One button line's edge latch: last level plus a handled flag.
/// Mirrors the sampler contract: one edge per physical press, cleared
/// only after the line returns to released.
#[derive(Default, Clone, Copy)]
struct EdgeLatch {
    level: bool,
    handled: bool,
}

impl EdgeLatch {
    fn set_level(&mut self, pressed: bool) {
        self.level = pressed;
        if !pressed {
            self.handled = false;
        }
    }

    fn consume_edge(&mut self) -> bool {
        if self.level && !self.handled {
            self.handled = true;
            true
        } else {
            false
        }
    }
}

/// Test that a held press registers exactly one edge until release
#[test]
fn test_edge_latch_over_held_press() {
    let mut lines = [EdgeLatch::default(); LANE_COUNT + 4];

    // Hold line 2 down across many ticks
    for tick in 0..50 {
        lines[2].set_level(true);
        let edges: usize = lines.iter_mut().map(|l| l.consume_edge() as usize).sum();
        if tick == 0 {
            assert_eq!(edges, 1, "first tick reports the edge");
        } else {
            assert_eq!(edges, 0, "held press must not repeat at tick {tick}");
        }
    }

    // Release, then a second press reports again
    lines[2].set_level(false);
    assert!(!lines[2].consume_edge());
    lines[2].set_level(true);
    assert!(lines[2].consume_edge());
}

/// Test that score is the exact sum of round deltas, unclamped
#[test]
fn test_score_is_sum_of_deltas() {
    // Round scoring: hit index 0 -> +2, index 1 -> +1, anything else or a
    // full miss -> -2
    fn delta_for(hit: Option<usize>) -> i32 {
        match hit {
            Some(0) => 2,
            Some(1) => 1,
            _ => -2,
        }
    }

    let rounds = [
        Some(0),
        Some(1),
        Some(4),
        None,
        Some(0),
        None,
        None,
        Some(2),
        Some(1),
        None,
    ];

    let mut score = 0i32;
    for hit in rounds {
        score += delta_for(hit);
    }

    // +2 +1 -2 -2 +2 -2 -2 -2 +1 -2 = -6: negative totals are legal
    assert_eq!(score, -6);
    assert_eq!(score, rounds.iter().map(|h| delta_for(*h)).sum::<i32>());
}

/// Test that a session expires exactly at its duration, once
#[test]
fn test_session_expiry_boundary() {
    let session_ms = 10_000u64;
    let start_ms = 750u64;
    let deadline = start_ms + session_ms;

    let mut expirations = 0;
    let mut active = true;

    // Tick every 5ms across the boundary
    for step in 0..4000u64 {
        let now = start_ms + step * 5;
        if active && now >= deadline {
            active = false;
            expirations += 1;
            assert!(now >= deadline, "never early");
            assert_eq!(now, deadline, "5ms ticks land exactly on the deadline");
        }
    }

    assert_eq!(expirations, 1);
    assert!(!active);
}

/// Test name and cursor wraparound arithmetic
#[test]
fn test_name_entry_wraparound() {
    // Characters are 0..26 with mod arithmetic
    let next = |c: u8| (c + 1) % 26;
    let prev = |c: u8| (c + 25) % 26;

    let z = 25u8;
    assert_eq!(next(z), 0, "Z wraps to A");
    assert_eq!(prev(0), z, "A wraps to Z");

    // A full lap in either direction returns home
    let mut c = 7u8;
    for _ in 0..26 {
        c = next(c);
    }
    assert_eq!(c, 7);
    for _ in 0..26 {
        c = prev(c);
    }
    assert_eq!(c, 7);

    // Cursor is 0..4 with the same arithmetic
    let right = |s: u8| (s + 1) % 4;
    let left = |s: u8| (s + 3) % 4;
    assert_eq!(right(3), 0);
    assert_eq!(left(0), 3);
}

/// Test half-open membership for overlapping schedule entries
#[test]
fn test_schedule_overlap_membership() {
    // Two notes on different lanes with overlapping windows
    let events: [(usize, u64, u64); 2] = [
        (0, 1_000, 500), // lane 0: [1000, 1500)
        (1, 1_250, 500), // lane 1: [1250, 1750)
    ];

    fn active_at(events: &[(usize, u64, u64)], elapsed: u64) -> Vec<usize> {
        events
            .iter()
            .filter(|(_, start, dur)| elapsed >= *start && elapsed < start + dur)
            .map(|(lane, _, _)| *lane)
            .collect()
    }

    assert_eq!(active_at(&events, 999), Vec::<usize>::new());
    assert_eq!(active_at(&events, 1_000), vec![0]);
    assert_eq!(active_at(&events, 1_249), vec![0]);
    // Both active across the intersection
    assert_eq!(active_at(&events, 1_250), vec![0, 1]);
    assert_eq!(active_at(&events, 1_499), vec![0, 1]);
    // Half-open: gone exactly at start+duration
    assert_eq!(active_at(&events, 1_500), vec![1]);
    assert_eq!(active_at(&events, 1_750), Vec::<usize>::new());
}

/// Test the sweep index formula over whole note windows
#[test]
fn test_sweep_index_formula() {
    // index = N-1 - floor(offset * N / duration), integer arithmetic
    fn lit_index(offset: u64, duration: u64) -> usize {
        let step = (offset * LEDS_PER_LANE as u64 / duration) as usize;
        LEDS_PER_LANE - 1 - step.min(LEDS_PER_LANE - 1)
    }

    // A 500ms note steps every 100ms, from LED 4 down to LED 0
    let expected = [
        (0u64, 4usize),
        (99, 4),
        (100, 3),
        (200, 2),
        (300, 1),
        (400, 0),
        (499, 0),
    ];
    for (offset, index) in expected {
        assert_eq!(lit_index(offset, 500), index, "offset {offset}");
    }

    // The index stays in range over any window, including awkward durations
    for duration in [1u64, 3, 7, 125, 250, 1_000, 10_000] {
        for offset in 0..duration {
            let index = lit_index(offset, duration);
            assert!(index < LEDS_PER_LANE);
        }
    }

    // Monotone: the index never moves upward as a note ages
    let mut last = LEDS_PER_LANE;
    for offset in 0..1_000u64 {
        let index = lit_index(offset, 1_000);
        assert!(index <= last);
        last = index;
    }
}

/// Test looping against a terminator entry
#[test]
fn test_schedule_looping() {
    let terminator_start = 32_000u64;
    let mut started_at = 0u64;
    let mut loops = 0u32;

    // Drive a wall clock in 10ms ticks through three full loops
    let mut now = 0u64;
    while loops < 3 {
        now += 10;
        let elapsed = now - started_at;
        if elapsed >= terminator_start {
            started_at = now;
            loops += 1;
            // The restart tick re-zeroes elapsed time
            assert_eq!(now - started_at, 0);
        }
    }

    assert_eq!(loops, 3);
    // Three loops of 32s land the restart on a 32s multiple
    assert_eq!(started_at, 96_000);
}

/// Test follow-mode scoring over one note's lifetime
#[test]
fn test_follow_scoring_lifecycle() {
    // Hit deltas by lit index, plus the miss penalty
    fn hit_delta(lit_index: usize) -> i32 {
        match lit_index {
            0 => 10,
            1 => 5,
            2 => 2,
            _ => -1,
        }
    }
    const MISS_DELTA: i32 = -5;

    // A press at every lit position scores once; the note then ignores
    // further presses
    let mut score = 0i32;
    let mut hit = false;

    // Press while LED 1 shows
    if !hit {
        score += hit_delta(1);
        hit = true;
    }
    // A second press on the same note does nothing
    if !hit {
        score += hit_delta(0);
    }
    assert_eq!(score, 5);

    // A different note that ends unhit costs the miss penalty
    let second_note_hit = false;
    if !second_note_hit {
        score += MISS_DELTA;
    }
    assert_eq!(score, 0);

    // The full delta table
    assert_eq!(hit_delta(0), 10);
    assert_eq!(hit_delta(1), 5);
    assert_eq!(hit_delta(2), 2);
    assert_eq!(hit_delta(3), -1);
    assert_eq!(hit_delta(4), -1);
}

/// Test the round scan holds each position for the full timeout
#[test]
fn test_round_scan_schedule() {
    // Positions run last-to-first; each holds for the per-round timeout
    let timeout_ms = 300u64;
    let round_start = 5_000u64;

    let mut deadlines = Vec::new();
    let mut deadline = round_start + timeout_ms;
    for position in (0..LEDS_PER_LANE).rev() {
        deadlines.push((position, deadline));
        deadline += timeout_ms;
    }

    assert_eq!(deadlines.first(), Some(&(4, 5_300)));
    assert_eq!(deadlines.last(), Some(&(0, 6_500)));

    // A full miss consumes exactly positions * timeout
    let total = deadlines.last().map(|(_, d)| d - round_start);
    assert_eq!(total, Some(LEDS_PER_LANE as u64 * timeout_ms));
}

/// Test that per-round timeouts stay inside the configured bounds
#[test]
fn test_round_timeout_bounds() {
    let min_ms = 150u64;
    let max_ms = 500u64;

    // Any uniform draw maps into [min, max] inclusive
    for raw in 0..=1_000u64 {
        let timeout = min_ms + raw * (max_ms - min_ms) / 1_000;
        assert!(timeout >= min_ms);
        assert!(timeout <= max_ms);
    }
}
