//! Musical time in quarter notes and the 16th-note step grid.
//!
//! Host timestamps, onsets and durations are all expressed in quarter notes
//! (PPQ units). Grid positions are 16th-note steps: four per quarter note,
//! 32 per two-bar loop.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Number of 16th-note steps in the groove loop (two bars of 4/4).
pub const GRID_STEPS: usize = 32;

/// Length of one 16th-note step in quarter notes.
pub const STEP_LENGTH: f64 = 0.25;

/// Half a step, the largest distance an onset can sit from its nearest step.
pub const HALF_STEP: f64 = 0.125;

/// Loop length in quarter notes (32 steps at 16th-note resolution).
pub const LOOP_LENGTH: f64 = GRID_STEPS as f64 * STEP_LENGTH;

/// A position or duration measured in quarter notes.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuarterNotes(f64);

impl QuarterNotes {
    /// The start of the loop.
    pub const ZERO: QuarterNotes = QuarterNotes(0.0);

    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Onset of a grid step displaced by `offset` steps (`offset` in [-0.5, 0.5]).
    pub fn from_step(step: usize, offset: f32) -> Self {
        Self((step as f64 + offset as f64) * STEP_LENGTH)
    }

    /// Raw value in quarter notes.
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Index of the nearest 16th-note step, wrapped into the loop.
    ///
    /// Rounds half away from zero, so 0.125 qn lands on step 1. Negative
    /// times wrap from the end of the loop.
    pub fn grid_step(self) -> usize {
        (self.0 / STEP_LENGTH)
            .round()
            .rem_euclid(GRID_STEPS as f64) as usize
    }

    /// Displacement from the nearest step, as a fraction of a step in [-0.5, 0.5].
    pub fn step_offset(self) -> f64 {
        let steps = self.0 / STEP_LENGTH;
        (steps - steps.round()).clamp(-0.5, 0.5)
    }

    /// Convert to MIDI ticks at the given resolution. Negative positions clamp to zero.
    pub fn to_ticks(self, ticks_per_quarter: u16) -> u32 {
        (self.0.max(0.0) * ticks_per_quarter as f64).round() as u32
    }
}

impl Add for QuarterNotes {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for QuarterNotes {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}
