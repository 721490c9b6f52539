//! Model input layout — the 32×27 tensor the encoder expects.
//!
//! The encoder was trained on 9-voice hit/velocity/offset frames (27 channels).
//! A groove only fills one voice slot per channel group; the rest is zero
//! padding that keeps the input shape the model was traced with.

use crate::event::GRID_STEPS;

use super::grid::GrooveGrid;

/// Channels per step in the model input.
pub const INPUT_CHANNELS: usize = 27;

/// Channel receiving groove hits.
pub const HIT_CHANNEL: usize = 2;

/// Channel receiving groove velocities.
pub const VELOCITY_CHANNEL: usize = 11;

/// Channel receiving groove offsets.
pub const OFFSET_CHANNEL: usize = 20;

/// Encoder input: one 27-channel frame per step.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInput {
    frames: [[f32; INPUT_CHANNELS]; GRID_STEPS],
}

impl ModelInput {
    /// An all-zero input.
    pub fn zeros() -> Self {
        Self {
            frames: [[0.0; INPUT_CHANNELS]; GRID_STEPS],
        }
    }

    /// Lay the grid's three channels into their fixed slots.
    pub fn from_grid(grid: &GrooveGrid) -> Self {
        let mut input = Self::zeros();
        for (step, frame) in input.frames.iter_mut().enumerate() {
            frame[HIT_CHANNEL] = grid.hits()[step];
            frame[VELOCITY_CHANNEL] = grid.velocities()[step];
            frame[OFFSET_CHANNEL] = grid.offsets()[step];
        }
        input
    }

    pub fn get(&self, step: usize, channel: usize) -> f32 {
        self.frames[step][channel]
    }

    pub fn frames(&self) -> &[[f32; INPUT_CHANNELS]; GRID_STEPS] {
        &self.frames
    }

    /// Row-major copy, the layout a `[1, 32, 27]` tensor constructor takes.
    pub fn to_flat(&self) -> Vec<f32> {
        self.frames.iter().flatten().copied().collect()
    }
}
