//! Groove quantizer — snaps incoming note-ons onto the 32-step grid.
//!
//! Each note-on lands on its nearest 16th-note step (wrapping modulo the loop)
//! and keeps its sub-step displacement as an offset. When two notes land on
//! the same step the louder one wins; on a tie the first one stays. Notes
//! with a non-finite time or velocity are dropped before they reach the grid.

use log::debug;

use crate::event::{HostPayload, NoteOn};

use super::grid::GrooveGrid;
use super::tensor::ModelInput;

/// What happened to a note-on when it was quantized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The step was empty and now holds the note.
    Written { step: usize },
    /// The step held a quieter note, which was replaced.
    Replaced { step: usize },
    /// The step already held a note at least as loud; the new one was dropped.
    Discarded { step: usize },
}

impl Placement {
    pub fn step(self) -> usize {
        match self {
            Placement::Written { step }
            | Placement::Replaced { step }
            | Placement::Discarded { step } => step,
        }
    }

    /// Whether the grid changed.
    pub fn mutated(self) -> bool {
        !matches!(self, Placement::Discarded { .. })
    }
}

/// Map a note-on to its grid step and offset, or `None` if it has no usable position.
pub fn quantize(note: &NoteOn) -> Option<(usize, f32)> {
    if !note.is_finite() {
        return None;
    }
    Some((note.time.grid_step(), note.time.step_offset() as f32))
}

/// Owns the groove grid and applies host notifications to it.
#[derive(Debug, Clone, Default)]
pub struct GrooveQuantizer {
    grid: GrooveGrid,
}

impl GrooveQuantizer {
    pub fn new() -> Self {
        Self {
            grid: GrooveGrid::new(),
        }
    }

    /// Reset the grid at the start of a host playback run.
    pub fn on_buffer_start(&mut self) {
        self.grid.clear();
    }

    /// Quantize one note-on into the grid. Returns `None` if the note was dropped.
    pub fn on_note_on(&mut self, note: &NoteOn) -> Option<Placement> {
        let Some((step, offset)) = quantize(note) else {
            debug!("dropping note-on at {:?} with velocity {}", note.time, note.velocity);
            return None;
        };

        if !self.grid.is_hit(step) {
            self.grid.write(step, note.velocity, offset);
            return Some(Placement::Written { step });
        }

        if note.velocity > self.grid.velocity(step) {
            self.grid.write(step, note.velocity, offset);
            Some(Placement::Replaced { step })
        } else {
            Some(Placement::Discarded { step })
        }
    }

    /// Apply a host payload: reset first (if flagged), then the note-on.
    pub fn apply(&mut self, payload: &HostPayload) -> Option<Placement> {
        if payload.first_buffer {
            self.on_buffer_start();
        }
        payload.note_on.as_ref().and_then(|note| self.on_note_on(note))
    }

    /// Build the encoder input from the current grid.
    pub fn to_model_input(&self) -> ModelInput {
        ModelInput::from_grid(&self.grid)
    }

    pub fn grid(&self) -> &GrooveGrid {
        &self.grid
    }
}
