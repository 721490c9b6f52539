//! Groove grid — one (hit, velocity, offset) triple per 16th-note step.

use crate::event::GRID_STEPS;

/// Quantized onsets over the two-bar loop.
///
/// Invariant: a step with `hit == 0` has zero velocity and zero offset, and
/// any step with non-zero velocity is a hit. Only [`GrooveGrid::write`] and
/// [`GrooveGrid::clear`] mutate the grid, and both preserve it.
#[derive(Debug, Clone, PartialEq)]
pub struct GrooveGrid {
    hits: [f32; GRID_STEPS],
    velocities: [f32; GRID_STEPS],
    offsets: [f32; GRID_STEPS],
}

impl GrooveGrid {
    /// An all-zero grid.
    pub fn new() -> Self {
        Self {
            hits: [0.0; GRID_STEPS],
            velocities: [0.0; GRID_STEPS],
            offsets: [0.0; GRID_STEPS],
        }
    }

    /// Zero all three channels.
    pub fn clear(&mut self) {
        self.hits = [0.0; GRID_STEPS];
        self.velocities = [0.0; GRID_STEPS];
        self.offsets = [0.0; GRID_STEPS];
    }

    /// Mark `step` as a hit with the given velocity and offset.
    pub(crate) fn write(&mut self, step: usize, velocity: f32, offset: f32) {
        self.hits[step] = 1.0;
        self.velocities[step] = velocity;
        self.offsets[step] = offset;
    }

    pub fn is_hit(&self, step: usize) -> bool {
        self.hits[step] > 0.0
    }

    pub fn velocity(&self, step: usize) -> f32 {
        self.velocities[step]
    }

    pub fn offset(&self, step: usize) -> f32 {
        self.offsets[step]
    }

    pub fn hits(&self) -> &[f32; GRID_STEPS] {
        &self.hits
    }

    pub fn velocities(&self) -> &[f32; GRID_STEPS] {
        &self.velocities
    }

    pub fn offsets(&self) -> &[f32; GRID_STEPS] {
        &self.offsets
    }

    /// Number of steps holding a hit.
    pub fn hit_count(&self) -> usize {
        self.hits.iter().filter(|&&h| h > 0.0).count()
    }

    /// True when no step holds a hit.
    pub fn is_empty(&self) -> bool {
        self.hit_count() == 0
    }
}

impl Default for GrooveGrid {
    fn default() -> Self {
        Self::new()
    }
}
