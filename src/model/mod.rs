//! Generative model contract — encode a groove to a latent, sample a pattern from it.
//!
//! The model itself lives outside this crate. [`GenerativeModel`] is the port
//! the pipeline calls through, and [`ModelLoader`] produces one from a file
//! name. [`SeededModel`] is a deterministic stand-in for offline use.

pub mod error;
pub mod seeded;

use rand::Rng;
use rand_distr::StandardNormal;

use crate::event::GRID_STEPS;
use crate::groove::ModelInput;
use crate::voice::VOICE_COUNT;

pub use error::ModelError;
pub use seeded::{SeededModel, SeededModelLoader};

/// Dimensionality of the latent space.
pub const LATENT_DIM: usize = 128;

/// Per-step, per-voice values: one row per step, one column per voice.
pub type PatternTensor = [[f32; VOICE_COUNT]; GRID_STEPS];

/// A point in the model's latent space.
#[derive(Debug, Clone, PartialEq)]
pub struct LatentVector([f32; LATENT_DIM]);

impl LatentVector {
    pub fn zeros() -> Self {
        Self([0.0; LATENT_DIM])
    }

    pub fn from_array(values: [f32; LATENT_DIM]) -> Self {
        Self(values)
    }

    /// Draw every component from a standard normal distribution.
    pub fn standard_normal<R: Rng>(rng: &mut R) -> Self {
        let mut values = [0.0f32; LATENT_DIM];
        for v in values.iter_mut() {
            *v = rng.sample(StandardNormal);
        }
        Self(values)
    }

    pub fn values(&self) -> &[f32; LATENT_DIM] {
        &self.0
    }

    pub fn get(&self, index: usize) -> f32 {
        self.0[index]
    }
}

/// Output of one `sample` call: hits, velocities and offsets per step and voice.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPattern {
    pub hits: PatternTensor,
    pub velocities: PatternTensor,
    pub offsets: PatternTensor,
}

impl GeneratedPattern {
    /// A pattern with no activity.
    pub fn silent() -> Self {
        Self {
            hits: [[0.0; VOICE_COUNT]; GRID_STEPS],
            velocities: [[0.0; VOICE_COUNT]; GRID_STEPS],
            offsets: [[0.0; VOICE_COUNT]; GRID_STEPS],
        }
    }

    /// Set one cell. Used by models and test fixtures.
    pub fn set(&mut self, step: usize, voice: usize, hit: f32, velocity: f32, offset: f32) {
        self.hits[step][voice] = hit;
        self.velocities[step][voice] = velocity;
        self.offsets[step][voice] = offset;
    }

    /// Number of cells whose hit activation is above `threshold`.
    pub fn active_count(&self, threshold: f32) -> usize {
        self.hits.iter().flatten().filter(|&&h| h > threshold).count()
    }
}

/// How the decoder turns activations into hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingMode {
    /// Threshold the activations (selector 0).
    #[default]
    Greedy,
    /// Draw each hit with its activation as probability (selector 1).
    Stochastic,
}

impl SamplingMode {
    /// Integer selector passed to the model's `sample` method.
    pub fn selector(self) -> i64 {
        match self {
            SamplingMode::Greedy => 0,
            SamplingMode::Stochastic => 1,
        }
    }

    pub fn from_selector(selector: i64) -> Option<SamplingMode> {
        match selector {
            0 => Some(SamplingMode::Greedy),
            1 => Some(SamplingMode::Stochastic),
            _ => None,
        }
    }
}

/// Arguments to `sample` besides the latent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Activation threshold per voice.
    pub voice_thresholds: [f32; VOICE_COUNT],
    /// Maximum hits allowed per voice over the loop.
    pub max_counts: [f32; VOICE_COUNT],
    pub mode: SamplingMode,
    /// 1.0 leaves the output distribution unmodified.
    pub temperature: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            voice_thresholds: [0.5; VOICE_COUNT],
            max_counts: [GRID_STEPS as f32; VOICE_COUNT],
            mode: SamplingMode::Greedy,
            temperature: 1.0,
        }
    }
}

/// A pretrained groove-conditioned drum model.
///
/// Both calls are pure from the caller's point of view: identical inputs under
/// [`SamplingMode::Greedy`] give identical outputs.
pub trait GenerativeModel {
    /// Encode a groove and density (0.0–1.0) into a latent vector.
    fn encode(&self, input: &ModelInput, density: f32) -> Result<LatentVector, ModelError>;

    /// Decode a latent vector into a pattern.
    fn sample(
        &self,
        latent: &LatentVector,
        params: &SamplingParams,
    ) -> Result<GeneratedPattern, ModelError>;
}

/// Loads a model from a file-name handle.
pub trait ModelLoader {
    fn load(&self, file_name: &str) -> Result<Box<dyn GenerativeModel + Send>, ModelError>;
}
