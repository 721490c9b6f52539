//! Seeded stand-in model — deterministic, dependency-free, untrained.
//!
//! Encodes by hashing the input tensor and density into a seed for a
//! `ChaCha8Rng`, then nudging the drawn latent toward the groove. Decodes by
//! reading activations straight out of the latent. Useful for running the
//! pipeline end to end without the real network.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::event::GRID_STEPS;
use crate::groove::{ModelInput, HIT_CHANNEL, VELOCITY_CHANNEL};
use crate::voice::VOICE_COUNT;

use super::{
    GenerativeModel, GeneratedPattern, LatentVector, ModelError, ModelLoader, SamplingMode,
    SamplingParams, LATENT_DIM,
};

/// How far density pulls every latent component (density 1.0 adds half of this).
const DENSITY_PULL: f32 = 2.0;

/// Hard floor for temperature so scaling never divides by zero.
const MIN_TEMPERATURE: f32 = 1e-3;

/// FNV-1a over the bit patterns of a float slice.
fn hash_floats(seed: u64, values: impl IntoIterator<Item = f32>) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64 ^ seed;
    for v in values {
        for byte in v.to_bits().to_le_bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
    }
    hash
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Deterministic model implementing the encode/sample contract.
#[derive(Debug, Clone)]
pub struct SeededModel {
    seed: u64,
}

impl SeededModel {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl GenerativeModel for SeededModel {
    fn encode(&self, input: &ModelInput, density: f32) -> Result<LatentVector, ModelError> {
        if !(0.0..=1.0).contains(&density) {
            return Err(ModelError::inference(format!(
                "density {density} outside 0.0..=1.0"
            )));
        }

        let hash = hash_floats(
            self.seed,
            input.to_flat().into_iter().chain(std::iter::once(density)),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(hash);
        let drawn = LatentVector::standard_normal(&mut rng);

        let mut values = *drawn.values();
        let pull = (density - 0.5) * DENSITY_PULL;
        for (i, v) in values.iter_mut().enumerate() {
            *v += pull;
            // The first 32 components track the groove's accents.
            if i < GRID_STEPS {
                *v += input.get(i, HIT_CHANNEL) * input.get(i, VELOCITY_CHANNEL);
            }
        }
        Ok(LatentVector::from_array(values))
    }

    fn sample(
        &self,
        latent: &LatentVector,
        params: &SamplingParams,
    ) -> Result<GeneratedPattern, ModelError> {
        let temperature = params.temperature.max(MIN_TEMPERATURE);
        let hash = hash_floats(self.seed, latent.values().iter().copied());
        let mut rng = ChaCha8Rng::seed_from_u64(hash);
        let mut counts = [0usize; VOICE_COUNT];
        let mut pattern = GeneratedPattern::silent();

        for step in 0..GRID_STEPS {
            for voice in 0..VOICE_COUNT {
                let index = (step * VOICE_COUNT + voice) % LATENT_DIM;
                let mirror = (index + LATENT_DIM / 2) % LATENT_DIM;
                let logit = latent.get(index) + 0.5 * latent.get(mirror);
                let probability = sigmoid(logit / temperature);

                let fires = match params.mode {
                    SamplingMode::Greedy => probability > params.voice_thresholds[voice],
                    SamplingMode::Stochastic => rng.gen::<f32>() < probability,
                };
                if !fires || counts[voice] as f32 >= params.max_counts[voice] {
                    continue;
                }

                counts[voice] += 1;
                let offset = latent.get((index + LATENT_DIM / 4) % LATENT_DIM).tanh() * 0.5;
                pattern.set(step, voice, 1.0, probability.clamp(0.0, 1.0), offset);
            }
        }
        Ok(pattern)
    }
}

/// Loader producing a [`SeededModel`] for any non-empty file name.
#[derive(Debug, Clone)]
pub struct SeededModelLoader {
    seed: u64,
}

impl SeededModelLoader {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl ModelLoader for SeededModelLoader {
    fn load(&self, file_name: &str) -> Result<Box<dyn GenerativeModel + Send>, ModelError> {
        if file_name.trim().is_empty() {
            return Err(ModelError::load(file_name, "empty model file name"));
        }
        Ok(Box::new(SeededModel::new(self.seed)))
    }
}
