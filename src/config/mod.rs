//! Engine configuration — model file, parameter defaults, and inference mode,
//! loaded from ~/.drumloop/config.yaml.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::midi::MidiInputConfig;
use crate::params::{ParamSnapshot, DEFAULT_DENSITY};
use crate::voice::VoiceMap;

/// Where inference runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceMode {
    /// Blocking calls on the processing thread.
    #[default]
    Inline,
    /// A dedicated worker thread; results are picked up on later passes.
    Worker,
}

/// Errors while loading or saving configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Yaml(serde_yaml::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Yaml(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Yaml(e)
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Model file handed to the loader.
    #[serde(default = "default_model_file")]
    pub model_file: String,
    /// Initial density, 0.0–1.0.
    #[serde(default = "default_density")]
    pub density: f32,
    /// Initial voice → note map.
    #[serde(default)]
    pub voices: VoiceMap,
    #[serde(default)]
    pub inference: InferenceMode,
    /// Pending requests the worker queue can hold.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Seed for random latent draws.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Live MIDI input settings.
    #[serde(default)]
    pub midi: MidiInputConfig,
}

fn default_model_file() -> String {
    "drumLoopVAE.pt".to_string()
}

fn default_density() -> f32 {
    DEFAULT_DENSITY
}

fn default_queue_capacity() -> usize {
    16
}

fn default_seed() -> u64 {
    42
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_file: default_model_file(),
            density: default_density(),
            voices: VoiceMap::default(),
            inference: InferenceMode::default(),
            queue_capacity: default_queue_capacity(),
            seed: default_seed(),
            midi: MidiInputConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parameter values the engine starts from.
    pub fn initial_params(&self) -> ParamSnapshot {
        ParamSnapshot::new(self.density, self.voices)
    }

    /// Load from `path`, falling back to defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load from the standard path, falling back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}

/// Standard config location: ~/.drumloop/config.yaml.
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".drumloop");
    path.push("config.yaml");
    path
}
