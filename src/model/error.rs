//! Errors raised by model loading and inference.

use std::fmt;

/// A failure from the model collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The model file could not be loaded.
    Load { file: String, reason: String },
    /// Inference was requested before a model was installed.
    Unavailable,
    /// The model raised an error during `encode` or `sample`.
    Inference(String),
}

impl ModelError {
    pub fn load(file: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::Load {
            file: file.into(),
            reason: reason.into(),
        }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        ModelError::Inference(message.into())
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Load { file, reason } => {
                write!(f, "failed to load model '{file}': {reason}")
            }
            ModelError::Unavailable => write!(f, "model is not loaded"),
            ModelError::Inference(e) => write!(f, "inference error: {e}"),
        }
    }
}

impl std::error::Error for ModelError {}
