//! Groove capture — quantizing live note-ons into a fixed two-bar grid.
//!
//! The [`GrooveQuantizer`] owns a [`GrooveGrid`] and turns it into the
//! [`ModelInput`] layout consumed by the encoder.

pub mod grid;
pub mod quantizer;
pub mod script;
pub mod tensor;

pub use grid::GrooveGrid;
pub use quantizer::{quantize, GrooveQuantizer, Placement};
pub use script::{GrooveScript, ScriptNote};
pub use tensor::{ModelInput, HIT_CHANNEL, INPUT_CHANNELS, OFFSET_CHANNEL, VELOCITY_CHANNEL};
