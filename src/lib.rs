//! Drumloop — groove-conditioned drum pattern generation.
//!
//! Incoming note-ons are quantized onto a two-bar grid, encoded by a
//! generative model, and sampled back into a nine-voice drum loop that a
//! host can play.

pub mod config;
pub mod diagnostics;
pub mod event;
pub mod groove;
pub mod midi;
pub mod model;
pub mod params;
pub mod pipeline;
pub mod sequence;
pub mod voice;
