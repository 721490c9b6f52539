//! Live MIDI input settings — device selection, channel filter and clock tempo.

use serde::{Deserialize, Serialize};

/// MIDI input settings, nested under `midi:` in the engine config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidiInputConfig {
    /// Preferred MIDI device name (substring match). None = first available.
    #[serde(default)]
    pub device_name: Option<String>,
    /// Only accept note-ons on this MIDI channel (0-15). None = all channels.
    #[serde(default)]
    pub channel_filter: Option<u8>,
    /// Tempo used to convert arrival times to quarter notes.
    #[serde(default = "MidiInputConfig::default_bpm")]
    pub bpm: f64,
}

impl MidiInputConfig {
    fn default_bpm() -> f64 {
        120.0
    }
}

impl Default for MidiInputConfig {
    fn default() -> Self {
        Self {
            device_name: None,
            channel_filter: None,
            bpm: Self::default_bpm(),
        }
    }
}
