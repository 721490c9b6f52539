//! Drum voices and the voice → MIDI note map.
//!
//! The generative model always produces nine voices in a fixed order. Which
//! MIDI note each voice plays is a host parameter.

use serde::{Deserialize, Serialize};

/// Number of voices in a generated pattern.
pub const VOICE_COUNT: usize = 9;

/// The nine drum roles, in model output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Voice {
    Kick,
    Snare,
    ClosedHat,
    OpenHat,
    LowTom,
    MidTom,
    HighTom,
    Crash,
    Ride,
}

impl Voice {
    /// All voices, indexed by model column.
    pub const ALL: [Voice; VOICE_COUNT] = [
        Voice::Kick,
        Voice::Snare,
        Voice::ClosedHat,
        Voice::OpenHat,
        Voice::LowTom,
        Voice::MidTom,
        Voice::HighTom,
        Voice::Crash,
        Voice::Ride,
    ];

    /// Column of this voice in the model output.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Voice> {
        Self::ALL.get(index).copied()
    }

    /// Host parameter name controlling this voice's note.
    pub fn param_name(self) -> &'static str {
        match self {
            Voice::Kick => "Kick",
            Voice::Snare => "Snare",
            Voice::ClosedHat => "ClosedHat",
            Voice::OpenHat => "OpenHat",
            Voice::LowTom => "LowTom",
            Voice::MidTom => "MidTom",
            Voice::HighTom => "HighTom",
            Voice::Crash => "Crash",
            Voice::Ride => "Ride",
        }
    }

    /// General MIDI percussion note for this voice.
    pub fn default_note(self) -> u8 {
        match self {
            Voice::Kick => 36,
            Voice::Snare => 38,
            Voice::ClosedHat => 42,
            Voice::OpenHat => 46,
            Voice::LowTom => 43,
            Voice::MidTom => 47,
            Voice::HighTom => 50,
            Voice::Crash => 49,
            Voice::Ride => 51,
        }
    }
}

/// MIDI note assigned to each voice. Notes are kept in 0–127.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceMap {
    pub kick: u8,
    pub snare: u8,
    pub closed_hat: u8,
    pub open_hat: u8,
    pub low_tom: u8,
    pub mid_tom: u8,
    pub high_tom: u8,
    pub crash: u8,
    pub ride: u8,
}

impl VoiceMap {
    /// Note played by `voice`.
    pub fn note(&self, voice: Voice) -> u8 {
        match voice {
            Voice::Kick => self.kick,
            Voice::Snare => self.snare,
            Voice::ClosedHat => self.closed_hat,
            Voice::OpenHat => self.open_hat,
            Voice::LowTom => self.low_tom,
            Voice::MidTom => self.mid_tom,
            Voice::HighTom => self.high_tom,
            Voice::Crash => self.crash,
            Voice::Ride => self.ride,
        }
    }

    /// Note for a model column. Out-of-range columns have no note.
    pub fn note_at(&self, index: usize) -> Option<u8> {
        Voice::from_index(index).map(|v| self.note(v))
    }

    /// Assign a note (clamped to 0–127). Returns `true` if the map changed.
    pub fn set(&mut self, voice: Voice, note: u8) -> bool {
        let note = note.min(127);
        let slot = match voice {
            Voice::Kick => &mut self.kick,
            Voice::Snare => &mut self.snare,
            Voice::ClosedHat => &mut self.closed_hat,
            Voice::OpenHat => &mut self.open_hat,
            Voice::LowTom => &mut self.low_tom,
            Voice::MidTom => &mut self.mid_tom,
            Voice::HighTom => &mut self.high_tom,
            Voice::Crash => &mut self.crash,
            Voice::Ride => &mut self.ride,
        };
        let changed = *slot != note;
        *slot = note;
        changed
    }
}

impl Default for VoiceMap {
    fn default() -> Self {
        Self {
            kick: Voice::Kick.default_note(),
            snare: Voice::Snare.default_note(),
            closed_hat: Voice::ClosedHat.default_note(),
            open_hat: Voice::OpenHat.default_note(),
            low_tom: Voice::LowTom.default_note(),
            mid_tom: Voice::MidTom.default_note(),
            high_tom: Voice::HighTom.default_note(),
            crash: Voice::Crash.default_note(),
            ride: Voice::Ride.default_note(),
        }
    }
}
