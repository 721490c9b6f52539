//! Groove scripts — YAML lists of note-ons replayed through the pipeline offline.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::event::{HostEvent, HostPayload, NoteOn, QuarterNotes};

/// One scripted note-on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptNote {
    /// Onset in quarter notes from the start of the loop.
    pub time: f64,
    /// Velocity 0.0–1.0.
    #[serde(default = "default_velocity")]
    pub velocity: f32,
}

fn default_velocity() -> f32 {
    0.8
}

/// A recorded or hand-written groove.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrooveScript {
    #[serde(default)]
    pub notes: Vec<ScriptNote>,
}

impl GrooveScript {
    /// Read a script from a YAML file.
    pub fn load(path: &Path) -> Result<Self, io::Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, io::Error> {
        serde_yaml::from_str(content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Host events for the script, in delivery order.
    ///
    /// The first event carries the buffer-start marker so replaying a script
    /// always starts from an empty groove.
    pub fn to_events(&self) -> Vec<HostEvent> {
        if self.notes.is_empty() {
            return vec![HostEvent::first_buffer()];
        }
        self.notes
            .iter()
            .enumerate()
            .map(|(i, n)| {
                HostEvent::Present(HostPayload {
                    first_buffer: i == 0,
                    note_on: Some(NoteOn::new(QuarterNotes::new(n.time), n.velocity)),
                })
            })
            .collect()
    }
}
