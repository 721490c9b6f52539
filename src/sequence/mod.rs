//! Playback output — the note sequence handed to the host and the policy
//! describing how the host should play it.

pub mod builder;
pub mod export;
pub mod policy;

use serde::{Deserialize, Serialize};

use crate::event::QuarterNotes;

pub use builder::{SequenceBuilder, HIT_THRESHOLD, NOTE_DURATION, OUTPUT_CHANNEL};
pub use export::{write_smf, ExportError};
pub use policy::{
    OverwritePolicy, PlaybackPolicy, PlaybackPolicyConfigurator, TimeReference, TimeUnit,
};

/// A single note to be played.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI channel, 0-based.
    pub channel: u8,
    /// MIDI note number (0–127).
    pub note: u8,
    /// Velocity in the range 0.0–1.0.
    pub velocity: f32,
    pub onset: QuarterNotes,
    pub duration: QuarterNotes,
}

/// Ordered notes produced by one generation. Replaced wholesale, never edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSequence {
    events: Vec<NoteEvent>,
}

impl PlaybackSequence {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append a note. Order of insertion is the order of playback listing.
    pub fn add_note_with_duration(
        &mut self,
        channel: u8,
        note: u8,
        velocity: f32,
        onset: QuarterNotes,
        duration: QuarterNotes,
    ) {
        self.events.push(NoteEvent {
            channel,
            note,
            velocity,
            onset,
            duration,
        });
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
