//! Notifications delivered by the host once per processing pass.
//!
//! A pass either carries nothing or carries a payload with a buffer-start
//! marker and/or a note-on. The absent case is its own variant so the
//! pipeline can tell "no event" apart from "an event with no note".

use super::time::QuarterNotes;

/// A note-on observed by the host, timestamped in quarter notes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteOn {
    pub time: QuarterNotes,
    /// Velocity normalized to 0.0–1.0.
    pub velocity: f32,
}

impl NoteOn {
    /// Create a note-on, clamping velocity into 0.0–1.0.
    pub fn new(time: QuarterNotes, velocity: f32) -> Self {
        Self {
            time,
            velocity: velocity.clamp(0.0, 1.0),
        }
    }

    /// Create a note-on from a 7-bit MIDI velocity.
    pub fn from_midi_velocity(time: QuarterNotes, velocity: u8) -> Self {
        Self::new(time, velocity.min(127) as f32 / 127.0)
    }

    /// Whether both time and velocity are usable. Non-finite notes never reach the grid.
    pub fn is_finite(&self) -> bool {
        self.time.is_finite() && self.velocity.is_finite()
    }
}

/// The body of a present host notification.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HostPayload {
    /// Set on the first buffer of a playback run; clears the groove.
    pub first_buffer: bool,
    pub note_on: Option<NoteOn>,
}

/// What the host delivered for this pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum HostEvent {
    #[default]
    Absent,
    Present(HostPayload),
}

impl HostEvent {
    /// A bare buffer-start marker.
    pub fn first_buffer() -> Self {
        HostEvent::Present(HostPayload {
            first_buffer: true,
            note_on: None,
        })
    }

    /// A note-on without a buffer-start marker.
    pub fn note_on(time: f64, velocity: f32) -> Self {
        HostEvent::Present(HostPayload {
            first_buffer: false,
            note_on: Some(NoteOn::new(QuarterNotes::new(time), velocity)),
        })
    }

    /// A note-on arriving in the first buffer of a run.
    pub fn first_buffer_note_on(time: f64, velocity: f32) -> Self {
        HostEvent::Present(HostPayload {
            first_buffer: true,
            note_on: Some(NoteOn::new(QuarterNotes::new(time), velocity)),
        })
    }

    pub fn is_present(&self) -> bool {
        matches!(self, HostEvent::Present(_))
    }

    pub fn payload(&self) -> Option<&HostPayload> {
        match self {
            HostEvent::Present(payload) => Some(payload),
            HostEvent::Absent => None,
        }
    }
}
