//! MIDI message mapping — raw note-on bytes to timed host events.
//!
//! Note-on format: `[0x90 | channel, note, velocity]`. A note-on with
//! velocity 0 is a note-off and is ignored, as are all other messages.

use crate::event::{HostEvent, HostPayload, NoteOn, QuarterNotes, LOOP_LENGTH};

/// A decoded note-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiNoteOn {
    pub channel: u8,
    pub note: u8,
    /// Raw 7-bit velocity, never zero.
    pub velocity: u8,
}

/// Decode a raw MIDI message as a note-on, honoring an optional channel filter.
pub fn parse_note_on(msg: &[u8], channel_filter: Option<u8>) -> Option<MidiNoteOn> {
    let (&status, rest) = msg.split_first()?;
    if status & 0xF0 != 0x90 || rest.len() < 2 {
        return None;
    }
    let channel = status & 0x0F;
    if channel_filter.is_some_and(|filter| filter != channel) {
        return None;
    }
    let (note, velocity) = (rest[0], rest[1]);
    if velocity == 0 {
        return None;
    }
    Some(MidiNoteOn {
        channel,
        note,
        velocity,
    })
}

/// Converts arrival timestamps into loop-relative quarter notes.
///
/// The first stamped note starts the clock. Every time a note arrives in a
/// new loop (8 quarter notes), the event is flagged as a first buffer so the
/// groove grid is rebuilt from that loop's notes only.
#[derive(Debug, Clone)]
pub struct LiveClock {
    bpm: f64,
    origin_us: Option<u64>,
    current_loop: Option<u64>,
}

impl LiveClock {
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm: if bpm.is_finite() && bpm > 0.0 { bpm } else { 120.0 },
            origin_us: None,
            current_loop: None,
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Time of `timestamp_us` within its loop, and whether it opens a new loop.
    pub fn stamp(&mut self, timestamp_us: u64) -> (QuarterNotes, bool) {
        let origin = *self.origin_us.get_or_insert(timestamp_us);
        let elapsed_secs = timestamp_us.saturating_sub(origin) as f64 / 1_000_000.0;
        let position = elapsed_secs * self.bpm / 60.0;

        let loop_index = (position / LOOP_LENGTH).floor() as u64;
        let first_buffer = self.current_loop != Some(loop_index);
        self.current_loop = Some(loop_index);

        let within = position - loop_index as f64 * LOOP_LENGTH;
        (QuarterNotes::new(within), first_buffer)
    }

    /// Build the host event for a note-on arriving at `timestamp_us`.
    pub fn host_event(&mut self, note: &MidiNoteOn, timestamp_us: u64) -> HostEvent {
        let (time, first_buffer) = self.stamp(timestamp_us);
        HostEvent::Present(HostPayload {
            first_buffer,
            note_on: Some(NoteOn::from_midi_velocity(time, note.velocity)),
        })
    }
}
