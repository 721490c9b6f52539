//! Live MIDI input — a hardware or software controller played as the groove.

pub mod config;
pub mod input;
pub mod mapping;

pub use config::MidiInputConfig;
pub use input::{HostEventSender, MidiListener};
pub use mapping::{parse_note_on, LiveClock, MidiNoteOn};
