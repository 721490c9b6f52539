//! Standard MIDI File export of a playback sequence.
//!
//! Writes SMF format 0 at 480 ticks per quarter note. Every note becomes a
//! note-on/note-off pair on its own channel. Onsets that fall before zero
//! (a negative offset on step 0) are clamped to the first tick. When the
//! policy loops, the end-of-track marker is placed at the loop boundary so
//! the file loops cleanly in a DAW.

use std::fmt;
use std::io;
use std::path::Path;

use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
};

use super::{PlaybackPolicy, PlaybackSequence};

/// Ticks per quarter note in exported files.
pub const TICKS_PER_QUARTER: u16 = 480;

/// Errors while exporting a sequence.
#[derive(Debug)]
pub enum ExportError {
    /// Tempo must be a positive, finite BPM.
    InvalidTempo(f64),
    Io(io::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::InvalidTempo(bpm) => write!(f, "invalid tempo: {bpm} BPM"),
            ExportError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        ExportError::Io(e)
    }
}

/// A note boundary at an absolute tick, before delta encoding.
#[derive(Debug, Clone, Copy)]
struct Boundary {
    tick: u32,
    channel: u8,
    key: u8,
    /// 0 marks a note-off.
    vel: u8,
}

fn velocity_to_midi(velocity: f32) -> u8 {
    // Velocity 0 would read as a note-off.
    ((velocity.clamp(0.0, 1.0) * 127.0).round() as u8).max(1)
}

/// Encode the sequence as an in-memory SMF byte buffer.
pub fn to_smf_bytes(
    sequence: &PlaybackSequence,
    policy: &PlaybackPolicy,
    bpm: f64,
) -> Result<Vec<u8>, ExportError> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(ExportError::InvalidTempo(bpm));
    }

    let mut boundaries: Vec<Boundary> = Vec::with_capacity(sequence.len() * 2);
    for event in sequence.iter() {
        let start = event.onset.to_ticks(TICKS_PER_QUARTER);
        let end = (event.onset + event.duration)
            .to_ticks(TICKS_PER_QUARTER)
            .max(start + 1);
        boundaries.push(Boundary {
            tick: start,
            channel: event.channel,
            key: event.note,
            vel: velocity_to_midi(event.velocity),
        });
        boundaries.push(Boundary {
            tick: end,
            channel: event.channel,
            key: event.note,
            vel: 0,
        });
    }
    // Stable sort; note-offs go first at equal ticks so retriggers are not cut.
    boundaries.sort_by_key(|b| (b.tick, b.vel != 0));

    let mut track = Vec::with_capacity(boundaries.len() + 3);
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(b"drumloop")),
    });
    let tempo_us = (60_000_000.0 / bpm).round() as u32;
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_us.min(0x00FF_FFFF)))),
    });

    let mut last_tick = 0u32;
    for b in &boundaries {
        let message = if b.vel == 0 {
            MidiMessage::NoteOff {
                key: u7::new(b.key.min(127)),
                vel: u7::new(0),
            }
        } else {
            MidiMessage::NoteOn {
                key: u7::new(b.key.min(127)),
                vel: u7::new(b.vel.min(127)),
            }
        };
        track.push(TrackEvent {
            delta: u28::new(b.tick - last_tick),
            kind: TrackEventKind::Midi {
                channel: u4::new(b.channel.min(15)),
                message,
            },
        });
        last_tick = b.tick;
    }

    let end_tick = policy
        .loop_length
        .map(|len| len.to_ticks(TICKS_PER_QUARTER))
        .unwrap_or(last_tick)
        .max(last_tick);
    track.push(TrackEvent {
        delta: u28::new(end_tick - last_tick),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));
    smf.tracks.push(track);

    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    Ok(buf)
}

/// Write the sequence to a `.mid` file, creating parent directories as needed.
pub fn write_smf(
    sequence: &PlaybackSequence,
    policy: &PlaybackPolicy,
    bpm: f64,
    path: &Path,
) -> Result<(), ExportError> {
    let bytes = to_smf_bytes(sequence, policy, bpm)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}
