//! Host-facing event model — notifications, note-ons, and quarter-note time.

pub mod host;
pub mod time;

pub use host::{HostEvent, HostPayload, NoteOn};
pub use time::{QuarterNotes, GRID_STEPS, HALF_STEP, LOOP_LENGTH, STEP_LENGTH};
