//! Playback policy — how the host should interpret and merge a new sequence.

use serde::{Deserialize, Serialize};

use crate::event::{QuarterNotes, LOOP_LENGTH};

/// What event times are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeReference {
    /// Times count from the host's absolute zero.
    RelativeToZero,
}

/// Unit of event times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Quarter notes (pulses per quarter).
    Ppq,
}

/// What happens to events from the previous sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverwritePolicy {
    /// Drop every previous event and play only the new sequence.
    ReplaceAll,
}

/// Declarative playback settings sent alongside a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackPolicy {
    pub time_reference: TimeReference,
    pub time_unit: TimeUnit,
    pub overwrite: OverwritePolicy,
    /// Loop length, or `None` for one-shot playback.
    pub loop_length: Option<QuarterNotes>,
}

impl PlaybackPolicy {
    pub fn is_looping(&self) -> bool {
        self.loop_length.is_some()
    }
}

/// Produces the policy for generated drum loops.
pub struct PlaybackPolicyConfigurator;

impl PlaybackPolicyConfigurator {
    /// Loop the two-bar pattern from zero in PPQ, replacing whatever played before.
    pub fn configure() -> PlaybackPolicy {
        PlaybackPolicy {
            time_reference: TimeReference::RelativeToZero,
            time_unit: TimeUnit::Ppq,
            overwrite: OverwritePolicy::ReplaceAll,
            loop_length: Some(QuarterNotes::new(LOOP_LENGTH)),
        }
    }
}
