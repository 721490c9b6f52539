//! Sequence builder — turns a generated pattern into timed note events.

use crate::event::{QuarterNotes, GRID_STEPS};
use crate::model::GeneratedPattern;
use crate::voice::{VoiceMap, VOICE_COUNT};

use super::PlaybackSequence;

/// Activation above which a cell becomes a note.
pub const HIT_THRESHOLD: f32 = 0.5;

/// Length of every emitted note, in quarter notes.
pub const NOTE_DURATION: QuarterNotes = QuarterNotes::new(0.1);

/// Channel all notes are emitted on.
pub const OUTPUT_CHANNEL: u8 = 0;

/// Materializes patterns into [`PlaybackSequence`]s.
pub struct SequenceBuilder;

impl SequenceBuilder {
    /// Build the sequence for `pattern` using `voices` for note numbers.
    ///
    /// Events are listed step by step, and within a step by ascending voice
    /// index. Consumers diff sequences in this order, so it must not change.
    pub fn build(pattern: &GeneratedPattern, voices: &VoiceMap) -> PlaybackSequence {
        let mut sequence = PlaybackSequence::new();

        for step in 0..GRID_STEPS {
            for voice in 0..VOICE_COUNT {
                if pattern.hits[step][voice] <= HIT_THRESHOLD {
                    continue;
                }
                let Some(note) = voices.note_at(voice) else {
                    continue;
                };
                let onset = QuarterNotes::from_step(step, pattern.offsets[step][voice]);
                sequence.add_note_with_duration(
                    OUTPUT_CHANNEL,
                    note,
                    pattern.velocities[step][voice],
                    onset,
                    NOTE_DURATION,
                );
            }
        }

        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::Voice;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn silent_pattern_builds_empty() {
        let seq = SequenceBuilder::build(&GeneratedPattern::silent(), &VoiceMap::default());
        assert!(seq.is_empty());
    }

    #[test]
    fn step_major_voice_minor_order() {
        let mut pattern = GeneratedPattern::silent();
        pattern.set(5, 3, 1.0, 0.5, 0.0);
        pattern.set(0, 0, 1.0, 0.9, 0.0);
        pattern.set(5, 1, 1.0, 0.6, 0.0);

        let seq = SequenceBuilder::build(&pattern, &VoiceMap::default());
        let notes: Vec<u8> = seq.iter().map(|e| e.note).collect();
        assert_eq!(notes, vec![36, 38, 46]);
    }

    #[test]
    fn onset_includes_offset() {
        let mut pattern = GeneratedPattern::silent();
        pattern.set(4, 0, 1.0, 0.8, 0.25);
        let seq = SequenceBuilder::build(&pattern, &VoiceMap::default());
        assert_approx_eq!(seq.events()[0].onset.value(), 1.0625);
    }

    #[test]
    fn threshold_is_strict() {
        let mut pattern = GeneratedPattern::silent();
        pattern.set(0, 0, 0.5, 0.8, 0.0);
        pattern.set(1, 0, 0.51, 0.8, 0.0);
        let seq = SequenceBuilder::build(&pattern, &VoiceMap::default());
        assert_eq!(seq.len(), 1);
        assert_approx_eq!(seq.events()[0].onset.value(), 0.25);
    }

    #[test]
    fn fields_copied_from_pattern_and_map() {
        let mut pattern = GeneratedPattern::silent();
        pattern.set(2, 8, 0.9, 0.42, -0.1);
        let mut voices = VoiceMap::default();
        voices.set(Voice::Ride, 59);

        let seq = SequenceBuilder::build(&pattern, &voices);
        let event = seq.events()[0];
        assert_eq!(event.note, 59);
        assert_eq!(event.channel, OUTPUT_CHANNEL);
        assert_eq!(event.velocity, 0.42);
        assert_approx_eq!(event.duration.value(), 0.1);
        assert_approx_eq!(event.onset.value(), (2.0 - 0.1f32 as f64) * 0.25);
    }
}
