//! Typed host parameters and change detection.
//!
//! Hosts expose parameters by name. [`ParamKey`] names the ones this engine
//! reads, [`ParamSnapshot`] holds their current values, and
//! [`ParamSnapshot::diff`] compares two snapshots field by field.

use serde::{Deserialize, Serialize};

use crate::voice::{Voice, VoiceMap, VOICE_COUNT};

/// Default generation density.
pub const DEFAULT_DENSITY: f32 = 0.5;

/// A recognized host parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Density,
    Voice(Voice),
}

impl ParamKey {
    /// Look up a key by its host-side name (e.g. `"Density"`, `"Kick"`).
    pub fn from_name(name: &str) -> Option<ParamKey> {
        if name == "Density" {
            return Some(ParamKey::Density);
        }
        Voice::ALL
            .into_iter()
            .find(|v| v.param_name() == name)
            .map(ParamKey::Voice)
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamKey::Density => "Density",
            ParamKey::Voice(voice) => voice.param_name(),
        }
    }

    /// Every recognized key.
    pub fn all() -> Vec<ParamKey> {
        std::iter::once(ParamKey::Density)
            .chain(Voice::ALL.into_iter().map(ParamKey::Voice))
            .collect()
    }
}

/// Values of every recognized parameter at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamSnapshot {
    /// Generation density, 0.0–1.0.
    pub density: f32,
    pub voices: VoiceMap,
}

impl ParamSnapshot {
    /// A non-finite density falls back to [`DEFAULT_DENSITY`].
    pub fn new(density: f32, voices: VoiceMap) -> Self {
        let density = if density.is_finite() {
            density.clamp(0.0, 1.0)
        } else {
            DEFAULT_DENSITY
        };
        Self { density, voices }
    }

    /// Apply a raw host value. Density is clamped into 0.0–1.0 and voice
    /// values are rounded to the nearest note. Non-finite values are ignored.
    pub fn set(&mut self, key: ParamKey, value: f64) {
        if !value.is_finite() {
            return;
        }
        match key {
            ParamKey::Density => self.density = (value as f32).clamp(0.0, 1.0),
            ParamKey::Voice(voice) => {
                let note = value.round().clamp(0.0, 127.0) as u8;
                self.voices.set(voice, note);
            }
        }
    }

    /// Apply a raw host value by name. Unknown names are ignored and reported as `false`.
    pub fn set_named(&mut self, name: &str, value: f64) -> bool {
        match ParamKey::from_name(name) {
            Some(key) => {
                self.set(key, value);
                true
            }
            None => false,
        }
    }

    /// Build a snapshot from name/value pairs on top of the defaults.
    pub fn from_named<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let mut snapshot = Self::default();
        for (name, value) in pairs {
            snapshot.set_named(name, value);
        }
        snapshot
    }

    /// Which fields differ from `previous`.
    pub fn diff(&self, previous: &ParamSnapshot) -> ParamChanges {
        let mut voices = [false; VOICE_COUNT];
        for voice in Voice::ALL {
            voices[voice.index()] = self.voices.note(voice) != previous.voices.note(voice);
        }
        let same_density = self.density == previous.density
            || (self.density.is_nan() && previous.density.is_nan());
        ParamChanges {
            density: !same_density,
            voices,
        }
    }
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            voices: VoiceMap::default(),
        }
    }
}

/// Per-field "was updated" flags between two snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParamChanges {
    pub density: bool,
    pub voices: [bool; VOICE_COUNT],
}

impl ParamChanges {
    pub fn voice(&self, voice: Voice) -> bool {
        self.voices[voice.index()]
    }

    /// True if any voice note changed.
    pub fn voice_map(&self) -> bool {
        self.voices.iter().any(|&c| c)
    }

    /// True if anything changed.
    pub fn any(&self) -> bool {
        self.density || self.voice_map()
    }

    pub fn was_updated(&self, key: ParamKey) -> bool {
        match key {
            ParamKey::Density => self.density,
            ParamKey::Voice(voice) => self.voice(voice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_names() {
        for key in ParamKey::all() {
            assert_eq!(ParamKey::from_name(key.name()), Some(key));
        }
        assert_eq!(ParamKey::all().len(), 10);
        assert_eq!(ParamKey::from_name("Cowbell"), None);
    }

    #[test]
    fn set_named_density_clamps() {
        let mut snap = ParamSnapshot::default();
        assert!(snap.set_named("Density", 1.7));
        assert_eq!(snap.density, 1.0);
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let mut snap = ParamSnapshot::new(0.3, VoiceMap::default());
        snap.set(ParamKey::Density, f64::NAN);
        snap.set(ParamKey::Density, f64::INFINITY);
        snap.set(ParamKey::Voice(Voice::Kick), f64::NAN);
        assert_eq!(snap.density, 0.3);
        assert_eq!(snap.voices.kick, 36);
        assert!(!snap.diff(&snap).any());
    }

    #[test]
    fn new_replaces_nan_density() {
        let snap = ParamSnapshot::new(f32::NAN, VoiceMap::default());
        assert_eq!(snap.density, DEFAULT_DENSITY);
    }

    #[test]
    fn set_named_voice_rounds() {
        let mut snap = ParamSnapshot::default();
        snap.set_named("Kick", 35.6);
        assert_eq!(snap.voices.kick, 36);
        snap.set_named("Kick", -4.0);
        assert_eq!(snap.voices.kick, 0);
    }

    #[test]
    fn unknown_name_is_ignored() {
        let mut snap = ParamSnapshot::default();
        assert!(!snap.set_named("Tempo", 120.0));
        assert_eq!(snap, ParamSnapshot::default());
    }

    #[test]
    fn from_named_builds_on_defaults() {
        let snap = ParamSnapshot::from_named([("Density", 0.8), ("Snare", 40.0)]);
        assert_eq!(snap.density, 0.8);
        assert_eq!(snap.voices.snare, 40);
        assert_eq!(snap.voices.kick, 36);
    }

    #[test]
    fn diff_identical_is_empty() {
        let snap = ParamSnapshot::default();
        let changes = snap.diff(&snap);
        assert!(!changes.any());
        assert_eq!(changes, ParamChanges::default());
    }

    #[test]
    fn diff_flags_individual_fields() {
        let before = ParamSnapshot::default();
        let mut after = before;
        after.set(ParamKey::Voice(Voice::Kick), 35.0);

        let changes = after.diff(&before);
        assert!(changes.voice_map());
        assert!(changes.was_updated(ParamKey::Voice(Voice::Kick)));
        assert!(!changes.was_updated(ParamKey::Voice(Voice::Snare)));
        assert!(!changes.density);
    }

    #[test]
    fn diff_density_only() {
        let before = ParamSnapshot::default();
        let after = ParamSnapshot::new(0.9, before.voices);
        let changes = after.diff(&before);
        assert!(changes.density);
        assert!(!changes.voice_map());
        assert!(changes.any());
    }
}
