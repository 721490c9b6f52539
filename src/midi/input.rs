//! MIDI input — connects to a MIDI device and forwards note-ons as host events.

use std::io;
use std::sync::mpsc;

use log::info;
use midir::{MidiInput as MidirInput, MidiInputConnection};

use super::config::MidiInputConfig;
use super::mapping::{parse_note_on, LiveClock};
use crate::event::HostEvent;

/// Sender half handed to the MIDI callback.
pub type HostEventSender = mpsc::Sender<HostEvent>;

/// Active MIDI input connection. Dropping it closes the port.
pub struct MidiListener {
    _connection: MidiInputConnection<()>,
    port_name: String,
}

impl MidiListener {
    /// Start listening on the port named by `config.device_name`, or the first port.
    pub fn start(config: &MidiInputConfig, sender: HostEventSender) -> io::Result<Self> {
        let midi_in = MidirInput::new("drumloop")
            .map_err(|e| io::Error::other(format!("MIDI init: {e}")))?;

        let ports = midi_in.ports();
        let names: Vec<String> = ports
            .iter()
            .map(|p| midi_in.port_name(p).unwrap_or_default())
            .collect();
        let index = select_port(&names, config.device_name.as_deref())?;
        let port = ports[index].clone();
        let port_name = names[index].clone();

        let channel_filter = config.channel_filter;
        let mut clock = LiveClock::new(config.bpm);

        let connection = midi_in
            .connect(
                &port,
                "drumloop-input",
                move |timestamp_us, msg, _| {
                    if let Some(note) = parse_note_on(msg, channel_filter) {
                        let _ = sender.send(clock.host_event(&note, timestamp_us));
                    }
                },
                (),
            )
            .map_err(|e| io::Error::other(format!("MIDI connect: {e}")))?;
        info!("listening on MIDI port '{port_name}' at {} BPM", config.bpm);

        Ok(Self {
            _connection: connection,
            port_name,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// List all available MIDI input device names.
    pub fn list_devices() -> Vec<String> {
        let Ok(midi_in) = MidirInput::new("drumloop-list") else {
            return Vec::new();
        };
        midi_in
            .ports()
            .iter()
            .filter_map(|p| midi_in.port_name(p).ok())
            .collect()
    }
}

/// Index of the port to open: the first whose name contains `filter`, or port 0.
fn select_port(names: &[String], filter: Option<&str>) -> io::Result<usize> {
    if names.is_empty() {
        return Err(io::Error::other("no MIDI input ports available"));
    }
    match filter {
        None => Ok(0),
        Some(filter) => names
            .iter()
            .position(|name| name.contains(filter))
            .ok_or_else(|| {
                io::Error::other(format!("MIDI device matching '{filter}' not found"))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_devices_does_not_panic() {
        // May be empty on machines without MIDI hardware.
        let _ = MidiListener::list_devices();
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn select_port_defaults_to_first() {
        let ports = names(&["IAC Bus 1", "Drum Pad"]);
        assert_eq!(select_port(&ports, None).unwrap(), 0);
    }

    #[test]
    fn select_port_matches_substring() {
        let ports = names(&["IAC Bus 1", "Drum Pad MIDI 1"]);
        assert_eq!(select_port(&ports, Some("Drum")).unwrap(), 1);
        assert!(select_port(&ports, Some("Launchpad")).is_err());
    }

    #[test]
    fn select_port_needs_a_port() {
        assert!(select_port(&[], None).is_err());
    }
}
