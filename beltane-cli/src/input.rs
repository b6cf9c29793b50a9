//! MIDI input management over midir.
//!
//! The midir callback runs on a driver thread; events are pushed through a
//! single mpsc channel and consumed one at a time by the main loop, which
//! keeps dispatch strictly in arrival order.

use std::sync::mpsc::{self, Receiver};

use midir::{Ignore, MidiInput, MidiInputConnection};

use beltane_types::MidiEvent;

/// Information about an available MIDI port
#[derive(Debug, Clone)]
pub struct MidiPortInfo {
    pub index: usize,
    pub name: String,
}

/// MIDI input manager for the surface's port
pub struct SurfaceInput {
    midi_in: Option<MidiInput>,
    connection: Option<MidiInputConnection<()>>,
    event_receiver: Option<Receiver<MidiEvent>>,
    connected_port_name: Option<String>,
    available_ports: Vec<MidiPortInfo>,
}

fn new_midi_input() -> Option<MidiInput> {
    let mut midi_in = MidiInput::new("beltane").ok()?;
    // Sysex carries the tempo-sync handshake; don't let the driver drop it.
    midi_in.ignore(Ignore::None);
    Some(midi_in)
}

impl SurfaceInput {
    pub fn new() -> Self {
        SurfaceInput {
            midi_in: new_midi_input(),
            connection: None,
            event_receiver: None,
            connected_port_name: None,
            available_ports: Vec::new(),
        }
    }

    /// Refresh the list of available MIDI input ports
    pub fn refresh_ports(&mut self) {
        self.available_ports.clear();

        if let Some(ref midi_in) = self.midi_in {
            let ports = midi_in.ports();
            for (index, port) in ports.iter().enumerate() {
                if let Ok(name) = midi_in.port_name(port) {
                    self.available_ports.push(MidiPortInfo { index, name });
                }
            }
        }
    }

    pub fn list_ports(&self) -> &[MidiPortInfo] {
        &self.available_ports
    }

    pub fn connected_port_name(&self) -> Option<&str> {
        self.connected_port_name.as_deref()
    }

    /// Connect to a MIDI input port by index
    pub fn connect(&mut self, port_index: usize) -> Result<(), String> {
        self.disconnect();

        // Need to recreate MidiInput after taking ownership for connection
        let midi_in = new_midi_input().ok_or("MIDI backend unavailable")?;
        let ports = midi_in.ports();

        if port_index >= ports.len() {
            return Err(format!("Invalid port index: {}", port_index));
        }

        let port = &ports[port_index];
        let port_name = midi_in
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let (tx, rx) = mpsc::channel();
        self.event_receiver = Some(rx);

        let connection = midi_in
            .connect(
                port,
                "beltane-input",
                move |_timestamp, message, _| {
                    if let Some(event) = MidiEvent::from_raw(message) {
                        let _ = tx.send(event);
                    } else {
                        log::debug!(target: "midi", "dropping unrecognized message: {:02X?}", message);
                    }
                },
                (),
            )
            .map_err(|e| e.to_string())?;

        self.connection = Some(connection);
        self.connected_port_name = Some(port_name);
        self.midi_in = new_midi_input();

        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.close();
        }
        self.event_receiver = None;
        self.connected_port_name = None;
    }

    /// Block until the next event arrives, or `None` once disconnected.
    pub fn recv_event(&self) -> Option<MidiEvent> {
        self.event_receiver.as_ref()?.recv().ok()
    }
}

impl Default for SurfaceInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SurfaceInput {
    fn drop(&mut self) {
        self.disconnect();
    }
}
