//! Terminal-backed collaborator implementations.
//!
//! The real DAW and device sit behind `HostControl` and `SurfaceOutput`;
//! this binary stands them in with the log and stdout so the routing can be
//! exercised against live hardware.

use beltane_core::surface::{HostControl, SurfaceOutput};
use beltane_types::{MidiEvent, NavDirection};

/// Logs every host call the router makes.
#[derive(Default)]
pub struct LogHost;

impl LogHost {
    fn call(&self, what: &str) {
        log::info!(target: "host", "{}", what);
        println!("[host] {}", what);
    }
}

impl HostControl for LogHost {
    fn transport_start(&mut self) {
        self.call("transport start");
    }
    fn transport_stop(&mut self) {
        self.call("transport stop");
    }
    fn transport_record(&mut self) {
        self.call("transport record");
    }
    fn toggle_loop(&mut self) {
        self.call("toggle loop recording");
    }
    fn toggle_step_edit(&mut self) {
        self.call("toggle step edit");
    }
    fn toggle_wait_for_input(&mut self) {
        self.call("toggle wait-for-input");
    }
    fn toggle_metronome(&mut self) {
        self.call("toggle metronome");
    }
    fn rewind(&mut self) {
        self.call("rewind");
    }
    fn fast_forward(&mut self) {
        self.call("fast forward");
    }
    fn undo(&mut self) {
        self.call("undo");
    }
    fn redo(&mut self) {
        self.call("redo");
    }
    fn switch_window(&mut self) {
        self.call("switch window");
    }
    fn toggle_browser(&mut self) {
        self.call("toggle browser");
    }
    fn navigate(&mut self, direction: NavDirection) {
        match direction {
            NavDirection::Previous => self.call("navigate previous"),
            NavDirection::Next => self.call("navigate next"),
        }
    }
    fn set_track_volume(&mut self, value: f32) {
        self.call(&format!("track volume {:.2}", value));
    }
    fn set_track_pan(&mut self, value: f32) {
        self.call(&format!("track pan {:.2}", value));
    }
    fn plugin_param(&mut self, control: u8, value: u8) {
        self.call(&format!("plugin param {} = {}", control, value));
    }
    fn forward_cc(&mut self, event: &MidiEvent) {
        self.call(&format!("forward cc {} = {}", event.data1, event.data2));
    }
}

/// Prints display labels and logs raw device frames.
#[derive(Default)]
pub struct TerminalOutput;

impl SurfaceOutput for TerminalOutput {
    fn send_to_device(&mut self, payload: &[u8]) {
        log::debug!(target: "device", "frame {:02X?}", payload);
    }

    fn display(&mut self, text: &str) {
        log::info!(target: "device", "display: {}", text);
        println!("[display] {}", text);
    }
}
