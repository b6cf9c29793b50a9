//! Collaborator interfaces and device feedback frames.
//!
//! The core never talks to the DAW or the hardware directly: handlers call
//! through [`HostControl`] (transport, mixer, browser, plugin forwarding)
//! and [`SurfaceOutput`] (raw device frames, display text). Both are
//! synchronous fire-and-forget from the core's perspective.

use beltane_types::{MidiEvent, NavDirection};

/// One-line calls into the host DAW.
pub trait HostControl {
    fn transport_start(&mut self);
    fn transport_stop(&mut self);
    fn transport_record(&mut self);
    fn toggle_loop(&mut self);
    fn toggle_step_edit(&mut self);
    fn toggle_wait_for_input(&mut self);
    fn toggle_metronome(&mut self);
    fn rewind(&mut self);
    fn fast_forward(&mut self);
    fn undo(&mut self);
    fn redo(&mut self);
    fn switch_window(&mut self);
    fn toggle_browser(&mut self);
    fn navigate(&mut self, direction: NavDirection);
    /// Track volume in 0.0..=1.0.
    fn set_track_volume(&mut self, value: f32);
    /// Track pan in -1.0..=1.0.
    fn set_track_pan(&mut self, value: f32);
    /// Forward a knob move to the focused plugin parameter.
    fn plugin_param(&mut self, control: u8, value: u8);
    /// Forward the raw CC to a plugin port (Analog Lab style instruments).
    fn forward_cc(&mut self, event: &MidiEvent);
}

/// Outbound feedback to the physical surface.
pub trait SurfaceOutput {
    /// Send a short fixed-format frame to the device (LED/pad color).
    fn send_to_device(&mut self, payload: &[u8]);
    /// Refresh the controller display with a label.
    fn display(&mut self, text: &str);
}

/// Acknowledgment frame flashed on transport stop.
pub const STOP_ACK_FRAME: [u8; 7] = [0x02, 0x02, 0x16, 0x08, 0x7F, 0x7F, 0x7F];

/// LED addresses of the 16 pads, row-major.
pub const PAD_MATRIX: [u8; 16] = [
    0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x3B, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x4A,
    0x4B,
];

/// First/last note numbers the drum pads emit.
pub const PAD_FIRST_NOTE: u8 = 36;
pub const PAD_LAST_NOTE: u8 = 51;

const PAD_LIT: [u8; 3] = [0x58, 0x58, 0x58];
const PAD_DIM: [u8; 3] = [0x14, 0x14, 0x14];
const PAD_BRIGHT: [u8; 3] = [0x7F, 0x7F, 0x7F];

fn pad_frame(address: u8, color: [u8; 3]) -> [u8; 8] {
    [
        0x02, 0x02, 0x16, address, color[0], color[1], color[2], 0x7F,
    ]
}

/// Color frame for the scale-snap pad: bright while shift is held, lit while
/// snap is on, dim otherwise.
pub fn snap_light_frame(shift: bool, snap_enabled: bool) -> [u8; 8] {
    let color = if snap_enabled {
        if shift {
            PAD_BRIGHT
        } else {
            PAD_LIT
        }
    } else {
        PAD_DIM
    };
    pad_frame(PAD_MATRIX[0], color)
}

/// Held/released state of the 16 drum pads, mirrored to their LEDs.
#[derive(Default)]
pub struct PadMatrix {
    state: [bool; 16],
}

impl PadMatrix {
    /// Record a pad edge and refresh every pad LED. Notes outside the pad
    /// range are ignored.
    pub fn set(&mut self, note: u8, down: bool, output: &mut dyn SurfaceOutput) {
        if !(PAD_FIRST_NOTE..=PAD_LAST_NOTE).contains(&note) {
            return;
        }
        self.state[(note - PAD_FIRST_NOTE) as usize] = down;
        self.refresh(output);
    }

    /// Push the LED color of all 16 pads to the device.
    pub fn refresh(&self, output: &mut dyn SurfaceOutput) {
        for (index, &down) in self.state.iter().enumerate() {
            let color = if down { PAD_LIT } else { PAD_DIM };
            output.send_to_device(&pad_frame(PAD_MATRIX[index], color));
        }
    }

    pub fn is_down(&self, note: u8) -> bool {
        (PAD_FIRST_NOTE..=PAD_LAST_NOTE).contains(&note)
            && self.state[(note - PAD_FIRST_NOTE) as usize]
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::RecordingOutput;
    use super::*;

    #[test]
    fn test_pad_matrix_tracks_edges_and_refreshes_all_leds() {
        let mut pads = PadMatrix::default();
        let mut output = RecordingOutput::default();
        pads.set(44, true, &mut output);
        assert!(pads.is_down(44));
        assert_eq!(output.frames.len(), 16);
        // Pad 44 is index 8, address 0x44, lit color.
        assert_eq!(output.frames[8], vec![0x02, 0x02, 0x16, 0x44, 0x58, 0x58, 0x58, 0x7F]);
        pads.set(44, false, &mut output);
        assert!(!pads.is_down(44));
    }

    #[test]
    fn test_pad_matrix_ignores_out_of_range_notes() {
        let mut pads = PadMatrix::default();
        let mut output = RecordingOutput::default();
        pads.set(35, true, &mut output);
        pads.set(52, true, &mut output);
        assert!(output.frames.is_empty());
    }

    #[test]
    fn test_snap_light_colors() {
        assert_eq!(snap_light_frame(false, true)[4..7], [0x58, 0x58, 0x58]);
        assert_eq!(snap_light_frame(true, true)[4..7], [0x7F, 0x7F, 0x7F]);
        assert_eq!(snap_light_frame(false, false)[4..7], [0x14, 0x14, 0x14]);
    }
}
