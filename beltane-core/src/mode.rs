//! Scale-snap arming state machine.
//!
//! Three flags drive the mode: `enabled` (snapping active), `held` (the
//! arming pad is physically down), `just_edited` (a root or scale change
//! happened during the current hold). Activating the pad counts as an edit,
//! so the first press-and-release leaves snapping on; a plain press-release
//! with no edit while already on turns it off.

use beltane_types::{MidiEvent, NavDirection};

use crate::scaler::ScaleEngine;
use crate::surface::{snap_light_frame, SurfaceOutput};

/// Scale-snap mode flags. Session-wide; reset only at surface init.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SnapMode {
    pub enabled: bool,
    pub held: bool,
    pub just_edited: bool,
}

impl SnapMode {
    /// Handle a press or release of the arming pad.
    pub fn on_pad(
        &mut self,
        pressed: bool,
        shift: bool,
        scaler: &ScaleEngine,
        output: &mut dyn SurfaceOutput,
    ) {
        if pressed {
            self.held = true;
            if !self.enabled {
                self.enabled = true;
                self.just_edited = true;
                output.display(&scaler.current_label());
            }
        } else {
            self.held = false;
            if self.enabled && !self.just_edited {
                self.enabled = false;
                output.display("OFF");
            }
            self.just_edited = false;
        }
        output.send_to_device(&snap_light_frame(shift, self.enabled));
    }

    /// Handle a melodic note event. While the pad is held the note selects
    /// the new root and is consumed; while snapping is on it is remapped in
    /// place and forwarded; otherwise it passes through untouched.
    pub fn on_note(
        &mut self,
        event: &mut MidiEvent,
        scaler: &mut ScaleEngine,
        output: &mut dyn SurfaceOutput,
    ) -> bool {
        if self.held {
            let root = scaler.event_pitch_class(event);
            scaler.set_root(root);
            self.just_edited = true;
            output.display(&scaler.current_label());
            true
        } else if self.enabled {
            scaler.remap(event);
            false
        } else {
            false
        }
    }

    /// Handle an encoder turn. Consumes the event only while the pad is
    /// held, cycling to the neighboring scale.
    pub fn on_cycle(
        &mut self,
        direction: NavDirection,
        scaler: &mut ScaleEngine,
        output: &mut dyn SurfaceOutput,
    ) -> bool {
        if !self.held {
            return false;
        }
        self.just_edited = true;
        match direction {
            NavDirection::Previous => scaler.previous_scale(),
            NavDirection::Next => scaler.next_scale(),
        }
        output.display(&scaler.current_label());
        true
    }
}
