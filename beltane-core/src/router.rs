//! Composition root: the dispatch-table tree and the session it drives.
//!
//! The top-level table classifies by message kind and delegates to
//! second-level tables keyed by control number, encoder velocity, status, or
//! raw sysex payload. Melodic notes route through the scale-snap mode
//! machine; everything else lands on a one-line host or device call.

use std::ops::RangeInclusive;

use beltane_types::{
    MemoryMode, MidiEvent, NavDirection, DRUM_NOTE_OFF, DRUM_NOTE_ON, MIDI_CONTROL_CHANGE,
    MIDI_NOTE_OFF, MIDI_NOTE_ON, MIDI_PITCH_WHEEL, MIDI_SYSEX,
};

use crate::config::Config;
use crate::dispatch::{DispatchTable, KeyExtract};
use crate::predicate::{always, ignore_press, ignore_release, is_pressed};
use crate::session::{SessionState, SurfaceContext};
use crate::surface::{snap_light_frame, HostControl, SurfaceOutput, STOP_ACK_FRAME};

/// Control numbers of the surface's buttons, knobs, and pads.
pub mod control {
    // Buttons (control-change)
    pub const SHIFT: u8 = 27;
    pub const MAIN_ENCODER: u8 = 28;
    pub const ENCODER_CLICK: u8 = 29;
    pub const METRONOME: u8 = 102;
    pub const REWIND: u8 = 103;
    pub const FAST_FORWARD: u8 = 104;
    pub const LOOP: u8 = 105;
    pub const STOP: u8 = 106;
    pub const START: u8 = 107;
    pub const RECORD: u8 = 108;
    pub const REDO: u8 = 109;
    pub const SWITCH_WINDOW: u8 = 118;
    pub const BROWSER_TOGGLE: u8 = 119;

    // Mixer knobs
    pub const TRACK_VOLUME: u8 = 14;
    pub const TRACK_PAN: u8 = 31;

    // Drum pads (note numbers on the drum channel)
    pub const PAD_SNAP: u8 = 36;
    pub const PAD_WAIT_INPUT: u8 = 37;
    pub const PAD_STEP_EDIT: u8 = 38;
    pub const PAD_LOOP: u8 = 39;
    pub const PAD_STOP: u8 = 40;
    pub const PAD_START: u8 = 41;
    pub const PAD_RECORD: u8 = 42;
    pub const PAD_UNDO: u8 = 43;
}

/// CC ids forwarded untouched to Analog Lab style instruments.
pub const FORWARDED_KNOBS: [u8; 18] = [
    1, 9, 16, 17, 18, 19, 71, 74, 76, 77, 82, 83, 85, 93, 112, 113, 114, 115,
];

/// CC ids mapped onto the focused plugin's parameters.
pub const PLUGIN_KNOBS: [u8; 10] = [15, 30, 86, 87, 89, 90, 110, 111, 116, 117];

/// Main-encoder velocity zones for relative turns.
const ENCODER_NEXT: RangeInclusive<u8> = 65..=72;
const ENCODER_PREV: RangeInclusive<u8> = 55..=62;

/// Handshake payload: the controller keeps its own tempo-sync memory.
pub const SYSEX_CONTROLLER_TEMPO_SYNC: &[u8] = &[
    0xF0, 0x00, 0x20, 0x6B, 0x7F, 0x42, 0x02, 0x00, 0x40, 0x62, 0x01, 0xF7,
];
/// Handshake payload: the host owns tempo-sync.
pub const SYSEX_HOST_TEMPO_SYNC: &[u8] = &[
    0xF0, 0x00, 0x20, 0x6B, 0x7F, 0x42, 0x02, 0x00, 0x40, 0x62, 0x02, 0xF7,
];

const NOTE_KINDS: [u8; 2] = [MIDI_NOTE_ON, MIDI_NOTE_OFF];
const MELODIC_STATUSES: [u8; 2] = [MIDI_NOTE_ON, MIDI_NOTE_OFF];
const DRUM_STATUSES: [u8; 2] = [DRUM_NOTE_ON, DRUM_NOTE_OFF];

/// Routes every inbound event through the classification tree.
pub struct Router {
    session: SessionState,
    table: DispatchTable,
}

impl Router {
    pub fn new(config: &Config) -> Self {
        Self::with_session(SessionState::from_config(config))
    }

    pub fn with_session(session: SessionState) -> Self {
        Router {
            session,
            table: root_table(),
        }
    }

    /// Run one full synchronous dispatch pass. The returned flag (also
    /// written to `event.handled`) tells the host whether to forward the
    /// event downstream.
    pub fn process(
        &mut self,
        event: &mut MidiEvent,
        host: &mut dyn HostControl,
        output: &mut dyn SurfaceOutput,
    ) -> bool {
        let mut ctx = SurfaceContext {
            session: &mut self.session,
            host,
            output,
        };
        let handled = self.table.dispatch(&mut ctx, event);
        event.handled = handled;
        if !handled {
            log::debug!(
                target: "dispatch",
                "unhandled: status {} data1 {} data2 {}",
                event.status,
                event.data1,
                event.data2
            );
        }
        handled
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::with_session(SessionState::default())
    }
}

fn root_table() -> DispatchTable {
    DispatchTable::new(KeyExtract::MidiId)
        .delegate(MIDI_CONTROL_CHANGE, command_table())
        .delegate(MIDI_PITCH_WHEEL, wheel_table())
        .delegate_many(&NOTE_KINDS, note_table())
        .delegate(MIDI_SYSEX, sysex_table())
}

fn command_table() -> DispatchTable {
    DispatchTable::new(KeyExtract::ControlNum)
        .register_guarded(control::START, on_start, ignore_press)
        .register(control::STOP, on_stop)
        .register_guarded(control::RECORD, on_record, ignore_press)
        .register(control::REDO, on_redo)
        .register_guarded(control::METRONOME, on_metronome, ignore_press)
        .register_guarded(control::LOOP, on_loop, ignore_press)
        .register(control::REWIND, on_rewind)
        .register(control::FAST_FORWARD, on_fast_forward)
        .register_guarded(control::SWITCH_WINDOW, on_switch_window, ignore_release)
        .delegate(control::MAIN_ENCODER, encoder_table())
        .register(control::ENCODER_CLICK, on_encoder_click)
        .register_guarded(control::BROWSER_TOGGLE, on_browser_toggle, ignore_release)
        .register(control::SHIFT, on_shift)
        .register(control::TRACK_VOLUME, on_track_volume)
        .register(control::TRACK_PAN, on_track_pan)
        .register_many(&FORWARDED_KNOBS, on_forward_cc, always)
        .register_many(&PLUGIN_KNOBS, on_plugin_param, always)
}

fn encoder_table() -> DispatchTable {
    DispatchTable::new(KeyExtract::Velocity)
        .register(ENCODER_NEXT, on_navigate)
        .register(ENCODER_PREV, on_navigate)
}

fn note_table() -> DispatchTable {
    DispatchTable::new(KeyExtract::Status)
        .delegate_many(&DRUM_STATUSES, drum_table())
        .register_many(&MELODIC_STATUSES, on_melodic_note, always)
}

fn drum_table() -> DispatchTable {
    DispatchTable::new(KeyExtract::ControlNum)
        .register(control::PAD_SNAP, on_snap_pad)
        .register_guarded(control::PAD_WAIT_INPUT, on_wait_input, ignore_release)
        .register_guarded(control::PAD_STEP_EDIT, on_step_edit, ignore_release)
        .register_guarded(control::PAD_LOOP, on_loop, ignore_release)
        .register(control::PAD_STOP, on_stop)
        .register_guarded(control::PAD_START, on_start, ignore_release)
        .register_guarded(control::PAD_RECORD, on_record, ignore_release)
        .register(control::PAD_UNDO, on_undo)
        // Remaining pads only track their LEDs; the event stays unhandled so
        // the host can still play it.
        .register(44..=51, on_unmapped_pad)
}

fn sysex_table() -> DispatchTable {
    DispatchTable::new(KeyExtract::Sysex)
        .register_guarded(SYSEX_CONTROLLER_TEMPO_SYNC, on_controller_memory, ignore_release)
        .register_guarded(SYSEX_HOST_TEMPO_SYNC, on_host_memory, ignore_release)
}

fn wheel_table() -> DispatchTable {
    // Pitch-wheel moves are forwarded by the host untouched; nothing is
    // classified here yet.
    DispatchTable::new(KeyExtract::Status)
}

// Transport and UI handlers. Each is one call into the host collaborator.

fn on_start(ctx: &mut SurfaceContext<'_>, _event: &mut MidiEvent) -> bool {
    ctx.host.transport_start();
    true
}

fn on_stop(ctx: &mut SurfaceContext<'_>, event: &mut MidiEvent) -> bool {
    if is_pressed(event) {
        ctx.host.transport_stop();
        ctx.output.send_to_device(&STOP_ACK_FRAME);
    }
    true
}

fn on_record(ctx: &mut SurfaceContext<'_>, _event: &mut MidiEvent) -> bool {
    ctx.host.transport_record();
    true
}

fn on_loop(ctx: &mut SurfaceContext<'_>, _event: &mut MidiEvent) -> bool {
    ctx.host.toggle_loop();
    true
}

fn on_step_edit(ctx: &mut SurfaceContext<'_>, _event: &mut MidiEvent) -> bool {
    ctx.host.toggle_step_edit();
    true
}

fn on_wait_input(ctx: &mut SurfaceContext<'_>, _event: &mut MidiEvent) -> bool {
    ctx.host.toggle_wait_for_input();
    true
}

fn on_metronome(ctx: &mut SurfaceContext<'_>, _event: &mut MidiEvent) -> bool {
    ctx.host.toggle_metronome();
    true
}

fn on_rewind(ctx: &mut SurfaceContext<'_>, _event: &mut MidiEvent) -> bool {
    ctx.host.rewind();
    true
}

fn on_fast_forward(ctx: &mut SurfaceContext<'_>, _event: &mut MidiEvent) -> bool {
    ctx.host.fast_forward();
    true
}

fn on_undo(ctx: &mut SurfaceContext<'_>, event: &mut MidiEvent) -> bool {
    if is_pressed(event) {
        ctx.host.undo();
    }
    true
}

fn on_redo(ctx: &mut SurfaceContext<'_>, event: &mut MidiEvent) -> bool {
    if is_pressed(event) {
        ctx.host.redo();
    }
    true
}

fn on_switch_window(ctx: &mut SurfaceContext<'_>, _event: &mut MidiEvent) -> bool {
    ctx.host.switch_window();
    true
}

fn on_browser_toggle(ctx: &mut SurfaceContext<'_>, _event: &mut MidiEvent) -> bool {
    ctx.host.toggle_browser();
    true
}

fn on_shift(ctx: &mut SurfaceContext<'_>, event: &mut MidiEvent) -> bool {
    ctx.session.shift = is_pressed(event);
    let frame = snap_light_frame(ctx.session.shift, ctx.session.snap.enabled);
    ctx.output.send_to_device(&frame);
    true
}

fn on_track_volume(ctx: &mut SurfaceContext<'_>, event: &mut MidiEvent) -> bool {
    ctx.host.set_track_volume(event.data2 as f32 / 127.0);
    true
}

fn on_track_pan(ctx: &mut SurfaceContext<'_>, event: &mut MidiEvent) -> bool {
    let value = ((event.data2 as f32 * (128.0 / 127.0)) - 64.0).round() / 64.0;
    ctx.host.set_track_pan(value);
    true
}

fn on_plugin_param(ctx: &mut SurfaceContext<'_>, event: &mut MidiEvent) -> bool {
    ctx.host.plugin_param(event.data1, event.data2);
    true
}

fn on_forward_cc(ctx: &mut SurfaceContext<'_>, event: &mut MidiEvent) -> bool {
    ctx.host.forward_cc(event);
    true
}

fn on_encoder_click(ctx: &mut SurfaceContext<'_>, event: &mut MidiEvent) -> bool {
    if event.data2 > 64 {
        ctx.host.fast_forward();
    } else {
        ctx.host.rewind();
    }
    true
}

fn on_navigate(ctx: &mut SurfaceContext<'_>, event: &mut MidiEvent) -> bool {
    let direction = if event.data2 >= 65 {
        NavDirection::Next
    } else {
        NavDirection::Previous
    };
    let SessionState { scaler, snap, .. } = &mut *ctx.session;
    if snap.on_cycle(direction, scaler, ctx.output) {
        return true;
    }
    ctx.host.navigate(direction);
    true
}

// Note-path handlers.

fn on_snap_pad(ctx: &mut SurfaceContext<'_>, event: &mut MidiEvent) -> bool {
    let pressed = is_pressed(event);
    let SessionState {
        scaler,
        snap,
        shift,
        ..
    } = &mut *ctx.session;
    snap.on_pad(pressed, *shift, scaler, ctx.output);
    true
}

fn on_melodic_note(ctx: &mut SurfaceContext<'_>, event: &mut MidiEvent) -> bool {
    let SessionState { scaler, snap, .. } = &mut *ctx.session;
    snap.on_note(event, scaler, ctx.output)
}

fn on_unmapped_pad(ctx: &mut SurfaceContext<'_>, event: &mut MidiEvent) -> bool {
    let pressed = is_pressed(event);
    let SessionState { pads, .. } = &mut *ctx.session;
    pads.set(event.data1, pressed, ctx.output);
    false
}

// Memory handshake handlers.

fn on_controller_memory(ctx: &mut SurfaceContext<'_>, _event: &mut MidiEvent) -> bool {
    ctx.session.memory = MemoryMode::Controller;
    true
}

fn on_host_memory(ctx: &mut SurfaceContext<'_>, _event: &mut MidiEvent) -> bool {
    ctx.session.memory = MemoryMode::Host;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::fakes::{RecordingHost, RecordingOutput};
    use beltane_types::PitchClass;

    struct Rig {
        router: Router,
        host: RecordingHost,
        output: RecordingOutput,
    }

    impl Rig {
        fn new() -> Self {
            Rig {
                router: Router::default(),
                host: RecordingHost::default(),
                output: RecordingOutput::default(),
            }
        }

        fn send(&mut self, mut event: MidiEvent) -> (bool, MidiEvent) {
            let handled = self
                .router
                .process(&mut event, &mut self.host, &mut self.output);
            (handled, event)
        }
    }

    #[test]
    fn test_stop_button_calls_host_and_acks_device() {
        let mut rig = Rig::new();
        let (handled, _) = rig.send(MidiEvent::control_change(control::STOP, 127));
        assert!(handled);
        assert_eq!(rig.host.calls, vec!["stop"]);
        assert!(rig.output.frames.contains(&STOP_ACK_FRAME.to_vec()));
        // Release is still handled but triggers nothing new.
        let (handled, _) = rig.send(MidiEvent::control_change(control::STOP, 0));
        assert!(handled);
        assert_eq!(rig.host.calls, vec!["stop"]);
    }

    #[test]
    fn test_start_button_fires_on_release_only() {
        let mut rig = Rig::new();
        let (handled, _) = rig.send(MidiEvent::control_change(control::START, 127));
        assert!(!handled);
        assert!(rig.host.calls.is_empty());
        let (handled, _) = rig.send(MidiEvent::control_change(control::START, 0));
        assert!(handled);
        assert_eq!(rig.host.calls, vec!["start"]);
    }

    #[test]
    fn test_unknown_control_is_not_handled() {
        let mut rig = Rig::new();
        let (handled, _) = rig.send(MidiEvent::control_change(99, 127));
        assert!(!handled);
        assert!(rig.host.calls.is_empty());
    }

    #[test]
    fn test_pitch_wheel_passes_through() {
        let mut rig = Rig::new();
        let (handled, _) = rig.send(MidiEvent::pitch_wheel(0, 96));
        assert!(!handled);
    }

    #[test]
    fn test_volume_and_pan_scaling() {
        let mut rig = Rig::new();
        rig.send(MidiEvent::control_change(control::TRACK_VOLUME, 127));
        rig.send(MidiEvent::control_change(control::TRACK_PAN, 0));
        assert_eq!(rig.host.calls, vec!["volume 1.00", "pan -1.00"]);
    }

    #[test]
    fn test_forwarded_and_plugin_knobs() {
        let mut rig = Rig::new();
        rig.send(MidiEvent::control_change(74, 42));
        rig.send(MidiEvent::control_change(86, 99));
        assert_eq!(rig.host.calls, vec!["forward_cc 74 42", "plugin 86 99"]);
    }

    #[test]
    fn test_encoder_navigates_when_snap_idle() {
        let mut rig = Rig::new();
        rig.send(MidiEvent::control_change(control::MAIN_ENCODER, 70));
        rig.send(MidiEvent::control_change(control::MAIN_ENCODER, 58));
        assert_eq!(rig.host.calls, vec!["navigate_next", "navigate_previous"]);
        // Out-of-zone velocity is unhandled.
        let (handled, _) = rig.send(MidiEvent::control_change(control::MAIN_ENCODER, 64));
        assert!(!handled);
    }

    #[test]
    fn test_encoder_cycles_scale_while_pad_held() {
        let mut rig = Rig::new();
        rig.send(MidiEvent::drum_on(control::PAD_SNAP, 100));
        rig.send(MidiEvent::control_change(control::MAIN_ENCODER, 70));
        assert!(rig.host.calls.is_empty());
        assert_eq!(
            rig.router.session().scaler.current_label(),
            "B - Major"
        );
        assert_eq!(
            rig.output.labels,
            vec!["B - Minor Natural", "B - Major"]
        );
    }

    #[test]
    fn test_snap_arming_and_root_edit_flow() {
        let mut rig = Rig::new();
        // Arm.
        rig.send(MidiEvent::drum_on(control::PAD_SNAP, 100));
        assert!(rig.router.session().snap.enabled);
        // Root select consumes the note.
        let (handled, _) = rig.send(MidiEvent::note_on(60, 100));
        assert!(handled);
        assert_eq!(rig.router.session().scaler.root(), PitchClass::C);
        // Release keeps snap on after the edit.
        rig.send(MidiEvent::drum_off(control::PAD_SNAP));
        assert!(rig.router.session().snap.enabled);
        // Press + release with no edit turns it off.
        rig.send(MidiEvent::drum_on(control::PAD_SNAP, 100));
        rig.send(MidiEvent::drum_off(control::PAD_SNAP));
        assert!(!rig.router.session().snap.enabled);
        assert_eq!(rig.output.labels.last().map(String::as_str), Some("OFF"));
    }

    #[test]
    fn test_armed_surface_remaps_melodic_notes() {
        let mut rig = Rig::new();
        rig.send(MidiEvent::drum_on(control::PAD_SNAP, 100));
        rig.send(MidiEvent::drum_off(control::PAD_SNAP));
        // Defaults are B minor natural: C#4 snaps to C4.
        let (handled, event) = rig.send(MidiEvent::note_on(61, 100));
        assert!(!handled);
        assert_eq!(event.data1, 60);
        // Note-off takes the same path.
        let (_, off) = rig.send(MidiEvent::note_off(61));
        assert_eq!(off.data1, 60);
    }

    #[test]
    fn test_idle_surface_leaves_notes_alone() {
        let mut rig = Rig::new();
        let (handled, event) = rig.send(MidiEvent::note_on(61, 100));
        assert!(!handled);
        assert_eq!(event.data1, 61);
    }

    #[test]
    fn test_drum_pads_hit_transport_handlers() {
        let mut rig = Rig::new();
        rig.send(MidiEvent::drum_on(control::PAD_START, 100));
        rig.send(MidiEvent::drum_on(control::PAD_RECORD, 100));
        rig.send(MidiEvent::drum_on(control::PAD_UNDO, 100));
        // Releases are guarded out for start/record, no-ops for undo.
        rig.send(MidiEvent::drum_off(control::PAD_START));
        rig.send(MidiEvent::drum_off(control::PAD_RECORD));
        assert_eq!(rig.host.calls, vec!["start", "record", "undo"]);
    }

    #[test]
    fn test_unmapped_pad_lights_but_stays_unhandled() {
        let mut rig = Rig::new();
        let (handled, _) = rig.send(MidiEvent::drum_on(45, 100));
        assert!(!handled);
        assert!(rig.router.session().pads.is_down(45));
        assert_eq!(rig.output.frames.len(), 16);
        let (handled, _) = rig.send(MidiEvent::drum_off(45));
        assert!(!handled);
        assert!(!rig.router.session().pads.is_down(45));
    }

    #[test]
    fn test_tempo_sync_handshake_sets_memory_mode() {
        let mut rig = Rig::new();
        let (handled, _) =
            rig.send(MidiEvent::system_exclusive(SYSEX_HOST_TEMPO_SYNC.to_vec()));
        assert!(handled);
        assert_eq!(rig.router.session().memory, MemoryMode::Host);
        let (handled, _) = rig.send(MidiEvent::system_exclusive(
            SYSEX_CONTROLLER_TEMPO_SYNC.to_vec(),
        ));
        assert!(handled);
        assert_eq!(rig.router.session().memory, MemoryMode::Controller);
        // Unknown payloads fall through.
        let (handled, _) =
            rig.send(MidiEvent::system_exclusive(vec![0xF0, 0x7E, 0xF7]));
        assert!(!handled);
    }

    #[test]
    fn test_shift_flag_tracks_press_state() {
        let mut rig = Rig::new();
        rig.send(MidiEvent::control_change(control::SHIFT, 127));
        assert!(rig.router.session().shift);
        rig.send(MidiEvent::control_change(control::SHIFT, 0));
        assert!(!rig.router.session().shift);
    }
}
