//! MIDI event model for one dispatch pass.
//!
//! An event is built once at the input boundary, flows through the dispatch
//! tree, and may be rewritten in place (scale remapping edits `data1`) before
//! the host forwards it downstream.

/// Control-change status, channel 1.
pub const MIDI_CONTROL_CHANGE: u8 = 176;
/// Pitch-wheel status, channel 1.
pub const MIDI_PITCH_WHEEL: u8 = 224;
/// Note-on status, channel 1.
pub const MIDI_NOTE_ON: u8 = 144;
/// Note-off status, channel 1.
pub const MIDI_NOTE_OFF: u8 = 128;
/// Note-on status on the drum channel (channel 10).
pub const DRUM_NOTE_ON: u8 = 153;
/// Note-off status on the drum channel (channel 10).
pub const DRUM_NOTE_OFF: u8 = 137;
/// System-exclusive status byte.
pub const MIDI_SYSEX: u8 = 240;

/// One inbound controller message.
///
/// `midi_id` is the status nibble (message kind) used for top-level
/// classification; `status` keeps the full byte so drum-channel messages
/// (153/137) can be told apart from melodic note-ons/offs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiEvent {
    /// Message kind: status with the channel nibble masked off.
    pub midi_id: u8,
    /// Controller id for control-change messages; mirrors `data1` for notes.
    pub control_num: u8,
    /// First data byte: note number or controller id. Always in 0..=127.
    pub data1: u8,
    /// Second data byte: velocity or controller value. Always in 0..=127.
    pub data2: u8,
    /// Full status byte as received.
    pub status: u8,
    /// Raw payload for system-exclusive messages, matched exactly.
    pub sysex: Option<Vec<u8>>,
    /// Derived press value: nonzero while the control is held down.
    pub control_val: u8,
    /// Set once a handler has fully consumed the event.
    pub handled: bool,
}

impl MidiEvent {
    fn channel_voice(status: u8, data1: u8, data2: u8, control_val: u8) -> Self {
        MidiEvent {
            midi_id: status & 0xF0,
            control_num: data1,
            data1,
            data2,
            status,
            sysex: None,
            control_val,
            handled: false,
        }
    }

    /// Melodic note-on.
    pub fn note_on(note: u8, velocity: u8) -> Self {
        Self::channel_voice(MIDI_NOTE_ON, note, velocity, velocity)
    }

    /// Melodic note-off.
    pub fn note_off(note: u8) -> Self {
        Self::channel_voice(MIDI_NOTE_OFF, note, 0, 0)
    }

    /// Drum-channel pad press.
    pub fn drum_on(pad: u8, velocity: u8) -> Self {
        Self::channel_voice(DRUM_NOTE_ON, pad, velocity, velocity)
    }

    /// Drum-channel pad release.
    pub fn drum_off(pad: u8) -> Self {
        Self::channel_voice(DRUM_NOTE_OFF, pad, 0, 0)
    }

    /// Control change with a controller id and value.
    pub fn control_change(control_num: u8, value: u8) -> Self {
        Self::channel_voice(MIDI_CONTROL_CHANGE, control_num, value, value)
    }

    /// Pitch-wheel move, raw 7-bit data bytes.
    pub fn pitch_wheel(lsb: u8, msb: u8) -> Self {
        Self::channel_voice(MIDI_PITCH_WHEEL, lsb, msb, msb)
    }

    /// System-exclusive message carrying its full raw payload.
    pub fn system_exclusive(payload: Vec<u8>) -> Self {
        MidiEvent {
            midi_id: MIDI_SYSEX,
            control_num: 0,
            data1: 0,
            data2: 0,
            status: MIDI_SYSEX,
            sysex: Some(payload),
            // Sysex has no release edge; treat as pressed so press-only
            // guards accept it.
            control_val: 1,
            handled: false,
        }
    }

    /// Parse a raw wire message into an event. Returns `None` for message
    /// kinds the surface never produces (aftertouch, clock, etc.); the
    /// caller treats those as unclassified.
    pub fn from_raw(data: &[u8]) -> Option<Self> {
        let status = *data.first()?;
        if status == MIDI_SYSEX {
            return Some(Self::system_exclusive(data.to_vec()));
        }
        match status & 0xF0 {
            MIDI_NOTE_ON => {
                let (note, velocity) = (*data.get(1)?, *data.get(2)?);
                if velocity == 0 {
                    Some(Self::channel_voice(status, note, 0, 0))
                } else {
                    Some(Self::channel_voice(status, note, velocity, velocity))
                }
            }
            MIDI_NOTE_OFF => {
                let note = *data.get(1)?;
                Some(Self::channel_voice(status, note, 0, 0))
            }
            MIDI_CONTROL_CHANGE => {
                let (num, value) = (*data.get(1)?, *data.get(2)?);
                Some(Self::channel_voice(status, num, value, value))
            }
            MIDI_PITCH_WHEEL => {
                let (lsb, msb) = (*data.get(1)?, *data.get(2)?);
                Some(Self::channel_voice(status, lsb, msb, msb))
            }
            _ => None,
        }
    }

    /// True for pad/drum-trigger statuses (channel 10 note-on/off).
    pub fn is_drum_status(&self) -> bool {
        self.status == DRUM_NOTE_ON || self.status == DRUM_NOTE_OFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on_classification() {
        let ev = MidiEvent::note_on(62, 100);
        assert_eq!(ev.midi_id, MIDI_NOTE_ON);
        assert_eq!(ev.data1, 62);
        assert_eq!(ev.control_val, 100);
        assert!(!ev.is_drum_status());
    }

    #[test]
    fn test_drum_status() {
        assert!(MidiEvent::drum_on(36, 90).is_drum_status());
        assert!(MidiEvent::drum_off(36).is_drum_status());
        assert!(!MidiEvent::control_change(106, 127).is_drum_status());
    }

    #[test]
    fn test_from_raw_note_on() {
        let ev = MidiEvent::from_raw(&[0x90, 60, 100]).unwrap();
        assert_eq!(ev.midi_id, MIDI_NOTE_ON);
        assert_eq!(ev.status, 0x90);
        assert_eq!((ev.data1, ev.data2), (60, 100));
    }

    #[test]
    fn test_from_raw_velocity_zero_is_release() {
        let ev = MidiEvent::from_raw(&[0x99, 38, 0]).unwrap();
        assert_eq!(ev.status, DRUM_NOTE_ON);
        assert_eq!(ev.control_val, 0);
    }

    #[test]
    fn test_from_raw_sysex_keeps_payload() {
        let raw = [0xF0, 0x00, 0x20, 0x6B, 0xF7];
        let ev = MidiEvent::from_raw(&raw).unwrap();
        assert_eq!(ev.sysex.as_deref(), Some(&raw[..]));
    }

    #[test]
    fn test_from_raw_ignores_aftertouch() {
        assert!(MidiEvent::from_raw(&[0xA0, 60, 10]).is_none());
        assert!(MidiEvent::from_raw(&[]).is_none());
    }
}
