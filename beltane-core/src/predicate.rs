//! Stateless guard predicates over inbound events.
//!
//! These are plain `fn` values so dispatch entries can store them by value;
//! they compose only by substitution at registration time.

use beltane_types::MidiEvent;

/// Default guard: accepts everything.
pub fn always(_event: &MidiEvent) -> bool {
    true
}

/// The control is being pressed (nonzero control value).
pub fn is_pressed(event: &MidiEvent) -> bool {
    event.control_val != 0
}

/// The control is being released.
pub fn is_released(event: &MidiEvent) -> bool {
    !is_pressed(event)
}

/// Guard for handlers that only act on the press edge.
pub fn ignore_release(event: &MidiEvent) -> bool {
    is_pressed(event)
}

/// Guard for handlers that only act on the release edge.
pub fn ignore_press(event: &MidiEvent) -> bool {
    is_released(event)
}

/// Pad/drum-trigger status (channel 10 note-on/off).
pub fn is_drum(event: &MidiEvent) -> bool {
    event.is_drum_status()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release_are_negations() {
        let press = MidiEvent::control_change(106, 127);
        let release = MidiEvent::control_change(106, 0);
        assert!(is_pressed(&press) && !is_released(&press));
        assert!(is_released(&release) && !is_pressed(&release));
        assert!(ignore_release(&press) && !ignore_release(&release));
        assert!(ignore_press(&release) && !ignore_press(&press));
    }

    #[test]
    fn test_is_drum() {
        assert!(is_drum(&MidiEvent::drum_on(38, 100)));
        assert!(is_drum(&MidiEvent::drum_off(38)));
        assert!(!is_drum(&MidiEvent::note_on(38, 100)));
    }

    #[test]
    fn test_always() {
        assert!(always(&MidiEvent::note_off(0)));
    }
}
