//! Root note and scale selection, plus the chromatic-to-scale remap.
//!
//! Remapping treats the seven physical white keys as fixed scale-degree
//! slots: a white key plays its degree's offset, a black key plays one
//! semitone above the degree of the white key below it, whatever the active
//! scale. The octave of the incoming note is preserved.

use beltane_types::{builtin_scales, MidiEvent, PitchClass, ScaleDefinition, KEY_TO_POSITION};

/// Current root note and scale selection for the session.
pub struct ScaleEngine {
    scales: Vec<ScaleDefinition>,
    root: PitchClass,
    index: usize,
}

impl ScaleEngine {
    /// Build the engine over an ordered scale list. An empty list falls back
    /// to the builtins so cycling and remapping stay total.
    pub fn new(scales: Vec<ScaleDefinition>, root: PitchClass, scale_index: usize) -> Self {
        let scales = if scales.is_empty() {
            builtin_scales()
        } else {
            scales
        };
        let index = scale_index % scales.len();
        ScaleEngine {
            scales,
            root,
            index,
        }
    }

    pub fn root(&self) -> PitchClass {
        self.root
    }

    /// Set the root pitch class. Total, no failure mode.
    pub fn set_root(&mut self, root: PitchClass) {
        self.root = root;
    }

    pub fn current_scale(&self) -> &ScaleDefinition {
        &self.scales[self.index]
    }

    pub fn scale_count(&self) -> usize {
        self.scales.len()
    }

    /// Advance to the next scale, wrapping at the end of the list.
    pub fn next_scale(&mut self) {
        self.index = (self.index + 1) % self.scales.len();
    }

    /// Step back to the previous scale, wrapping at the start.
    pub fn previous_scale(&mut self) {
        self.index = (self.index + self.scales.len() - 1) % self.scales.len();
    }

    /// Display label, e.g. "B - Minor Natural".
    pub fn current_label(&self) -> String {
        format!("{} - {}", self.root.name(), self.current_scale().name())
    }

    /// Pitch class of the event's note, used for root selection.
    pub fn event_pitch_class(&self, event: &MidiEvent) -> PitchClass {
        PitchClass::from_semitone(event.data1)
    }

    /// Rewrite the event's note onto the active scale, in place.
    pub fn remap(&self, event: &mut MidiEvent) {
        let class = (event.data1 % 12) as usize;
        let octave = (event.data1 / 12) as u16;

        let (white_index, black_offset) = match KEY_TO_POSITION[class] {
            Some(white) => (white, 0u16),
            // Black key: the class one semitone below is always white.
            None => (KEY_TO_POSITION[class - 1].unwrap_or(0), 1),
        };

        // Wrap the degree sum within the octave so high roots never push the
        // note into the octave above.
        let class_out = (self.root.semitone() as u16
            + self.current_scale().offset(white_index) as u16
            + black_offset)
            % 12;
        let mapped = class_out + 12 * octave;
        // Keep the data byte in the 7-bit range for notes in the top band.
        event.data1 = mapped.min(127) as u8;
    }
}
