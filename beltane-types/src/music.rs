//! Pitch classes and scale tables.
//!
//! The remap algorithm treats the physical white keys as seven fixed
//! scale-degree slots. `KEY_TO_POSITION` maps each chromatic pitch class to
//! its white-key ordinal, with `None` marking the black keys.

use serde::{Deserialize, Serialize};

/// Musical pitch class (chromatic, 0 = C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Semitone offset within the octave
    pub fn semitone(&self) -> u8 {
        *self as u8
    }

    /// Total: any note number reduces to a pitch class mod 12
    pub fn from_semitone(semitone: u8) -> PitchClass {
        Self::ALL[(semitone % 12) as usize]
    }

    /// Look up a pitch class by display name ("C#", "B", ...)
    pub fn from_name(name: &str) -> Option<PitchClass> {
        Self::ALL.iter().copied().find(|pc| pc.name() == name)
    }
}

/// Chromatic pitch class -> white-key ordinal (0..=6), `None` for black keys.
pub const KEY_TO_POSITION: [Option<u8>; 12] = [
    Some(0), // C
    None,    // C#
    Some(1), // D
    None,    // D#
    Some(2), // E
    Some(3), // F
    None,    // F#
    Some(4), // G
    None,    // G#
    Some(5), // A
    None,    // A#
    Some(6), // B
];

/// A named scale: the seven semitone offsets the seven white keys map onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleDefinition {
    name: String,
    offsets: [u8; 7],
}

/// Why a scale definition was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidScale {
    /// Not exactly seven offsets
    WrongLength(usize),
    /// Offsets must start at 0, ascend strictly, and stay within 0..=11
    BadOffsets,
}

impl std::fmt::Display for InvalidScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidScale::WrongLength(n) => {
                write!(f, "scale needs exactly 7 offsets, got {}", n)
            }
            InvalidScale::BadOffsets => {
                write!(f, "scale offsets must start at 0, ascend, and stay in 0..=11")
            }
        }
    }
}

impl std::error::Error for InvalidScale {}

impl ScaleDefinition {
    /// Validate and build a scale from a user-supplied offset list.
    pub fn new(name: impl Into<String>, offsets: &[u8]) -> Result<Self, InvalidScale> {
        let fixed: [u8; 7] = offsets
            .try_into()
            .map_err(|_| InvalidScale::WrongLength(offsets.len()))?;
        if fixed[0] != 0 || fixed[6] > 11 || !fixed.windows(2).all(|w| w[0] < w[1]) {
            return Err(InvalidScale::BadOffsets);
        }
        Ok(ScaleDefinition {
            name: name.into(),
            offsets: fixed,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semitone offset for a white-key ordinal 0..=6
    pub fn offset(&self, white_index: u8) -> u8 {
        self.offsets[white_index as usize]
    }

    pub fn offsets(&self) -> &[u8; 7] {
        &self.offsets
    }
}

/// The scales every session starts with, in cycling order.
pub fn builtin_scales() -> Vec<ScaleDefinition> {
    vec![
        ScaleDefinition {
            name: "Major".to_string(),
            offsets: [0, 2, 4, 5, 7, 9, 11],
        },
        ScaleDefinition {
            name: "Minor Natural".to_string(),
            offsets: [0, 2, 3, 5, 7, 8, 10],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class_round_trip() {
        for pc in PitchClass::ALL {
            assert_eq!(PitchClass::from_semitone(pc.semitone()), pc);
            assert_eq!(PitchClass::from_name(pc.name()), Some(pc));
        }
    }

    #[test]
    fn test_from_semitone_wraps() {
        assert_eq!(PitchClass::from_semitone(60), PitchClass::C);
        assert_eq!(PitchClass::from_semitone(61), PitchClass::Cs);
        assert_eq!(PitchClass::from_semitone(127), PitchClass::G);
    }

    #[test]
    fn test_key_to_position_covers_seven_whites() {
        let whites: Vec<u8> = KEY_TO_POSITION.iter().flatten().copied().collect();
        assert_eq!(whites, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_black_keys_have_white_neighbor_below() {
        // Every black key must resolve through the class one semitone down.
        for (class, pos) in KEY_TO_POSITION.iter().enumerate() {
            if pos.is_none() {
                assert!(KEY_TO_POSITION[class - 1].is_some());
            }
        }
    }

    #[test]
    fn test_builtin_scales_are_valid() {
        for scale in builtin_scales() {
            assert!(ScaleDefinition::new(scale.name(), scale.offsets()).is_ok());
        }
    }

    #[test]
    fn test_scale_validation_rejects_bad_input() {
        assert_eq!(
            ScaleDefinition::new("short", &[0, 2, 4]),
            Err(InvalidScale::WrongLength(3))
        );
        assert_eq!(
            ScaleDefinition::new("unsorted", &[0, 4, 2, 5, 7, 9, 11]),
            Err(InvalidScale::BadOffsets)
        );
        assert_eq!(
            ScaleDefinition::new("overflow", &[0, 2, 4, 5, 7, 9, 12]),
            Err(InvalidScale::BadOffsets)
        );
        assert_eq!(
            ScaleDefinition::new("nonzero", &[1, 2, 4, 5, 7, 9, 11]),
            Err(InvalidScale::BadOffsets)
        );
    }
}
