//! Explicit session state and the per-dispatch context.
//!
//! Everything that used to be ambient on a controller script — mode flags,
//! scale selection, shift, pad lights — lives here and is threaded through
//! every handler, so a dispatch pass owns all the state it can touch.

use beltane_types::{builtin_scales, MemoryMode, PitchClass};

use crate::config::Config;
use crate::mode::SnapMode;
use crate::scaler::ScaleEngine;
use crate::surface::{HostControl, PadMatrix, SurfaceOutput};

/// Mutable surface state for one controller session.
pub struct SessionState {
    pub scaler: ScaleEngine,
    pub snap: SnapMode,
    pub shift: bool,
    pub memory: MemoryMode,
    pub pads: PadMatrix,
}

impl SessionState {
    /// Session state with configured root/scale defaults.
    pub fn from_config(config: &Config) -> Self {
        let scales = config.scales();
        let root = config.default_root();
        let index = config.default_scale_index(&scales);
        SessionState {
            scaler: ScaleEngine::new(scales, root, index),
            snap: SnapMode::default(),
            shift: false,
            memory: MemoryMode::default(),
            pads: PadMatrix::default(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            scaler: ScaleEngine::new(builtin_scales(), PitchClass::B, 1),
            snap: SnapMode::default(),
            shift: false,
            memory: MemoryMode::default(),
            pads: PadMatrix::default(),
        }
    }
}

/// Borrowed view handed to every handler for one dispatch pass.
pub struct SurfaceContext<'a> {
    pub session: &'a mut SessionState,
    pub host: &'a mut dyn HostControl,
    pub output: &'a mut dyn SurfaceOutput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_matches_shipping_defaults() {
        let session = SessionState::default();
        assert_eq!(session.scaler.current_label(), "B - Minor Natural");
        assert_eq!(session.memory, MemoryMode::Controller);
        assert!(!session.snap.enabled);
        assert!(!session.shift);
    }
}
