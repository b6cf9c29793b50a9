//! # beltane-types
//!
//! Shared type definitions for the Beltane controller surface.
//! This crate contains the data structures used across beltane-core and the
//! beltane binary: the MIDI event model, pitch classes, and scale tables.

pub mod event;
pub mod music;

pub use event::*;
pub use music::*;

/// Who currently owns tempo-sync for the controller, as negotiated by the
/// device handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MemoryMode {
    /// The controller keeps its own arpeggiator/tempo memory.
    Controller,
    /// The host drives tempo-sync.
    Host,
}

impl Default for MemoryMode {
    fn default() -> Self {
        MemoryMode::Controller
    }
}

/// Direction for encoder-driven navigation (browser, preset, scale cycling).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Previous,
    Next,
}
