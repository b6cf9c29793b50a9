//! # beltane-core
//!
//! Control logic for the Beltane controller surface, independent of any MIDI
//! backend. One inbound [`beltane_types::MidiEvent`] enters the [`router`],
//! is classified through a tree of [`dispatch`] tables, and ends up at
//! exactly one handler; melodic notes additionally pass through the
//! scale-snap [`mode`] machine, which may rewrite the note via the
//! [`scaler`] before the host sees it.
//!
//! ## Module Overview
//!
//! - [`dispatch`] — keyed, ordered handler tables with guard predicates;
//!   tables nest to form the classification tree
//! - [`predicate`] — the press/release/drum guards used at registration
//! - [`scaler`] — root note + scale selection, chromatic-to-scale remapping
//! - [`mode`] — the scale-snap arming state machine
//! - [`router`] — composition root: builds the table tree and owns session
//!   state
//! - [`session`] — explicit session state (no ambient globals) and the
//!   context handed to every handler
//! - [`surface`] — host and device collaborator traits, pad LED matrix
//! - [`config`] — TOML configuration (default root/scale, extra scales)

pub mod config;
pub mod dispatch;
pub mod mode;
pub mod predicate;
pub mod router;
pub mod scaler;
pub mod session;
pub mod surface;
