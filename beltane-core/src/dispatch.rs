//! Keyed event dispatch with guard predicates.
//!
//! A [`DispatchTable`] owns an ordered list of entries. Each table is built
//! with one [`KeyExtract`] strategy; dispatching extracts the event's
//! classification value once, finds the first entry whose key matches,
//! checks the entry's guard, and invokes the handler. A handler is either a
//! named function or a nested table, so tables compose into a tree of
//! classification stages. "No match" and "guard rejected" are both ordinary
//! not-handled outcomes, never errors.

use std::ops::RangeInclusive;

use beltane_types::MidiEvent;

use crate::predicate::always;
use crate::session::SurfaceContext;

/// Handler signature: mutate session state through the context, optionally
/// rewrite the event, report whether the event was consumed.
pub type HandlerFn = fn(&mut SurfaceContext<'_>, &mut MidiEvent) -> bool;

/// Guard signature: pure test over the event.
pub type Predicate = fn(&MidiEvent) -> bool;

/// How a table derives its classification value from an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyExtract {
    /// Message kind (status nibble).
    MidiId,
    /// Controller id.
    ControlNum,
    /// Second data byte (velocity / encoder value).
    Velocity,
    /// Full status byte.
    Status,
    /// Raw system-exclusive payload.
    Sysex,
}

/// The classification value extracted for one dispatch step.
enum DispatchKey<'e> {
    Num(u8),
    Sysex(&'e [u8]),
}

impl KeyExtract {
    fn key<'e>(&self, event: &'e MidiEvent) -> Option<DispatchKey<'e>> {
        match self {
            KeyExtract::MidiId => Some(DispatchKey::Num(event.midi_id)),
            KeyExtract::ControlNum => Some(DispatchKey::Num(event.control_num)),
            KeyExtract::Velocity => Some(DispatchKey::Num(event.data2)),
            KeyExtract::Status => Some(DispatchKey::Num(event.status)),
            KeyExtract::Sysex => event.sysex.as_deref().map(DispatchKey::Sysex),
        }
    }
}

/// What an entry was registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMatch {
    /// Exact numeric key.
    Num(u8),
    /// One entry registered under several numeric keys.
    AnyOf(&'static [u8]),
    /// Numeric range bucket (encoder velocity zones).
    Range(RangeInclusive<u8>),
    /// Exact byte-sequence key for system-exclusive payloads.
    Sysex(&'static [u8]),
}

impl KeyMatch {
    fn matches(&self, key: &DispatchKey<'_>) -> bool {
        match (self, key) {
            (KeyMatch::Num(n), DispatchKey::Num(k)) => n == k,
            (KeyMatch::AnyOf(ns), DispatchKey::Num(k)) => ns.contains(k),
            (KeyMatch::Range(r), DispatchKey::Num(k)) => r.contains(k),
            (KeyMatch::Sysex(bytes), DispatchKey::Sysex(payload)) => *bytes == *payload,
            _ => false,
        }
    }
}

impl From<u8> for KeyMatch {
    fn from(value: u8) -> Self {
        KeyMatch::Num(value)
    }
}

impl From<RangeInclusive<u8>> for KeyMatch {
    fn from(value: RangeInclusive<u8>) -> Self {
        KeyMatch::Range(value)
    }
}

impl From<&'static [u8]> for KeyMatch {
    fn from(value: &'static [u8]) -> Self {
        KeyMatch::Sysex(value)
    }
}

enum Handler {
    Call(HandlerFn),
    Delegate(DispatchTable),
}

struct DispatchEntry {
    key: KeyMatch,
    guard: Predicate,
    handler: Handler,
}

/// One classification stage: ordered entries under a single key-extraction
/// strategy.
pub struct DispatchTable {
    extract: KeyExtract,
    entries: Vec<DispatchEntry>,
}

impl DispatchTable {
    pub fn new(extract: KeyExtract) -> Self {
        DispatchTable {
            extract,
            entries: Vec::new(),
        }
    }

    /// Register a handler under one key, accepting every matching event.
    pub fn register(self, key: impl Into<KeyMatch>, handler: HandlerFn) -> Self {
        self.register_guarded(key, handler, always)
    }

    /// Register a handler under one key with a guard predicate.
    pub fn register_guarded(
        mut self,
        key: impl Into<KeyMatch>,
        handler: HandlerFn,
        guard: Predicate,
    ) -> Self {
        self.entries.push(DispatchEntry {
            key: key.into(),
            guard,
            handler: Handler::Call(handler),
        });
        self
    }

    /// Register one handler under several numeric keys (bulk form).
    pub fn register_many(
        mut self,
        keys: &'static [u8],
        handler: HandlerFn,
        guard: Predicate,
    ) -> Self {
        self.entries.push(DispatchEntry {
            key: KeyMatch::AnyOf(keys),
            guard,
            handler: Handler::Call(handler),
        });
        self
    }

    /// Register a nested table under one key.
    pub fn delegate(mut self, key: impl Into<KeyMatch>, table: DispatchTable) -> Self {
        self.entries.push(DispatchEntry {
            key: key.into(),
            guard: always,
            handler: Handler::Delegate(table),
        });
        self
    }

    /// Register a nested table under several numeric keys.
    pub fn delegate_many(mut self, keys: &'static [u8], table: DispatchTable) -> Self {
        self.entries.push(DispatchEntry {
            key: KeyMatch::AnyOf(keys),
            guard: always,
            handler: Handler::Delegate(table),
        });
        self
    }

    /// Run one dispatch step. Returns `false` with no side effects when no
    /// key matches or the guard rejects the event.
    pub fn dispatch(&mut self, ctx: &mut SurfaceContext<'_>, event: &mut MidiEvent) -> bool {
        let matched = {
            let key = match self.extract.key(event) {
                Some(key) => key,
                None => return false,
            };
            self.entries.iter().position(|e| e.key.matches(&key))
        };
        let entry = match matched {
            Some(index) => &mut self.entries[index],
            None => return false,
        };
        if !(entry.guard)(event) {
            return false;
        }
        match &mut entry.handler {
            Handler::Call(handler) => handler(ctx, event),
            Handler::Delegate(table) => table.dispatch(ctx, event),
        }
    }

    /// Registered keys in registration order, for auditing the table tree.
    pub fn keys(&self) -> impl Iterator<Item = &KeyMatch> + '_ {
        self.entries.iter().map(|e| &e.key)
    }
}
