//! Last-sent wire value per parameter.

use crate::parameter::{ParameterIndex, PARAMETER_COUNT};

/// Suppresses re-sends of unchanged values.
///
/// The console re-applies every CC it receives, so an unchanged resend makes
/// hardware LEDs flicker. Entries start unset; [`DuplicateCache::clear`]
/// forces the next update of every parameter onto the wire.
///
/// An entry is usually the last value transmitted. With
/// `EngineConfig::echo_suppression` on, the engine also records the wire
/// value it last decoded from the console, so an entry can hold a value the
/// console sent rather than one the bridge sent.
#[derive(Debug, Clone)]
pub struct DuplicateCache {
    last_sent: [Option<u16>; PARAMETER_COUNT],
}

impl DuplicateCache {
    pub fn new() -> Self {
        Self {
            last_sent: [None; PARAMETER_COUNT],
        }
    }

    #[inline]
    pub fn should_send(&self, index: ParameterIndex, wire: u16) -> bool {
        self.last_sent[index.get()] != Some(wire)
    }

    #[inline]
    pub fn record(&mut self, index: ParameterIndex, wire: u16) {
        self.last_sent[index.get()] = Some(wire);
    }

    pub fn last_sent(&self, index: ParameterIndex) -> Option<u16> {
        self.last_sent[index.get()]
    }

    /// Unset a single entry.
    pub fn forget(&mut self, index: ParameterIndex) {
        self.last_sent[index.get()] = None;
    }

    pub fn clear(&mut self) {
        self.last_sent = [None; PARAMETER_COUNT];
    }

    pub fn is_clear(&self) -> bool {
        self.last_sent.iter().all(Option::is_none)
    }
}

impl Default for DuplicateCache {
    fn default() -> Self {
        Self::new()
    }
}
