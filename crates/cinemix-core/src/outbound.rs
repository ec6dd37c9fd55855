//! Host value -> console wire messages.

use crate::codec;
use crate::message::ControlChange;
use crate::table::{LogicalPort, ValueKind, WireRule};
use smallvec::SmallVec;

/// Wire traffic for one parameter update, before dedup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundPlan {
    pub port: LogicalPort,
    /// Encoded value; this is what the duplicate cache compares.
    pub wire: u16,
    /// In send order. 14-bit values are MSB then LSB.
    pub messages: SmallVec<[ControlChange; 2]>,
}

/// Encode `value` under `rule`.
///
/// The console's 14-bit assembler latches on the MSB and has no rollback,
/// so the LSB must never precede it.
pub fn plan(rule: &WireRule, value: f32) -> OutboundPlan {
    let wire = codec::encode(rule.kind, value);
    let mut messages = SmallVec::new();

    match (rule.kind, rule.secondary_cc) {
        (ValueKind::Continuous14, Some(lsb_cc)) => {
            let (msb, lsb) = codec::split_14bit(wire);
            messages.push(ControlChange::new(rule.midi_channel, rule.primary_cc, msb));
            messages.push(ControlChange::new(rule.midi_channel, lsb_cc, lsb));
        }
        (ValueKind::Continuous14, None) => {
            // No LSB controller: coarse value only.
            let (msb, _) = codec::split_14bit(wire);
            messages.push(ControlChange::new(rule.midi_channel, rule.primary_cc, msb));
        }
        _ => {
            messages.push(ControlChange::new(
                rule.midi_channel,
                rule.primary_cc,
                wire as u8,
            ));
        }
    }

    OutboundPlan {
        port: rule.port,
        wire,
        messages,
    }
}

/// Result of a successful [`crate::TranslationEngine::update_parameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Wire value changed; this many CCs went out.
    Sent { messages: usize },
    /// Same wire value as last time; nothing sent.
    Unchanged,
}

impl UpdateOutcome {
    pub fn was_sent(self) -> bool {
        matches!(self, UpdateOutcome::Sent { .. })
    }
}
