//! Console wire messages -> host parameter values.

use crate::codec;
use crate::message::InboundCc;
use crate::parameter::{ParameterIndex, PARAMETER_COUNT};
use crate::table::{LogicalPort, ParameterTable, ValueKind, AUX_MUTE_CC, MASTER_CHANNEL};
use std::time::{Duration, Instant};
use tracing::{trace, warn};

/// Where an inbound CC goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundRoute {
    /// Primary CC of a single parameter (MSB for 14-bit ones).
    Parameter(ParameterIndex),
    /// LSB controller of a 14-bit parameter.
    FaderLsb(ParameterIndex),
    /// Shared AUX mute CC; the value selects the slot.
    AuxMuteGroup,
}

/// Resolve a CC against the table. `None` means the console sent something
/// this bridge does not model.
pub fn route(table: &ParameterTable, msg: &InboundCc) -> Option<InboundRoute> {
    let InboundCc { port, cc } = *msg;
    if port == LogicalPort::High && cc.channel() == MASTER_CHANNEL && cc.controller() == AUX_MUTE_CC {
        return Some(InboundRoute::AuxMuteGroup);
    }
    if let Some(index) = table.find_primary(port, cc.channel(), cc.controller()) {
        return Some(InboundRoute::Parameter(index));
    }
    table
        .find_secondary(port, cc.channel(), cc.controller())
        .map(InboundRoute::FaderLsb)
}

/// Parameter index for an AUX slot (0-9).
pub fn aux_parameter(slot: u8) -> Option<ParameterIndex> {
    ParameterIndex::new(144 + slot as usize).ok()
}

/// Single-CC decode for a primary controller. 14-bit parameters take the
/// 7-bit inverse of their MSB.
pub fn decode_single(kind: ValueKind, value: u8) -> f32 {
    match kind {
        ValueKind::Continuous14 => codec::decode_7bit(value),
        other => codec::decode(other, value as u16),
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingMsb {
    msb: u8,
    at: Instant,
}

/// Per-parameter MSB latch for true 14-bit inbound decoding.
///
/// An MSB waits for its LSB for at most `timeout`; a late LSB is discarded
/// along with the stale MSB.
#[derive(Debug, Clone)]
pub struct FaderAssembler {
    pending: [Option<PendingMsb>; PARAMETER_COUNT],
    timeout: Duration,
}

impl FaderAssembler {
    pub fn new(timeout: Duration) -> Self {
        Self {
            pending: [None; PARAMETER_COUNT],
            timeout,
        }
    }

    pub fn on_msb(&mut self, index: ParameterIndex, msb: u8, now: Instant) {
        if let Some(prev) = self.pending[index.get()] {
            trace!(parameter = %index, stale_msb = prev.msb, "Replacing unpaired MSB");
        }
        self.pending[index.get()] = Some(PendingMsb { msb, at: now });
    }

    /// Returns the assembled 14-bit value, or `None` if no fresh MSB is
    /// waiting.
    pub fn on_lsb(&mut self, index: ParameterIndex, lsb: u8, now: Instant) -> Option<u16> {
        let pending = self.pending[index.get()].take()?;
        let age = now.saturating_duration_since(pending.at);
        if age > self.timeout {
            warn!(
                parameter = %index,
                age_ms = age.as_millis() as u64,
                "Discarding MSB whose LSB arrived too late"
            );
            return None;
        }
        Some(codec::join_14bit(pending.msb, lsb))
    }

    pub fn is_pending(&self, index: ParameterIndex) -> bool {
        self.pending[index.get()].is_some()
    }

    pub fn clear(&mut self) {
        self.pending = [None; PARAMETER_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(i: usize) -> ParameterIndex {
        ParameterIndex::new(i).unwrap()
    }

    #[test]
    fn test_routes() {
        let table = ParameterTable::new();
        let r = |port, ch, cc| route(&table, &InboundCc::new(port, ch, cc, 0));

        assert_eq!(r(LogicalPort::Low, 1, 0), Some(InboundRoute::Parameter(idx(0))));
        assert_eq!(r(LogicalPort::Low, 1, 1), Some(InboundRoute::FaderLsb(idx(0))));
        assert_eq!(r(LogicalPort::High, 5, 96), Some(InboundRoute::AuxMuteGroup));
        assert_eq!(r(LogicalPort::High, 5, 1), Some(InboundRoute::FaderLsb(idx(160))));
        assert_eq!(r(LogicalPort::High, 4, 26), Some(InboundRoute::Parameter(idx(159))));
        assert_eq!(r(LogicalPort::Low, 5, 96), None);
        assert_eq!(r(LogicalPort::Low, 9, 0), None);
        assert_eq!(r(LogicalPort::Low, 3, 64), None);
    }

    #[test]
    fn test_decode_single() {
        assert_eq!(decode_single(ValueKind::Continuous14, 127), 1.0);
        assert_eq!(decode_single(ValueKind::Continuous14, 0), 0.0);
        assert_eq!(decode_single(ValueKind::MuteBinary, 3), 1.0);
        assert_eq!(decode_single(ValueKind::MuteBinary, 127), 0.0);
        assert_eq!(decode_single(ValueKind::Discrete7, 127), 1.0);
    }

    #[test]
    fn test_assembler_pairs_within_timeout() {
        let mut asm = FaderAssembler::new(Duration::from_millis(50));
        let t0 = Instant::now();
        asm.on_msb(idx(0), 96, t0);
        assert!(asm.is_pending(idx(0)));
        assert_eq!(asm.on_lsb(idx(0), 65, t0 + Duration::from_millis(10)), Some(12353));
        assert!(!asm.is_pending(idx(0)));
        // LSB without MSB.
        assert_eq!(asm.on_lsb(idx(0), 65, t0), None);
    }

    #[test]
    fn test_assembler_discards_stale_msb() {
        let mut asm = FaderAssembler::new(Duration::from_millis(50));
        let t0 = Instant::now();
        asm.on_msb(idx(3), 10, t0);
        assert_eq!(asm.on_lsb(idx(3), 1, t0 + Duration::from_millis(51)), None);
        assert!(!asm.is_pending(idx(3)));
    }

    #[test]
    fn test_assembler_newer_msb_wins() {
        let mut asm = FaderAssembler::new(Duration::from_millis(50));
        let t0 = Instant::now();
        asm.on_msb(idx(1), 10, t0);
        asm.on_msb(idx(1), 20, t0);
        assert_eq!(asm.on_lsb(idx(1), 0, t0), Some(20 << 7));
        asm.on_msb(idx(2), 1, t0);
        asm.clear();
        assert!(!asm.is_pending(idx(2)));
    }
}
