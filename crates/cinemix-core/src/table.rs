//! Parameter-to-wire mapping table.
//!
//! Every [`ParameterIndex`] maps to one immutable [`WireRule`] built by a
//! closed-form rule per console section. The table is rebuilt identically on
//! every construction and never mutated afterwards.
//!
//! The ten AUX mutes deliberately share port 2 / channel 5 / CC 96 and are
//! told apart only by the encoded value; every other rule has a unique
//! `(port, channel, primary CC)` triple.

use crate::parameter::{ParameterIndex, PARAMETER_COUNT};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// MIDI channel shared by the AUX mutes, the master fader and the
/// lifecycle commands.
pub const MASTER_CHANNEL: u8 = 5;

/// Controller shared by all ten AUX mutes.
pub const AUX_MUTE_CC: u8 = 96;

/// One of the two console halves, each wired to its own MIDI in/out pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogicalPort {
    /// Port 1: console channels 1-24.
    Low,
    /// Port 2: console channels 25-36, AUX and master section.
    High,
}

impl LogicalPort {
    pub const ALL: [LogicalPort; 2] = [LogicalPort::Low, LogicalPort::High];

    /// Port number as printed on the console (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            LogicalPort::Low => 1,
            LogicalPort::High => 2,
        }
    }

    pub fn from_number(number: u8) -> Result<Self> {
        match number {
            1 => Ok(LogicalPort::Low),
            2 => Ok(LogicalPort::High),
            other => Err(Error::InvalidLogicalPort(other)),
        }
    }

    /// Zero-based slot for per-port arrays.
    #[inline]
    pub fn slot(self) -> usize {
        self.number() as usize - 1
    }
}

impl fmt::Display for LogicalPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port {}", self.number())
    }
}

/// How a parameter value is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// 14-bit value split over primary (MSB) and secondary (LSB) CCs.
    Continuous14,
    /// 7-bit value on the primary CC.
    Discrete7,
    /// 2 = off, 3 = on.
    MuteBinary,
    /// Shared CC 96; value is `slot * 2 + (2 | 3)`.
    AuxMuteBinary { slot: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WireRule {
    /// MIDI channel, 1-16.
    pub midi_channel: u8,
    pub primary_cc: u8,
    /// LSB controller for 14-bit values.
    pub secondary_cc: Option<u8>,
    pub port: LogicalPort,
    pub kind: ValueKind,
}

impl WireRule {
    const fn fader(midi_channel: u8, msb_cc: u8, port: LogicalPort) -> Self {
        Self {
            midi_channel,
            primary_cc: msb_cc,
            secondary_cc: Some(msb_cc + 1),
            port,
            kind: ValueKind::Continuous14,
        }
    }

    const fn single(midi_channel: u8, cc: u8, port: LogicalPort, kind: ValueKind) -> Self {
        Self {
            midi_channel,
            primary_cc: cc,
            secondary_cc: None,
            port,
            kind,
        }
    }

    #[inline]
    pub fn matches_primary(&self, port: LogicalPort, midi_channel: u8, cc: u8) -> bool {
        self.port == port && self.midi_channel == midi_channel && self.primary_cc == cc
    }

    #[inline]
    pub fn matches_secondary(&self, port: LogicalPort, midi_channel: u8, cc: u8) -> bool {
        self.port == port && self.midi_channel == midi_channel && self.secondary_cc == Some(cc)
    }
}

/// Upper faders, channels 1-24: channel 1, CC pairs 0/1 .. 46/47.
fn upper_faders_low(i: u8) -> WireRule {
    WireRule::fader(1, i * 2, LogicalPort::Low)
}

/// Upper faders, channels 25-36: channel 2, CC pairs 0/1 .. 22/23.
fn upper_faders_high(i: u8) -> WireRule {
    WireRule::fader(2, i * 2, LogicalPort::High)
}

/// Lower faders, channels 1-24: channel 1, CC pairs 48/49 .. 94/95.
fn lower_faders_low(i: u8) -> WireRule {
    WireRule::fader(1, 48 + i * 2, LogicalPort::Low)
}

/// Lower faders, channels 25-36: channel 2, CC pairs 24/25 .. 46/47.
fn lower_faders_high(i: u8) -> WireRule {
    WireRule::fader(2, 24 + i * 2, LogicalPort::High)
}

/// Upper mutes: channel 3 CC 0-23 (port 1), channel 4 CC 0-11 (port 2).
fn upper_mutes(i: u8) -> WireRule {
    if i < 24 {
        WireRule::single(3, i, LogicalPort::Low, ValueKind::MuteBinary)
    } else {
        WireRule::single(4, i - 24, LogicalPort::High, ValueKind::MuteBinary)
    }
}

/// Lower mutes: channel 3 CC 24-47 (port 1), channel 4 CC 12-23 (port 2).
fn lower_mutes(i: u8) -> WireRule {
    if i < 24 {
        WireRule::single(3, 24 + i, LogicalPort::Low, ValueKind::MuteBinary)
    } else {
        WireRule::single(4, 12 + (i - 24), LogicalPort::High, ValueKind::MuteBinary)
    }
}

fn aux_mutes(slot: u8) -> WireRule {
    WireRule::single(
        MASTER_CHANNEL,
        AUX_MUTE_CC,
        LogicalPort::High,
        ValueKind::AuxMuteBinary { slot },
    )
}

/// Joysticks on channel 2 (axes) / channel 4 (mutes), master fader on
/// channel 5 CC 0/1. All on port 2.
fn master_section(i: u8) -> WireRule {
    use ValueKind::*;
    match i {
        0 => WireRule::single(2, 48, LogicalPort::High, Discrete7),
        1 => WireRule::single(2, 50, LogicalPort::High, Discrete7),
        2 => WireRule::single(4, 24, LogicalPort::High, MuteBinary),
        3 => WireRule::single(2, 52, LogicalPort::High, Discrete7),
        4 => WireRule::single(2, 54, LogicalPort::High, Discrete7),
        5 => WireRule::single(4, 26, LogicalPort::High, MuteBinary),
        _ => WireRule::fader(MASTER_CHANNEL, 0, LogicalPort::High),
    }
}

fn rule_at(index: usize) -> WireRule {
    let i = index as u8;
    match index {
        0..=23 => upper_faders_low(i),
        24..=35 => upper_faders_high(i - 24),
        36..=59 => lower_faders_low(i - 36),
        60..=71 => lower_faders_high(i - 60),
        72..=107 => upper_mutes(i - 72),
        108..=143 => lower_mutes(i - 108),
        144..=153 => aux_mutes(i - 144),
        _ => master_section(i - 154),
    }
}

/// The 161 wire rules, indexed by [`ParameterIndex`].
#[derive(Debug, Clone)]
pub struct ParameterTable {
    rules: [WireRule; PARAMETER_COUNT],
}

impl ParameterTable {
    pub fn new() -> Self {
        Self {
            rules: std::array::from_fn(rule_at),
        }
    }

    #[inline]
    pub fn rule(&self, index: ParameterIndex) -> &WireRule {
        &self.rules[index.get()]
    }

    /// Fails only for an index outside 0-160.
    pub fn rule_for(&self, index: usize) -> Result<&WireRule> {
        ParameterIndex::new(index).map(|index| self.rule(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParameterIndex, &WireRule)> {
        ParameterIndex::all().zip(self.rules.iter())
    }

    /// First rule in table order whose primary CC matches. For the shared
    /// AUX-mute triple this is always AUX 1 (index 144).
    pub fn find_primary(
        &self,
        port: LogicalPort,
        midi_channel: u8,
        cc: u8,
    ) -> Option<ParameterIndex> {
        self.iter()
            .find(|(_, rule)| rule.matches_primary(port, midi_channel, cc))
            .map(|(index, _)| index)
    }

    /// 14-bit parameter whose LSB controller matches.
    pub fn find_secondary(
        &self,
        port: LogicalPort,
        midi_channel: u8,
        cc: u8,
    ) -> Option<ParameterIndex> {
        self.iter()
            .find(|(_, rule)| rule.matches_secondary(port, midi_channel, cc))
            .map(|(index, _)| index)
    }
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self::new()
    }
}
